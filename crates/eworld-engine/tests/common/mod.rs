#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;

use eworld_engine::environment::{EnvelopeWorld, Environment};
use eworld_engine::finder::{EnvelopeFinder, FinderOptions};
use eworld_engine::loader::Scenario;
use eworld_ir::channel::Channel;
use eworld_ir::grid::{Cell, Dimension, Position};
use eworld_ir::protocol::{AgentRequest, EnvironmentReply, SensorReading};
use eworld_smt::backends::z3_backend::Z3Solver;

pub fn demo_path(scenario: &str, file: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/../../demos/{scenario}/{file}",
        env!("CARGO_MANIFEST_DIR")
    ))
}

pub fn load_demo(scenario: &str, side: u32) -> Scenario {
    let dim = Dimension::new(side).unwrap();
    Scenario::load(
        dim,
        &demo_path(scenario, "steps.txt"),
        &demo_path(scenario, "envelopes.txt"),
        None,
    )
    .unwrap_or_else(|e| panic!("Failed to load demo {scenario}: {e}"))
}

pub fn test_options() -> FinderOptions {
    FinderOptions { timeout_secs: 60 }
}

pub fn cell(dim: Dimension, row: i64, col: i64) -> Cell {
    dim.cell(row, col)
        .unwrap_or_else(|| panic!("({row},{col}) is not on a {dim} grid"))
}

pub fn positions(coords: &[(i64, i64)]) -> Vec<Position> {
    coords.iter().map(|&(r, c)| Position::new(r, c)).collect()
}

/// World of side 5 with envelopes at (2,2) and (4,4).
pub fn two_envelope_world() -> EnvelopeWorld {
    let dim = Dimension::new(5).unwrap();
    EnvelopeWorld::new(dim, [cell(dim, 2, 2), cell(dim, 4, 4)])
}

pub fn z3_finder<E: Environment>(env: E, steps: Vec<Position>) -> EnvelopeFinder<E, Z3Solver> {
    let dim = env.dimension();
    EnvelopeFinder::new(dim, env, Z3Solver::with_timeout_secs(60), steps)
        .unwrap_or_else(|e| panic!("Failed to build finder: {e}"))
}

/// Exclusions implied by a walk, computed without any solver: the union of
/// the influence sets of every silent channel observed along the way.
pub fn reference_exclusions(world: &EnvelopeWorld, steps: &[Position]) -> Vec<BTreeSet<Cell>> {
    let dim = world.dimension();
    let mut position = None;
    let mut excluded = BTreeSet::new();
    let mut per_step = Vec::new();
    for step in steps {
        if let Some(cell) = dim.locate(*step) {
            position = Some(cell);
        }
        if let Some(at) = position {
            let reading = world.reading_at(at);
            for channel in Channel::ALL {
                if !reading.detects(channel) {
                    excluded.extend(channel.influence(dim, at));
                }
            }
        }
        per_step.push(excluded.clone());
    }
    per_step
}

/// Simulator with its channel wiring rotated by one position, so the
/// same-cell bit is reported as north and every other bit shifts right.
pub struct MiswiredWorld(pub EnvelopeWorld);

impl Environment for MiswiredWorld {
    fn dimension(&self) -> Dimension {
        self.0.dimension()
    }

    fn respond(&mut self, request: AgentRequest) -> EnvironmentReply {
        match self.0.respond(request) {
            EnvironmentReply::Detection { cell, reading } => {
                let bits: SensorReading = reading.parse().unwrap();
                let mut rotated = SensorReading::default();
                for (i, channel) in Channel::ALL.iter().enumerate() {
                    if bits.detects(*channel) {
                        rotated.set(Channel::ALL[(i + 1) % Channel::ALL.len()]);
                    }
                }
                EnvironmentReply::Detection {
                    cell,
                    reading: rotated.to_string(),
                }
            }
            other => other,
        }
    }
}

/// Environment that answers every detection with a fixed raw reading.
pub struct FixedReadingWorld {
    pub dim: Dimension,
    pub reading: String,
}

impl Environment for FixedReadingWorld {
    fn dimension(&self) -> Dimension {
        self.dim
    }

    fn respond(&mut self, request: AgentRequest) -> EnvironmentReply {
        match request {
            AgentRequest::MoveTo(target) => match self.dim.locate(target) {
                Some(cell) => EnvironmentReply::MovedTo(cell),
                None => EnvironmentReply::MoveRejected(target),
            },
            AgentRequest::DetectAt(cell) => EnvironmentReply::Detection {
                cell,
                reading: self.reading.clone(),
            },
        }
    }
}

/// Confirms moves up to twice its own side, reporting cells of a larger grid.
pub struct OverreachingWorld {
    pub dim: Dimension,
    pub reading: String,
}

impl Environment for OverreachingWorld {
    fn dimension(&self) -> Dimension {
        self.dim
    }

    fn respond(&mut self, request: AgentRequest) -> EnvironmentReply {
        let wider = Dimension::new(self.dim.side() * 2).unwrap();
        match request {
            AgentRequest::MoveTo(target) => match wider.locate(target) {
                Some(cell) => EnvironmentReply::MovedTo(cell),
                None => EnvironmentReply::MoveRejected(target),
            },
            AgentRequest::DetectAt(cell) => EnvironmentReply::Detection {
                cell,
                reading: self.reading.clone(),
            },
        }
    }
}
