//! The finder agent: walks a step list, senses, and lets the inference
//! session narrow down where envelopes can be.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use eworld_ir::grid::{Cell, Dimension, Position};
use eworld_ir::knowledge::KnowledgeGrid;
use eworld_ir::protocol::{AgentRequest, EnvironmentReply, ProtocolError, SensorReading};
use eworld_smt::backends::z3_backend::Z3Solver;
use eworld_smt::solver::SatOracle;

use crate::environment::{EnvelopeWorld, Environment};
use crate::evidence::decode_detection;
use crate::loader::Scenario;
use crate::session::{InferenceError, InferenceSession};

/// Default per-query oracle timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("Environment is {environment}, but the finder was configured for {finder}")]
    DimensionMismatch {
        finder: Dimension,
        environment: Dimension,
    },
}

/// Options for a run.
#[derive(Debug, Clone)]
pub struct FinderOptions {
    /// Oracle timeout per query; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// What happened to the move request of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved(Cell),
    Rejected(Position),
    /// The step list is exhausted; the agent stays put.
    NoStepsLeft,
}

/// Result of one finder step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// 1-based step number.
    pub step: usize,
    #[serde(rename = "move")]
    pub movement: MoveOutcome,
    /// Where the sensor was used; `None` if the agent was never placed.
    pub sensed_at: Option<Cell>,
    pub reading: Option<SensorReading>,
    pub newly_excluded: Vec<Cell>,
    pub knowledge: KnowledgeGrid,
    pub clause_count: usize,
}

pub struct EnvelopeFinder<E: Environment, O: SatOracle> {
    session: InferenceSession<O>,
    env: E,
    steps: Vec<Position>,
    cursor: usize,
    steps_run: usize,
    position: Option<Cell>,
}

impl<E: Environment, O: SatOracle> EnvelopeFinder<E, O> {
    /// Build the session over `oracle` and install the world formula.
    pub fn new(
        dim: Dimension,
        env: E,
        oracle: O,
        steps: Vec<Position>,
    ) -> Result<Self, FinderError> {
        if env.dimension() != dim {
            return Err(FinderError::DimensionMismatch {
                finder: dim,
                environment: env.dimension(),
            });
        }
        let mut session = InferenceSession::new(dim, oracle);
        let clauses = session.install_formula()?;
        info!(
            dimension = dim.side(),
            vars = session.space().total(),
            clauses,
            steps = steps.len(),
            "installed world formula"
        );
        Ok(Self {
            session,
            env,
            steps,
            cursor: 0,
            steps_run: 0,
            position: None,
        })
    }

    /// One full step: commit, move, sense, assert evidence, derive.
    pub fn run_next_step(&mut self) -> Result<StepReport, FinderError> {
        self.session.commit_carry_forward()?;

        let movement = self.move_phase()?;
        let mut sensed_at = None;
        let mut reading = None;
        if let Some(at) = self.position {
            let observed = self.detect_at(at)?;
            self.session.assert_evidence(at, observed)?;
            self.session.check_consistency(at)?;
            sensed_at = Some(at);
            reading = Some(observed);
        }
        // Runs even when sensing was skipped.
        let newly_excluded = self.session.derive()?;

        self.steps_run += 1;
        info!(
            step = self.steps_run,
            position = ?sensed_at.map(|c| c.to_string()),
            reading = ?reading.map(|r| r.to_string()),
            newly_excluded = newly_excluded.len(),
            excluded = self.session.knowledge().excluded_count(),
            "step finished"
        );
        Ok(StepReport {
            step: self.steps_run,
            movement,
            sensed_at,
            reading,
            newly_excluded,
            knowledge: self.session.knowledge().clone(),
            clause_count: self.session.clause_count(),
        })
    }

    /// Run every remaining step of the list.
    pub fn run_all(&mut self) -> Result<Vec<StepReport>, FinderError> {
        let mut reports = Vec::with_capacity(self.remaining_steps());
        while self.remaining_steps() > 0 {
            reports.push(self.run_next_step()?);
        }
        Ok(reports)
    }

    fn move_phase(&mut self) -> Result<MoveOutcome, ProtocolError> {
        let Some(&target) = self.steps.get(self.cursor) else {
            return Ok(MoveOutcome::NoStepsLeft);
        };
        self.cursor += 1;
        match self.env.respond(AgentRequest::MoveTo(target)) {
            EnvironmentReply::MovedTo(cell) if cell.position() != target => {
                Err(ProtocolError::MovedElsewhere {
                    requested: target,
                    found: cell,
                })
            }
            EnvironmentReply::MovedTo(cell) => {
                let dim = self.session.space().dimension();
                if !dim.holds(cell) {
                    return Err(ProtocolError::OffGrid { found: cell, dim });
                }
                self.position = Some(cell);
                Ok(MoveOutcome::Moved(cell))
            }
            EnvironmentReply::MoveRejected(_) => {
                warn!(%target, "move rejected, position unchanged");
                Ok(MoveOutcome::Rejected(target))
            }
            other => Err(ProtocolError::UnexpectedReply {
                request: "move",
                found: other.kind(),
            }),
        }
    }

    fn detect_at(&mut self, at: Cell) -> Result<SensorReading, ProtocolError> {
        let reply = self.env.respond(AgentRequest::DetectAt(at));
        decode_detection(self.session.space().dimension(), at, reply)
    }

    pub fn knowledge(&self) -> &KnowledgeGrid {
        self.session.knowledge()
    }

    pub fn session(&self) -> &InferenceSession<O> {
        &self.session
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Current agent cell, `None` before the first confirmed move.
    pub fn position(&self) -> Option<Cell> {
        self.position
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len() - self.cursor
    }

    pub fn steps_run(&self) -> usize {
        self.steps_run
    }
}

impl EnvelopeFinder<EnvelopeWorld, Z3Solver> {
    /// Finder over the simulated world of `scenario`, backed by Z3.
    pub fn with_z3(scenario: &Scenario, options: &FinderOptions) -> Result<Self, FinderError> {
        let world = EnvelopeWorld::new(scenario.dim, scenario.envelopes.iter().copied());
        let oracle = Z3Solver::with_timeout_secs(options.timeout_secs);
        Self::new(scenario.dim, world, oracle, scenario.steps.clone())
    }
}
