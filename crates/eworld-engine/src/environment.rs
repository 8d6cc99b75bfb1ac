//! The world the agent moves through.

use indexmap::IndexSet;

use eworld_ir::channel::Channel;
use eworld_ir::grid::{Cell, Dimension};
use eworld_ir::protocol::{AgentRequest, EnvironmentReply, SensorReading};

/// Answers the agent's requests.
pub trait Environment {
    fn dimension(&self) -> Dimension;

    fn respond(&mut self, request: AgentRequest) -> EnvironmentReply;
}

/// Ground-truth simulator: a grid with a fixed set of envelopes.
#[derive(Debug, Clone)]
pub struct EnvelopeWorld {
    dim: Dimension,
    envelopes: IndexSet<Cell>,
}

impl EnvelopeWorld {
    /// Duplicate envelopes collapse; first-seen order is kept.
    pub fn new(dim: Dimension, envelopes: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            dim,
            envelopes: envelopes.into_iter().collect(),
        }
    }

    pub fn envelopes(&self) -> &IndexSet<Cell> {
        &self.envelopes
    }

    pub fn has_envelope(&self, cell: Cell) -> bool {
        self.envelopes.contains(&cell)
    }

    /// What the sensor reports when used at `at`.
    pub fn reading_at(&self, at: Cell) -> SensorReading {
        let mut reading = SensorReading::default();
        for channel in Channel::ALL {
            if channel
                .influence(self.dim, at)
                .any(|cell| self.envelopes.contains(&cell))
            {
                reading.set(channel);
            }
        }
        reading
    }
}

impl Environment for EnvelopeWorld {
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
                reading: self.reading_at(cell).to_string(),
            },
        }
    }
}
