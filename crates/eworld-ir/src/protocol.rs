//! Messages exchanged between the finder agent and its environment.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::channel::{Channel, CHANNEL_COUNT};
use crate::grid::{Cell, Dimension, Position};

/// Request sent by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentRequest {
    /// Ask to move; the target may lie off the grid.
    MoveTo(Position),
    /// Ask for a sensor reading at the agent's current cell.
    DetectAt(Cell),
}

/// Reply sent back by the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentReply {
    MovedTo(Cell),
    MoveRejected(Position),
    /// Raw reading text, one symbol per channel in [`Channel::ALL`] order.
    Detection { cell: Cell, reading: String },
}

impl EnvironmentReply {
    pub fn kind(&self) -> &'static str {
        match self {
            EnvironmentReply::MovedTo(_) => "moved_to",
            EnvironmentReply::MoveRejected(_) => "move_rejected",
            EnvironmentReply::Detection { .. } => "detection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Unknown sensor symbol '{symbol}' in reading \"{reading}\"")]
    UnknownSymbol { symbol: char, reading: String },
    #[error("Sensor reading \"{reading}\" has {found} symbols, expected {CHANNEL_COUNT}")]
    ReadingLength { reading: String, found: usize },
    #[error("Unexpected reply '{found}' to a {request} request")]
    UnexpectedReply {
        request: &'static str,
        found: &'static str,
    },
    #[error("Detection reply for {found}, but the agent asked at {requested}")]
    WrongCell { requested: Cell, found: Cell },
    #[error("Move to {requested} confirmed as a move to {found}")]
    MovedElsewhere { requested: Position, found: Cell },
    #[error("Environment confirmed {found}, which lies outside the {dim} world")]
    OffGrid { found: Cell, dim: Dimension },
}

/// Decoded 5-channel reading. `true` means the channel detected something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SensorReading([bool; CHANNEL_COUNT]);

impl SensorReading {
    pub fn new(bits: [bool; CHANNEL_COUNT]) -> Self {
        Self(bits)
    }

    pub fn detects(self, channel: Channel) -> bool {
        self.0[channel.index()]
    }

    pub fn set(&mut self, channel: Channel) {
        self.0[channel.index()] = true;
    }

    /// Channels that stayed silent; the only ones that carry evidence.
    pub fn silent_channels(self) -> impl Iterator<Item = Channel> {
        Channel::ALL.into_iter().filter(move |c| !self.detects(*c))
    }
}

impl FromStr for SensorReading {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = s.chars().count();
        if found != CHANNEL_COUNT {
            return Err(ProtocolError::ReadingLength {
                reading: s.to_string(),
                found,
            });
        }
        let mut bits = [false; CHANNEL_COUNT];
        for (bit, symbol) in bits.iter_mut().zip(s.chars()) {
            *bit = match symbol {
                '0' => false,
                '1' => true,
                other => {
                    return Err(ProtocolError::UnknownSymbol {
                        symbol: other,
                        reading: s.to_string(),
                    })
                }
            };
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for SensorReading {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
