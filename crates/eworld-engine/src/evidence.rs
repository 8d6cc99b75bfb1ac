//! Validation of detection replies.
//!
//! The environment returns readings as raw text; this is the single place
//! that checks the reply shape, the cell and the symbols before anything
//! reaches the oracle.

use eworld_ir::grid::{Cell, Dimension};
use eworld_ir::protocol::{EnvironmentReply, ProtocolError, SensorReading};

/// Decode the reply to a `DetectAt(requested)` request on a `dim` world.
pub fn decode_detection(
    dim: Dimension,
    requested: Cell,
    reply: EnvironmentReply,
) -> Result<SensorReading, ProtocolError> {
    match reply {
        EnvironmentReply::Detection { cell, reading } => {
            if !dim.holds(cell) {
                return Err(ProtocolError::OffGrid { found: cell, dim });
            }
            if cell != requested {
                return Err(ProtocolError::WrongCell {
                    requested,
                    found: cell,
                });
            }
            reading.parse()
        }
        other => Err(ProtocolError::UnexpectedReply {
            request: "detect",
            found: other.kind(),
        }),
    }
}
