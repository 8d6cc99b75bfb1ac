//! Human-readable names for variable ids, used in SMT-LIB dumps.
//!
//! Naming conventions:
//! - `past_r_c` - object committed at `(r, c)` in an earlier step
//! - `future_r_c` - object hypothesised at `(r, c)` in the current step
//! - `sense_<channel>_r_c` - channel indicator when sensing from `(r, c)`

use eworld_ir::channel::Channel;
use eworld_ir::grid::Cell;
use eworld_ir::variables::{Block, VarId, VariableSpace};

pub(crate) fn past_var(cell: Cell) -> String {
    format!("past_{}_{}", cell.row(), cell.col())
}

pub(crate) fn future_var(cell: Cell) -> String {
    format!("future_{}_{}", cell.row(), cell.col())
}

pub(crate) fn sense_var(channel: Channel, cell: Cell) -> String {
    let tag = match channel {
        Channel::North => "north",
        Channel::East => "east",
        Channel::South => "south",
        Channel::West => "west",
        Channel::SameCell => "here",
    };
    format!("sense_{tag}_{}_{}", cell.row(), cell.col())
}

/// Name of `var` in `space`, or `v<id>` for ids outside the layout.
pub fn var_name(space: &VariableSpace, var: VarId) -> String {
    match space.decode(var) {
        Some((Block::PastObject, cell)) => past_var(cell),
        Some((Block::FutureObject, cell)) => future_var(cell),
        Some((Block::Sense(channel), cell)) => sense_var(channel, cell),
        None => format!("v{var}"),
    }
}
