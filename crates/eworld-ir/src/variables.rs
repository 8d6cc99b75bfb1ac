//! Propositional variable layout.
//!
//! Every `(cell, block)` pair owns one variable id. Blocks are laid out
//! contiguously in declaration order, each `D^2` ids wide, starting at id 1:
//!
//! | block          | ids                    |
//! |----------------|------------------------|
//! | `PastObject`   | `1 ..= D^2`            |
//! | `FutureObject` | `D^2 + 1 ..= 2 D^2`    |
//! | `Sense(north)` | `2 D^2 + 1 ..= 3 D^2`  |
//! | ...            | ...                    |
//! | `Sense(same)`  | `6 D^2 + 1 ..= 7 D^2`  |
//!
//! `var(cell, block) = (row - 1) * D + (col - 1) + offset(block)`.

use serde::Serialize;
use std::fmt;

use crate::channel::{Channel, CHANNEL_COUNT};
use crate::grid::{Cell, Dimension};

/// Propositional variable identifier. Always `>= 1`.
pub type VarId = u32;

/// Number of variable blocks.
pub const BLOCK_COUNT: usize = 2 + CHANNEL_COUNT;

/// A family of `D^2` variables, one per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    /// Object presence as committed in earlier steps.
    PastObject,
    /// Object presence under the current step's hypothesis.
    FutureObject,
    /// Indicator of one sensor channel when sensing from the cell.
    Sense(Channel),
}

impl Block {
    /// Declaration order; fixes the offsets.
    pub const ALL: [Block; BLOCK_COUNT] = [
        Block::PastObject,
        Block::FutureObject,
        Block::Sense(Channel::North),
        Block::Sense(Channel::East),
        Block::Sense(Channel::South),
        Block::Sense(Channel::West),
        Block::Sense(Channel::SameCell),
    ];

    pub fn ordinal(self) -> usize {
        match self {
            Block::PastObject => 0,
            Block::FutureObject => 1,
            Block::Sense(channel) => 2 + channel.index(),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::PastObject => f.write_str("past"),
            Block::FutureObject => f.write_str("future"),
            Block::Sense(channel) => write!(f, "sense[{channel}]"),
        }
    }
}

/// Bijection between `(cell, block)` pairs and variable ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpace {
    dim: Dimension,
    offsets: [VarId; BLOCK_COUNT],
}

impl VariableSpace {
    pub fn new(dim: Dimension) -> Self {
        let mut offsets = [0; BLOCK_COUNT];
        let mut next: VarId = 1;
        for block in Block::ALL {
            offsets[block.ordinal()] = next;
            next += dim.area();
        }
        Self { dim, offsets }
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    /// First id of `block`.
    pub fn offset(&self, block: Block) -> VarId {
        self.offsets[block.ordinal()]
    }

    /// Total number of variables, `7 * D^2`.
    pub fn total(&self) -> u32 {
        self.dim.area() * BLOCK_COUNT as u32
    }

    /// Highest variable id in use.
    pub fn max_var(&self) -> VarId {
        self.total()
    }

    pub fn var(&self, cell: Cell, block: Block) -> VarId {
        debug_assert!(self.dim.holds(cell), "{cell} is off the {} grid", self.dim);
        let side = self.dim.side();
        (cell.row() - 1) * side + (cell.col() - 1) + self.offset(block)
    }

    /// Inverse of [`VariableSpace::var`]; `None` if `var` lies outside `block`.
    pub fn cell_of(&self, var: VarId, block: Block) -> Option<Cell> {
        let offset = self.offset(block);
        if var < offset || var >= offset + self.dim.area() {
            return None;
        }
        let lineal = var - offset;
        let side = self.dim.side();
        self.dim
            .cell(i64::from(lineal / side + 1), i64::from(lineal % side + 1))
    }

    /// Block and cell a variable id belongs to.
    pub fn decode(&self, var: VarId) -> Option<(Block, Cell)> {
        if var == 0 || var > self.max_var() {
            return None;
        }
        let ordinal = ((var - 1) / self.dim.area()) as usize;
        let block = Block::ALL[ordinal];
        self.cell_of(var, block).map(|cell| (block, cell))
    }
}
