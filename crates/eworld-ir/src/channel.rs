//! Sensor channels and their influence sets.
//!
//! The world simulator and the formula builder both read the table below, so
//! the bit order of a reading and the clauses that interpret it always agree.
//! Rows grow northwards: "north" of `(r, c)` is row `r + 1`.

use serde::Serialize;
use std::fmt;

use crate::grid::{Cell, Dimension};

/// Number of channels in one sensor reading.
pub const CHANNEL_COUNT: usize = 5;

/// One directional (or co-located) sensor indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    North,
    East,
    South,
    West,
    SameCell,
}

const NORTH: &[(i64, i64)] = &[(1, -1), (1, 0), (1, 1)];
const EAST: &[(i64, i64)] = &[(-1, 1), (0, 1), (1, 1)];
const SOUTH: &[(i64, i64)] = &[(-1, -1), (-1, 0), (-1, 1)];
const WEST: &[(i64, i64)] = &[(-1, -1), (0, -1), (1, -1)];
const SAME_CELL: &[(i64, i64)] = &[(0, 0)];

impl Channel {
    /// Reading order: bit `i` of a reading belongs to `ALL[i]`.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::North,
        Channel::East,
        Channel::South,
        Channel::West,
        Channel::SameCell,
    ];

    pub fn index(self) -> usize {
        match self {
            Channel::North => 0,
            Channel::East => 1,
            Channel::South => 2,
            Channel::West => 3,
            Channel::SameCell => 4,
        }
    }

    /// `(d_row, d_col)` offsets of the cells this channel reacts to.
    pub fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Channel::North => NORTH,
            Channel::East => EAST,
            Channel::South => SOUTH,
            Channel::West => WEST,
            Channel::SameCell => SAME_CELL,
        }
    }

    /// In-grid cells whose object would switch this channel on when sensed
    /// from `at`.
    pub fn influence(self, dim: Dimension, at: Cell) -> impl Iterator<Item = Cell> {
        self.offsets()
            .iter()
            .filter_map(move |&(d_row, d_col)| dim.offset(at, d_row, d_col))
    }

    /// Whether an object at `target` is visible on this channel from `at`.
    pub fn reacts_to(self, at: Cell, target: Cell) -> bool {
        let d_row = i64::from(target.row()) - i64::from(at.row());
        let d_col = i64::from(target.col()) - i64::from(at.col());
        self.offsets().contains(&(d_row, d_col))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::North => "north",
            Channel::East => "east",
            Channel::South => "south",
            Channel::West => "west",
            Channel::SameCell => "same-cell",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
