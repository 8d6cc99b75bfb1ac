//! The agent's per-cell belief state.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::grid::{Cell, Dimension};

/// What the agent knows about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Belief {
    /// An object may still be there.
    #[default]
    Unknown,
    /// Provably no object there.
    Excluded,
}

impl Belief {
    pub fn symbol(self) -> char {
        match self {
            Belief::Unknown => '?',
            Belief::Excluded => 'X',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '?' => Some(Belief::Unknown),
            'X' => Some(Belief::Excluded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Snapshot has {found} rows, expected {expected}")]
    RowCount { expected: u32, found: usize },
    #[error("Snapshot row {row} has {found} cells, expected {expected}")]
    ColumnCount { row: u32, expected: u32, found: usize },
    #[error("Snapshot row {row} contains unknown symbol '{symbol}'")]
    UnknownSymbol { row: u32, symbol: String },
}

/// `D x D` matrix of beliefs, all [`Belief::Unknown`] at creation.
///
/// The only transition is `Unknown -> Excluded`; nothing ever resets a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeGrid {
    dim: Dimension,
    tags: Vec<Belief>,
}

impl KnowledgeGrid {
    pub fn new(dim: Dimension) -> Self {
        Self {
            dim,
            tags: vec![Belief::Unknown; dim.area() as usize],
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    fn slot(&self, cell: Cell) -> usize {
        debug_assert!(self.dim.holds(cell), "{cell} is off the {} grid", self.dim);
        ((cell.row() - 1) * self.dim.side() + (cell.col() - 1)) as usize
    }

    pub fn get(&self, cell: Cell) -> Belief {
        self.tags[self.slot(cell)]
    }

    pub fn is_excluded(&self, cell: Cell) -> bool {
        self.get(cell) == Belief::Excluded
    }

    /// Marks `cell` as excluded. Returns `true` if it was unknown before.
    pub fn exclude(&mut self, cell: Cell) -> bool {
        let slot = self.slot(cell);
        let was_unknown = self.tags[slot] == Belief::Unknown;
        self.tags[slot] = Belief::Excluded;
        was_unknown
    }

    /// Excluded cells in row-major order.
    pub fn excluded_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.dim.cells().filter(|cell| self.is_excluded(*cell))
    }

    pub fn excluded_count(&self) -> usize {
        self.tags.iter().filter(|t| **t == Belief::Excluded).count()
    }

    pub fn unknown_count(&self) -> usize {
        self.tags.len() - self.excluded_count()
    }

    /// Rendered rows, from row `D` down to row 1.
    pub fn rows(&self) -> Vec<String> {
        let side = self.dim.side();
        (1..=side)
            .rev()
            .map(|row| {
                (1..=side)
                    .map(|col| {
                        let cell = Cell::on_grid(self.dim, row, col);
                        self.get(cell).symbol().to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Parses one rendered block (see [`fmt::Display`]).
    pub fn parse(dim: Dimension, text: &str) -> Result<Self, SnapshotError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let side = dim.side();
        if lines.len() != side as usize {
            return Err(SnapshotError::RowCount {
                expected: side,
                found: lines.len(),
            });
        }
        let mut grid = Self::new(dim);
        for (i, line) in lines.iter().enumerate() {
            let row = side - i as u32;
            let symbols: Vec<&str> = line.split_whitespace().collect();
            if symbols.len() != side as usize {
                return Err(SnapshotError::ColumnCount {
                    row,
                    expected: side,
                    found: symbols.len(),
                });
            }
            for (j, symbol) in symbols.iter().enumerate() {
                let mut chars = symbol.chars();
                let belief = match (chars.next(), chars.next()) {
                    (Some(c), None) => Belief::from_symbol(c),
                    _ => None,
                }
                .ok_or_else(|| SnapshotError::UnknownSymbol {
                    row,
                    symbol: symbol.to_string(),
                })?;
                if belief == Belief::Excluded {
                    grid.exclude(Cell::on_grid(dim, row, j as u32 + 1));
                }
            }
        }
        Ok(grid)
    }

    /// Parses a sequence of rendered blocks separated by blank lines.
    pub fn parse_sequence(dim: Dimension, text: &str) -> Result<Vec<Self>, SnapshotError> {
        let mut out = Vec::new();
        let mut block = String::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                if !block.is_empty() {
                    out.push(Self::parse(dim, &block)?);
                    block.clear();
                }
            } else {
                block.push_str(line);
                block.push('\n');
            }
        }
        if !block.is_empty() {
            out.push(Self::parse(dim, &block)?);
        }
        Ok(out)
    }
}

impl fmt::Display for KnowledgeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl Serialize for KnowledgeGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
