//! World geometry: dimension, raw positions, and bounds-checked cells.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest supported world side.
///
/// Keeps `7 * D^2` comfortably inside the `u32` variable id range.
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("World dimension must be at least 1")]
    ZeroDimension,
    #[error("World dimension {0} exceeds the supported maximum of {MAX_DIMENSION}")]
    DimensionTooLarge(u32),
    #[error("Malformed position '{0}': expected 'row,col'")]
    MalformedPosition(String),
}

/// Side length `D` of the square world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Dimension(u32);

impl Dimension {
    pub fn new(side: u32) -> Result<Self, LayoutError> {
        if side == 0 {
            return Err(LayoutError::ZeroDimension);
        }
        if side > MAX_DIMENSION {
            return Err(LayoutError::DimensionTooLarge(side));
        }
        Ok(Self(side))
    }

    pub fn side(self) -> u32 {
        self.0
    }

    /// Number of cells, `D^2`.
    pub fn area(self) -> u32 {
        self.0 * self.0
    }

    /// Bounds-check raw coordinates.
    pub fn cell(self, row: i64, col: i64) -> Option<Cell> {
        let side = i64::from(self.0);
        if (1..=side).contains(&row) && (1..=side).contains(&col) {
            Some(Cell {
                row: row as u32,
                col: col as u32,
            })
        } else {
            None
        }
    }

    pub fn locate(self, position: Position) -> Option<Cell> {
        self.cell(position.row, position.col)
    }

    pub fn contains(self, position: Position) -> bool {
        self.locate(position).is_some()
    }

    /// Whether `cell` lies on this grid. A cell built from a larger
    /// dimension may not.
    pub fn holds(self, cell: Cell) -> bool {
        cell.row <= self.0 && cell.col <= self.0
    }

    /// Neighbor of `cell` shifted by `(d_row, d_col)`, if it stays on the grid.
    pub fn offset(self, cell: Cell, d_row: i64, d_col: i64) -> Option<Cell> {
        self.cell(i64::from(cell.row) + d_row, i64::from(cell.col) + d_col)
    }

    /// All cells in row-major order, `(1,1), (1,2), ..., (D,D)`.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let side = self.0;
        (1..=side).flat_map(move |row| (1..=side).map(move |col| Cell { row, col }))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Unchecked coordinates, as they appear in step files and move requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: i64,
    pub col: i64,
}

impl Position {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = LayoutError;

    /// Parses the `row,col` token format used by step and envelope files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || LayoutError::MalformedPosition(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(malformed)?;
        let row = row.trim().parse::<i64>().map_err(|_| malformed())?;
        let col = col.trim().parse::<i64>().map_err(|_| malformed())?;
        Ok(Self { row, col })
    }
}

/// A grid cell, 1-indexed. Only obtainable through [`Dimension`] bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    row: u32,
    col: u32,
}

impl Cell {
    /// Cell for coordinates already known to lie on `dim`.
    pub(crate) fn on_grid(dim: Dimension, row: u32, col: u32) -> Cell {
        debug_assert!((1..=dim.side()).contains(&row) && (1..=dim.side()).contains(&col));
        Cell { row, col }
    }

    pub fn row(self) -> u32 {
        self.row
    }

    pub fn col(self) -> u32 {
        self.col
    }

    pub fn position(self) -> Position {
        Position::new(i64::from(self.row), i64::from(self.col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl From<Cell> for Position {
    fn from(cell: Cell) -> Self {
        cell.position()
    }
}
