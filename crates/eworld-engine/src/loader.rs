//! Step, envelope and snapshot files.
//!
//! Step and envelope files hold whitespace-separated `row,col` tokens
//! (line breaks are treated as whitespace). Snapshot files hold rendered
//! knowledge grids separated by blank lines.

use indexmap::IndexSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use eworld_ir::grid::{Cell, Dimension, LayoutError, Position};
use eworld_ir::knowledge::{KnowledgeGrid, SnapshotError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{origin}: {source}")]
    Token {
        origin: String,
        source: LayoutError,
    },
    #[error("{origin}: envelope {position} lies outside the {dim} world")]
    EnvelopeOffGrid {
        origin: String,
        position: Position,
        dim: Dimension,
    },
    #[error("{origin}: no envelopes listed")]
    NoEnvelopes { origin: String },
    #[error("Step limit {requested} exceeds the {available} steps available")]
    StepLimit { requested: usize, available: usize },
    #[error("{origin}: {source}")]
    Snapshot {
        origin: String,
        source: SnapshotError,
    },
}

/// Everything needed to start a run.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub dim: Dimension,
    pub steps: Vec<Position>,
    pub envelopes: IndexSet<Cell>,
}

impl Scenario {
    /// Read both files and apply the optional step limit.
    pub fn load(
        dim: Dimension,
        steps_path: &Path,
        envelopes_path: &Path,
        num_steps: Option<usize>,
    ) -> Result<Self, LoadError> {
        let steps = truncate_steps(load_steps(steps_path)?, num_steps)?;
        let envelopes = load_envelopes(dim, envelopes_path)?;
        Ok(Self {
            dim,
            steps,
            envelopes,
        })
    }
}

fn tokens<'a>(
    text: &'a str,
    origin: &'a str,
) -> impl Iterator<Item = Result<Position, LoadError>> + 'a {
    text.split_whitespace().map(move |token| {
        token.parse::<Position>().map_err(|source| LoadError::Token {
            origin: origin.to_string(),
            source,
        })
    })
}

/// Parse a step list. Positions may lie off the grid; the environment rejects
/// those moves at run time.
pub fn parse_steps(text: &str, origin: &str) -> Result<Vec<Position>, LoadError> {
    tokens(text, origin).collect()
}

/// Parse an envelope list. Duplicates collapse in first-seen order.
pub fn parse_envelopes(
    dim: Dimension,
    text: &str,
    origin: &str,
) -> Result<IndexSet<Cell>, LoadError> {
    let mut envelopes = IndexSet::new();
    for position in tokens(text, origin) {
        let position = position?;
        let cell = dim
            .locate(position)
            .ok_or_else(|| LoadError::EnvelopeOffGrid {
                origin: origin.to_string(),
                position,
                dim,
            })?;
        envelopes.insert(cell);
    }
    if envelopes.is_empty() {
        return Err(LoadError::NoEnvelopes {
            origin: origin.to_string(),
        });
    }
    Ok(envelopes)
}

/// Keep the first `limit` steps. A limit beyond the list is an error.
pub fn truncate_steps(
    mut steps: Vec<Position>,
    limit: Option<usize>,
) -> Result<Vec<Position>, LoadError> {
    if let Some(requested) = limit {
        if requested > steps.len() {
            return Err(LoadError::StepLimit {
                requested,
                available: steps.len(),
            });
        }
        steps.truncate(requested);
    }
    Ok(steps)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_steps(path: &Path) -> Result<Vec<Position>, LoadError> {
    parse_steps(&read(path)?, &path.display().to_string())
}

pub fn load_envelopes(dim: Dimension, path: &Path) -> Result<IndexSet<Cell>, LoadError> {
    parse_envelopes(dim, &read(path)?, &path.display().to_string())
}

/// Expected knowledge grids, one per step.
pub fn load_snapshots(dim: Dimension, path: &Path) -> Result<Vec<KnowledgeGrid>, LoadError> {
    KnowledgeGrid::parse_sequence(dim, &read(path)?).map_err(|source| LoadError::Snapshot {
        origin: path.display().to_string(),
        source,
    })
}
