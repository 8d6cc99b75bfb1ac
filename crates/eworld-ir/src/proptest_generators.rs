//! Proptest strategies for generating small Envelope World scenarios.

use proptest::prelude::*;

use crate::grid::{Cell, Dimension, Position};

/// A world plus a walk through it.
#[derive(Debug, Clone)]
pub struct ScenarioCase {
    pub dim: Dimension,
    pub envelopes: Vec<Cell>,
    pub steps: Vec<Position>,
}

/// Strategy for a dimension in `1..=max_side`.
pub fn arb_dimension(max_side: u32) -> impl Strategy<Value = Dimension> {
    (1..=max_side).prop_map(|side| Dimension::new(side).expect("side within bounds"))
}

/// Strategy for a cell of `dim`.
pub fn arb_cell(dim: Dimension) -> impl Strategy<Value = Cell> {
    let side = i64::from(dim.side());
    (1..=side, 1..=side).prop_map(move |(row, col)| dim.cell(row, col).expect("on grid"))
}

/// Strategy for a move target; roughly one in eight lands off the grid.
pub fn arb_position(dim: Dimension) -> impl Strategy<Value = Position> {
    let side = i64::from(dim.side());
    prop_oneof![
        7 => (1..=side, 1..=side).prop_map(|(row, col)| Position::new(row, col)),
        1 => (-1..=side + 1, -1..=side + 1).prop_map(|(row, col)| Position::new(row, col)),
    ]
}

/// Strategy for a full scenario:
/// - side in `2..=max_side`
/// - 1-3 envelopes (duplicates allowed, they collapse in the world)
/// - 1-`max_steps` moves
pub fn arb_scenario(max_side: u32, max_steps: usize) -> impl Strategy<Value = ScenarioCase> {
    (2..=max_side.max(2))
        .prop_map(|side| Dimension::new(side).expect("side within bounds"))
        .prop_flat_map(move |dim| {
            (
                Just(dim),
                proptest::collection::vec(arb_cell(dim), 1..=3),
                proptest::collection::vec(arb_position(dim), 1..=max_steps.max(1)),
            )
        })
        .prop_map(|(dim, envelopes, steps)| ScenarioCase {
            dim,
            envelopes,
            steps,
        })
}
