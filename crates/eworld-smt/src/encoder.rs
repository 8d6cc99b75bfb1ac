use std::fmt;
use tracing::debug;

use eworld_ir::channel::Channel;
use eworld_ir::grid::Cell;
use eworld_ir::protocol::SensorReading;
use eworld_ir::variables::{Block, VarId, VariableSpace};

use crate::clause::{Clause, Lit};

mod variables;

pub use variables::var_name;

/// Groups of clauses in the static world formula, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseFamily {
    /// At least one object among the `past` variables.
    PastAtLeastOne,
    /// At least one object among the `future` variables.
    FutureAtLeastOne,
    /// `future(c) -> past(c)` for every cell.
    TimeConsistency,
    /// `future(n) -> sense_k(c)` for every in-grid neighbor `n` of channel `k`.
    SensorSemantics(Channel),
}

impl ClauseFamily {
    pub const ALL: [ClauseFamily; 8] = [
        ClauseFamily::PastAtLeastOne,
        ClauseFamily::FutureAtLeastOne,
        ClauseFamily::TimeConsistency,
        ClauseFamily::SensorSemantics(Channel::North),
        ClauseFamily::SensorSemantics(Channel::East),
        ClauseFamily::SensorSemantics(Channel::South),
        ClauseFamily::SensorSemantics(Channel::West),
        ClauseFamily::SensorSemantics(Channel::SameCell),
    ];
}

impl fmt::Display for ClauseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseFamily::PastAtLeastOne => f.write_str("past-alo"),
            ClauseFamily::FutureAtLeastOne => f.write_str("future-alo"),
            ClauseFamily::TimeConsistency => f.write_str("time-consistency"),
            ClauseFamily::SensorSemantics(channel) => write!(f, "sensor-{channel}"),
        }
    }
}

/// Variables and clauses of the static world formula.
pub struct WorldEncoding {
    /// Number of variables the clauses range over (`7 * D^2`).
    pub num_vars: VarId,
    /// Clauses, grouped by family in [`ClauseFamily::ALL`] order.
    pub clauses: Vec<Clause>,
    family_sizes: Vec<(ClauseFamily, usize)>,
}

impl WorldEncoding {
    fn new(num_vars: VarId) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
            family_sizes: Vec::new(),
        }
    }

    fn emit_family(&mut self, family: ClauseFamily, clauses: impl IntoIterator<Item = Clause>) {
        let before = self.clauses.len();
        self.clauses.extend(clauses);
        self.family_sizes.push((family, self.clauses.len() - before));
    }

    /// Number of clauses emitted for `family`.
    pub fn family_size(&self, family: ClauseFamily) -> usize {
        self.family_sizes
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn family_sizes(&self) -> &[(ClauseFamily, usize)] {
        &self.family_sizes
    }
}

/// Encode the static formula: one-object floors, time consistency, and the
/// five sensor-semantics families.
pub fn encode_world(space: &VariableSpace) -> WorldEncoding {
    let dim = space.dimension();
    let mut encoding = WorldEncoding::new(space.total());

    encoding.emit_family(
        ClauseFamily::PastAtLeastOne,
        [at_least_one(space, Block::PastObject)],
    );
    encoding.emit_family(
        ClauseFamily::FutureAtLeastOne,
        [at_least_one(space, Block::FutureObject)],
    );
    encoding.emit_family(
        ClauseFamily::TimeConsistency,
        dim.cells().map(|cell| {
            Clause::binary(
                Lit::pos(space.var(cell, Block::PastObject)),
                Lit::neg(space.var(cell, Block::FutureObject)),
            )
        }),
    );
    for channel in Channel::ALL {
        let clauses: Vec<Clause> = dim
            .cells()
            .flat_map(|at| {
                let indicator = Lit::pos(space.var(at, Block::Sense(channel)));
                channel.influence(dim, at).map(move |neighbor| {
                    Clause::binary(
                        indicator,
                        Lit::neg(space.var(neighbor, Block::FutureObject)),
                    )
                })
            })
            .collect();
        encoding.emit_family(ClauseFamily::SensorSemantics(channel), clauses);
    }

    debug!(
        dimension = dim.side(),
        vars = encoding.num_vars,
        clauses = encoding.clauses.len(),
        "encoded world formula"
    );
    encoding
}

fn at_least_one(space: &VariableSpace, block: Block) -> Clause {
    space
        .dimension()
        .cells()
        .map(|cell| Lit::pos(space.var(cell, block)))
        .collect()
}

/// Unit clauses for one reading taken at `at`: `-sense_k(at)` for every
/// silent channel. Detections carry no evidence and produce nothing.
pub fn evidence_clauses(space: &VariableSpace, at: Cell, reading: SensorReading) -> Vec<Clause> {
    reading
        .silent_channels()
        .map(|channel| Clause::unit(Lit::neg(space.var(at, Block::Sense(channel)))))
        .collect()
}

/// Assumption whose refutation proves `cell` empty.
pub fn presence_hypothesis(space: &VariableSpace, cell: Cell) -> Lit {
    Lit::pos(space.var(cell, Block::FutureObject))
}

/// `-past(cell)`: a derived exclusion, committed at the start of the next step.
pub fn carry_forward_clause(space: &VariableSpace, cell: Cell) -> Clause {
    Clause::unit(Lit::neg(space.var(cell, Block::PastObject)))
}
