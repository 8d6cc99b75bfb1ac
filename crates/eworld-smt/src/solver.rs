use eworld_ir::variables::VarId;

use crate::clause::{Clause, Lit};

/// Result of a satisfiability check.
#[derive(Debug, Clone, PartialEq)]
pub enum SatResult {
    Sat,
    Unsat,
    /// The backend gave up, e.g. on timeout. Carries the backend's reason.
    Unknown(String),
}

/// Abstract SAT oracle interface.
///
/// Clauses only ever accumulate: there is no retraction, push/pop, or reset.
/// Temporary hypotheses go through [`SatOracle::check_sat_assuming`].
pub trait SatOracle {
    type Error: std::error::Error;

    /// Make variables `1..=count` available. Ids already declared are kept.
    fn declare_vars(&mut self, count: VarId) -> Result<(), Self::Error>;

    /// Assert a clause permanently.
    fn add_clause(&mut self, clause: &Clause) -> Result<(), Self::Error>;

    /// Check satisfiability of everything asserted so far.
    fn check_sat(&mut self) -> Result<SatResult, Self::Error>;

    /// Check satisfiability with `assumptions` holding for this query only.
    fn check_sat_assuming(&mut self, assumptions: &[Lit]) -> Result<SatResult, Self::Error>;

    /// Number of declared variables.
    fn num_vars(&self) -> VarId;

    /// Number of clauses asserted so far.
    fn num_clauses(&self) -> usize;
}
