//! Inference session: the oracle, the knowledge grid, and the queue of
//! exclusions waiting to be committed.
//!
//! Per step the caller runs [`InferenceSession::commit_carry_forward`], then
//! [`InferenceSession::assert_evidence`] for the reading (if any), then
//! [`InferenceSession::check_consistency`] and [`InferenceSession::derive`].
//! Exclusions found by `derive` only reach the oracle at the next commit.

use thiserror::Error;
use tracing::debug;

use eworld_ir::grid::{Cell, Dimension};
use eworld_ir::knowledge::KnowledgeGrid;
use eworld_ir::protocol::SensorReading;
use eworld_ir::variables::VariableSpace;
use eworld_smt::clause::Clause;
use eworld_smt::encoder::{
    carry_forward_clause, encode_world, evidence_clauses, presence_hypothesis,
};
use eworld_smt::solver::{SatOracle, SatResult};

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("World formula is already installed in this session")]
    FormulaAlreadyInstalled,
    #[error("World formula must be installed before {0}")]
    FormulaNotInstalled(&'static str),
    #[error("World formula installation failed; this session cannot be used")]
    InstallAborted,
    #[error("Accumulated knowledge is contradictory after evidence at {at}")]
    Contradiction { at: Cell },
    #[error("SAT oracle gave up on {query}: {reason}")]
    OracleTimeout { query: String, reason: String },
    #[error("SAT oracle error: {0}")]
    Oracle(String),
}

pub struct InferenceSession<O: SatOracle> {
    space: VariableSpace,
    oracle: O,
    knowledge: KnowledgeGrid,
    carry_forward: Vec<Clause>,
    formula: FormulaState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormulaState {
    Absent,
    Installed,
    /// An installation stopped midway; the oracle holds a partial formula.
    Aborted,
}

impl<O: SatOracle> InferenceSession<O> {
    /// New session over `oracle`. The world formula is not installed yet.
    pub fn new(dim: Dimension, oracle: O) -> Self {
        Self {
            space: VariableSpace::new(dim),
            oracle,
            knowledge: KnowledgeGrid::new(dim),
            carry_forward: Vec::new(),
            formula: FormulaState::Absent,
        }
    }

    /// Declare every variable and assert the static world formula.
    ///
    /// Returns the number of clauses asserted. Only one installation per
    /// session is allowed; if it fails, the session is unusable.
    pub fn install_formula(&mut self) -> Result<usize, InferenceError> {
        match self.formula {
            FormulaState::Absent => {}
            FormulaState::Installed => return Err(InferenceError::FormulaAlreadyInstalled),
            FormulaState::Aborted => return Err(InferenceError::InstallAborted),
        }
        self.formula = FormulaState::Aborted;
        let encoding = encode_world(&self.space);
        self.oracle
            .declare_vars(encoding.num_vars)
            .map_err(oracle_error)?;
        for clause in &encoding.clauses {
            self.oracle.add_clause(clause).map_err(oracle_error)?;
        }
        self.formula = FormulaState::Installed;
        Ok(encoding.clauses.len())
    }

    /// Assert the exclusions derived during the previous step and empty the
    /// queue. Returns how many clauses were committed.
    pub fn commit_carry_forward(&mut self) -> Result<usize, InferenceError> {
        self.require_formula("committing exclusions")?;
        let pending = std::mem::take(&mut self.carry_forward);
        for clause in &pending {
            self.oracle.add_clause(clause).map_err(oracle_error)?;
        }
        if !pending.is_empty() {
            debug!(committed = pending.len(), "committed carry-forward clauses");
        }
        Ok(pending.len())
    }

    /// Assert `-sense_k(at)` for every silent channel of `reading`.
    pub fn assert_evidence(
        &mut self,
        at: Cell,
        reading: SensorReading,
    ) -> Result<usize, InferenceError> {
        self.require_formula("asserting evidence")?;
        let clauses = evidence_clauses(&self.space, at, reading);
        for clause in &clauses {
            self.oracle.add_clause(clause).map_err(oracle_error)?;
        }
        debug!(%at, %reading, asserted = clauses.len(), "asserted sensor evidence");
        Ok(clauses.len())
    }

    /// Fail if everything asserted so far no longer has a model.
    pub fn check_consistency(&mut self, at: Cell) -> Result<(), InferenceError> {
        self.require_formula("checking consistency")?;
        match self.oracle.check_sat().map_err(oracle_error)? {
            SatResult::Sat => Ok(()),
            SatResult::Unsat => Err(InferenceError::Contradiction { at }),
            SatResult::Unknown(reason) => Err(InferenceError::OracleTimeout {
                query: "consistency check".into(),
                reason,
            }),
        }
    }

    /// Query every cell in row-major order. See [`InferenceSession::derive_cells`].
    pub fn derive(&mut self) -> Result<Vec<Cell>, InferenceError> {
        let cells: Vec<Cell> = self.space.dimension().cells().collect();
        self.derive_cells(cells)
    }

    /// Ask, for each cell, whether an object there is still possible.
    ///
    /// Refuted cells are excluded in the knowledge grid and queue `-past(cell)`
    /// for the next commit, the latter only on their first exclusion. Grid
    /// updates are applied after every query has answered, so a timeout leaves
    /// the grid untouched. Returns the newly excluded cells.
    pub fn derive_cells(
        &mut self,
        cells: impl IntoIterator<Item = Cell>,
    ) -> Result<Vec<Cell>, InferenceError> {
        self.require_formula("deriving exclusions")?;
        let mut refuted = Vec::new();
        for cell in cells {
            let hypothesis = presence_hypothesis(&self.space, cell);
            match self
                .oracle
                .check_sat_assuming(&[hypothesis])
                .map_err(oracle_error)?
            {
                SatResult::Sat => {}
                SatResult::Unsat => refuted.push(cell),
                SatResult::Unknown(reason) => {
                    return Err(InferenceError::OracleTimeout {
                        query: format!("presence at {cell}"),
                        reason,
                    })
                }
            }
        }

        let mut newly_excluded = Vec::new();
        for cell in refuted {
            if self.knowledge.exclude(cell) {
                self.carry_forward.push(carry_forward_clause(&self.space, cell));
                newly_excluded.push(cell);
            }
        }
        debug!(
            newly_excluded = newly_excluded.len(),
            excluded = self.knowledge.excluded_count(),
            "derived exclusions"
        );
        Ok(newly_excluded)
    }

    pub fn knowledge(&self) -> &KnowledgeGrid {
        &self.knowledge
    }

    pub fn space(&self) -> &VariableSpace {
        &self.space
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Clauses queued for the next commit.
    pub fn pending_carry_forward(&self) -> &[Clause] {
        &self.carry_forward
    }

    /// Clauses asserted into the oracle so far.
    pub fn clause_count(&self) -> usize {
        self.oracle.num_clauses()
    }

    pub fn is_installed(&self) -> bool {
        self.formula == FormulaState::Installed
    }

    fn require_formula(&self, action: &'static str) -> Result<(), InferenceError> {
        match self.formula {
            FormulaState::Installed => Ok(()),
            FormulaState::Absent => Err(InferenceError::FormulaNotInstalled(action)),
            FormulaState::Aborted => Err(InferenceError::InstallAborted),
        }
    }
}

fn oracle_error(err: impl std::error::Error) -> InferenceError {
    InferenceError::Oracle(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eworld_ir::variables::{Block, VarId};
    use eworld_smt::clause::Lit;
    use std::collections::HashSet;
    use std::io;

    /// Oracle that refutes a fixed set of presence hypotheses.
    struct ScriptedOracle {
        vars: VarId,
        clauses: Vec<Clause>,
        refuted: HashSet<VarId>,
        gives_up_on: Option<VarId>,
        global: SatResult,
        queries: Vec<Lit>,
        /// Reject `add_clause` once this many clauses are held.
        capacity: Option<usize>,
    }

    impl ScriptedOracle {
        fn new() -> Self {
            Self {
                vars: 0,
                clauses: Vec::new(),
                refuted: HashSet::new(),
                gives_up_on: None,
                global: SatResult::Sat,
                queries: Vec::new(),
                capacity: None,
            }
        }
    }

    impl SatOracle for ScriptedOracle {
        type Error = io::Error;

        fn declare_vars(&mut self, count: VarId) -> Result<(), io::Error> {
            self.vars = self.vars.max(count);
            Ok(())
        }

        fn add_clause(&mut self, clause: &Clause) -> Result<(), io::Error> {
            if self.capacity == Some(self.clauses.len()) {
                return Err(io::Error::other("oracle full"));
            }
            self.clauses.push(clause.clone());
            Ok(())
        }

        fn check_sat(&mut self) -> Result<SatResult, io::Error> {
            Ok(self.global.clone())
        }

        fn check_sat_assuming(&mut self, assumptions: &[Lit]) -> Result<SatResult, io::Error> {
            let lit = assumptions[0];
            self.queries.push(lit);
            if Some(lit.var()) == self.gives_up_on {
                return Ok(SatResult::Unknown("timeout".into()));
            }
            if self.refuted.contains(&lit.var()) {
                Ok(SatResult::Unsat)
            } else {
                Ok(SatResult::Sat)
            }
        }

        fn num_vars(&self) -> VarId {
            self.vars
        }

        fn num_clauses(&self) -> usize {
            self.clauses.len()
        }
    }

    fn dim(side: u32) -> Dimension {
        Dimension::new(side).unwrap()
    }

    fn installed_session(side: u32, oracle: ScriptedOracle) -> InferenceSession<ScriptedOracle> {
        let mut session = InferenceSession::new(dim(side), oracle);
        session.install_formula().unwrap();
        session
    }

    fn future(session: &InferenceSession<ScriptedOracle>, row: i64, col: i64) -> VarId {
        let cell = session.space().dimension().cell(row, col).unwrap();
        session.space().var(cell, Block::FutureObject)
    }

    #[test]
    fn formula_installs_once() {
        let mut session = InferenceSession::new(dim(2), ScriptedOracle::new());
        let installed = session.install_formula().unwrap();
        assert_eq!(installed, session.clause_count());
        assert_eq!(session.oracle().num_vars(), 28);
        assert!(matches!(
            session.install_formula(),
            Err(InferenceError::FormulaAlreadyInstalled)
        ));
        assert_eq!(installed, session.clause_count());
    }

    #[test]
    fn failed_install_poisons_the_session() {
        let mut oracle = ScriptedOracle::new();
        oracle.capacity = Some(5);
        let mut session = InferenceSession::new(dim(2), oracle);
        assert!(matches!(session.install_formula(), Err(InferenceError::Oracle(_))));
        assert_eq!(session.clause_count(), 5);
        assert!(!session.is_installed());

        // No second attempt on top of the partial formula.
        session.oracle.capacity = None;
        assert!(matches!(
            session.install_formula(),
            Err(InferenceError::InstallAborted)
        ));
        assert_eq!(session.clause_count(), 5);
        assert!(matches!(session.derive(), Err(InferenceError::InstallAborted)));
    }

    #[test]
    fn operations_require_installed_formula() {
        let mut session = InferenceSession::new(dim(2), ScriptedOracle::new());
        assert!(matches!(
            session.derive(),
            Err(InferenceError::FormulaNotInstalled(_))
        ));
        assert!(matches!(
            session.commit_carry_forward(),
            Err(InferenceError::FormulaNotInstalled(_))
        ));
    }

    #[test]
    fn refuted_cells_are_excluded_and_queued_once() {
        let mut session = installed_session(3, ScriptedOracle::new());
        let var = future(&session, 1, 2);
        session.oracle.refuted.insert(var);
        let target = session.space().dimension().cell(1, 2).unwrap();

        let newly = session.derive().unwrap();
        assert_eq!(newly, vec![target]);
        assert!(session.knowledge().is_excluded(target));
        assert_eq!(session.pending_carry_forward().len(), 1);

        // The queue is only asserted at the next commit.
        let before = session.clause_count();
        assert_eq!(session.commit_carry_forward().unwrap(), 1);
        assert_eq!(session.clause_count(), before + 1);
        assert!(session.pending_carry_forward().is_empty());

        // Still refuted, but already known: no new clause.
        let newly = session.derive().unwrap();
        assert!(newly.is_empty());
        assert!(session.pending_carry_forward().is_empty());
        assert_eq!(session.oracle.queries.len(), 18);
    }

    #[test]
    fn timeout_leaves_grid_untouched() {
        let mut session = installed_session(2, ScriptedOracle::new());
        let first = future(&session, 1, 1);
        let last = future(&session, 2, 2);
        session.oracle.refuted.insert(first);
        session.oracle.gives_up_on = Some(last);

        let err = session.derive().unwrap_err();
        assert!(matches!(err, InferenceError::OracleTimeout { .. }));
        assert_eq!(session.knowledge().excluded_count(), 0);
        assert!(session.pending_carry_forward().is_empty());
    }

    #[test]
    fn contradiction_and_timeout_are_distinct() {
        let mut oracle = ScriptedOracle::new();
        oracle.global = SatResult::Unsat;
        let mut session = installed_session(2, oracle);
        let at = session.space().dimension().cell(1, 1).unwrap();
        assert!(matches!(
            session.check_consistency(at),
            Err(InferenceError::Contradiction { .. })
        ));

        session.oracle.global = SatResult::Unknown("timeout".into());
        assert!(matches!(
            session.check_consistency(at),
            Err(InferenceError::OracleTimeout { .. })
        ));
    }

    #[test]
    fn evidence_asserts_one_clause_per_silent_channel() {
        let mut session = installed_session(3, ScriptedOracle::new());
        let at = session.space().dimension().cell(2, 2).unwrap();
        let before = session.clause_count();
        let asserted = session
            .assert_evidence(at, "10100".parse().unwrap())
            .unwrap();
        assert_eq!(asserted, 3);
        assert_eq!(session.clause_count(), before + 3);
    }
}
