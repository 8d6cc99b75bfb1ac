use thiserror::Error;
use z3::SatResult as Z3SatResult;

use eworld_ir::variables::VarId;

use crate::clause::{Clause, Lit};
use crate::solver::{SatOracle, SatResult};

#[derive(Debug, Error)]
pub enum Z3Error {
    #[error("Unknown variable: {0}")]
    UnknownVariable(VarId),
}

pub struct Z3Solver {
    solver: z3::Solver,
    vars: Vec<z3::ast::Bool>,
    clauses: usize,
    _params: Option<z3::Params>,
}

impl Z3Solver {
    pub fn new() -> Self {
        Self {
            solver: z3::Solver::new(),
            vars: Vec::new(),
            clauses: 0,
            _params: None,
        }
    }

    /// Solver whose every check gives up after `timeout_secs` (0 = no limit).
    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        if timeout_secs == 0 {
            return Self::new();
        }
        let solver = z3::Solver::new();
        let mut params = z3::Params::new();
        let timeout_ms = timeout_secs.saturating_mul(1000).min(u64::from(u32::MAX));
        params.set_u32("timeout", timeout_ms as u32);
        solver.set_params(&params);
        Self {
            solver,
            vars: Vec::new(),
            clauses: 0,
            _params: Some(params),
        }
    }

    pub fn with_default_config() -> Self {
        Self::new()
    }

    pub fn has_timeout(&self) -> bool {
        self._params.is_some()
    }

    fn translate_lit(&self, lit: Lit) -> Result<z3::ast::Bool, Z3Error> {
        let index = lit.var() as usize;
        let var = index
            .checked_sub(1)
            .and_then(|i| self.vars.get(i))
            .ok_or(Z3Error::UnknownVariable(lit.var()))?;
        if lit.is_positive() {
            Ok(var.clone())
        } else {
            Ok(var.not())
        }
    }

    fn translate_clause(&self, clause: &Clause) -> Result<z3::ast::Bool, Z3Error> {
        if clause.is_empty() {
            return Ok(z3::ast::Bool::from_bool(false));
        }
        let lits: Result<Vec<_>, _> = clause
            .lits()
            .iter()
            .map(|lit| self.translate_lit(*lit))
            .collect();
        let lits = lits?;
        if lits.len() == 1 {
            return Ok(lits[0].clone());
        }
        let refs: Vec<&z3::ast::Bool> = lits.iter().collect();
        Ok(z3::ast::Bool::or(&refs))
    }

    fn convert(&self, result: Z3SatResult) -> SatResult {
        match result {
            Z3SatResult::Sat => SatResult::Sat,
            Z3SatResult::Unsat => SatResult::Unsat,
            Z3SatResult::Unknown => SatResult::Unknown(
                self.solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "Z3 returned unknown".into()),
            ),
        }
    }
}

impl Default for Z3Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatOracle for Z3Solver {
    type Error = Z3Error;

    fn declare_vars(&mut self, count: VarId) -> Result<(), Z3Error> {
        let count = count as usize;
        self.vars.reserve(count.saturating_sub(self.vars.len()));
        while self.vars.len() < count {
            let name = format!("v{}", self.vars.len() + 1);
            self.vars.push(z3::ast::Bool::new_const(name.as_str()));
        }
        Ok(())
    }

    fn add_clause(&mut self, clause: &Clause) -> Result<(), Z3Error> {
        let z3_clause = self.translate_clause(clause)?;
        self.solver.assert(&z3_clause);
        self.clauses += 1;
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Z3Error> {
        let result = self.solver.check();
        Ok(self.convert(result))
    }

    fn check_sat_assuming(&mut self, assumptions: &[Lit]) -> Result<SatResult, Z3Error> {
        let mut asts = Vec::with_capacity(assumptions.len());
        for lit in assumptions {
            asts.push(self.translate_lit(*lit)?);
        }
        let result = self.solver.check_assumptions(&asts);
        Ok(self.convert(result))
    }

    fn num_vars(&self) -> VarId {
        self.vars.len() as VarId
    }

    fn num_clauses(&self) -> usize {
        self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn z3_basic_sat() -> TestResult {
        let mut solver = Z3Solver::with_default_config();
        solver.declare_vars(2)?;

        // (x1 \/ x2) /\ -x1
        solver.add_clause(&Clause::binary(Lit::pos(1), Lit::pos(2)))?;
        solver.add_clause(&Clause::unit(Lit::neg(1)))?;
        assert_eq!(solver.check_sat()?, SatResult::Sat);
        assert_eq!(solver.num_clauses(), 2);
        Ok(())
    }

    #[test]
    fn z3_basic_unsat() -> TestResult {
        let mut solver = Z3Solver::with_default_config();
        solver.declare_vars(1)?;
        solver.add_clause(&Clause::unit(Lit::pos(1)))?;
        solver.add_clause(&Clause::unit(Lit::neg(1)))?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);
        Ok(())
    }

    #[test]
    fn z3_assumptions_do_not_persist() -> TestResult {
        let mut solver = Z3Solver::with_default_config();
        solver.declare_vars(2)?;

        // x1 -> x2, -x2
        solver.add_clause(&Clause::binary(Lit::neg(1), Lit::pos(2)))?;
        solver.add_clause(&Clause::unit(Lit::neg(2)))?;

        assert_eq!(solver.check_sat_assuming(&[Lit::pos(1)])?, SatResult::Unsat);
        assert_eq!(solver.check_sat_assuming(&[Lit::neg(1)])?, SatResult::Sat);
        assert_eq!(solver.check_sat()?, SatResult::Sat);
        Ok(())
    }

    #[test]
    fn z3_empty_clause_is_false() -> TestResult {
        let mut solver = Z3Solver::with_default_config();
        solver.add_clause(&Clause::default())?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);
        Ok(())
    }

    #[test]
    fn z3_undeclared_variable_is_rejected() -> TestResult {
        let mut solver = Z3Solver::with_default_config();
        solver.declare_vars(2)?;
        let err = solver.add_clause(&Clause::unit(Lit::pos(3)));
        assert!(matches!(err, Err(Z3Error::UnknownVariable(3))));
        let err = solver.check_sat_assuming(&[Lit::neg(9)]);
        assert!(matches!(err, Err(Z3Error::UnknownVariable(9))));
        assert_eq!(solver.num_clauses(), 0);
        Ok(())
    }

    #[test]
    fn z3_redeclaration_keeps_existing_vars() -> TestResult {
        let mut solver = Z3Solver::with_default_config();
        solver.declare_vars(3)?;
        solver.add_clause(&Clause::unit(Lit::pos(3)))?;
        solver.declare_vars(2)?;
        assert_eq!(solver.num_vars(), 3);
        solver.declare_vars(5)?;
        assert_eq!(solver.num_vars(), 5);
        solver.add_clause(&Clause::unit(Lit::neg(3)))?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);
        Ok(())
    }

    #[test]
    fn z3_timeout_configuration() -> TestResult {
        let mut solver = Z3Solver::with_timeout_secs(2);
        assert!(
            solver.has_timeout(),
            "timeout-backed solver should keep its params"
        );
        solver.declare_vars(1)?;
        solver.add_clause(&Clause::unit(Lit::pos(1)))?;
        assert_eq!(solver.check_sat()?, SatResult::Sat);
        assert!(!Z3Solver::with_timeout_secs(0).has_timeout());
        Ok(())
    }
}
