use std::fmt::Write as _;

use eworld_ir::variables::{VarId, VariableSpace};

use crate::clause::{Clause, Lit};
use crate::encoder::var_name;

/// Print a literal as SMT-LIB2 format.
pub fn lit_to_smtlib(space: &VariableSpace, lit: Lit) -> String {
    let name = var_name(space, lit.var());
    if lit.is_positive() {
        name
    } else {
        format!("(not {name})")
    }
}

/// Print a clause as SMT-LIB2 format.
pub fn clause_to_smtlib(space: &VariableSpace, clause: &Clause) -> String {
    match clause.lits() {
        [] => "false".to_string(),
        [lit] => lit_to_smtlib(space, *lit),
        lits => {
            let inner: Vec<String> = lits.iter().map(|l| lit_to_smtlib(space, *l)).collect();
            format!("(or {})", inner.join(" "))
        }
    }
}

/// Full script: declarations for `1..=num_vars`, one `assert` per clause,
/// then `(check-sat)`.
pub fn script(space: &VariableSpace, num_vars: VarId, clauses: &[Clause]) -> String {
    let mut out = String::new();
    out.push_str("(set-logic QF_UF)\n");
    for var in 1..=num_vars {
        let _ = writeln!(out, "(declare-const {} Bool)", var_name(space, var));
    }
    for clause in clauses {
        let _ = writeln!(out, "(assert {})", clause_to_smtlib(space, clause));
    }
    out.push_str("(check-sat)\n");
    out
}
