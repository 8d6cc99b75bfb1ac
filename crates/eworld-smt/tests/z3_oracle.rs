//! End-to-end checks of the world encoding against the Z3 backend.

use eworld_ir::grid::{Cell, Dimension};
use eworld_ir::protocol::SensorReading;
use eworld_ir::variables::VariableSpace;
use eworld_smt::backends::z3_backend::Z3Solver;
use eworld_smt::encoder::{
    carry_forward_clause, encode_world, evidence_clauses, presence_hypothesis,
};
use eworld_smt::solver::{SatOracle, SatResult};

fn loaded_solver(space: &VariableSpace) -> Z3Solver {
    let encoding = encode_world(space);
    let mut solver = Z3Solver::with_default_config();
    solver.declare_vars(encoding.num_vars).unwrap();
    for clause in &encoding.clauses {
        solver.add_clause(clause).unwrap();
    }
    solver
}

fn cell(space: &VariableSpace, row: i64, col: i64) -> Cell {
    space.dimension().cell(row, col).unwrap()
}

fn reading(text: &str) -> SensorReading {
    text.parse().unwrap()
}

#[test]
fn static_formula_is_satisfiable_for_every_hypothesis() {
    let space = VariableSpace::new(Dimension::new(3).unwrap());
    let mut solver = loaded_solver(&space);
    assert_eq!(solver.check_sat().unwrap(), SatResult::Sat);
    for c in space.dimension().cells() {
        let lit = presence_hypothesis(&space, c);
        assert_eq!(solver.check_sat_assuming(&[lit]).unwrap(), SatResult::Sat);
    }
}

#[test]
fn silent_corner_reading_refutes_its_neighbors() {
    let space = VariableSpace::new(Dimension::new(3).unwrap());
    let mut solver = loaded_solver(&space);
    for clause in evidence_clauses(&space, cell(&space, 1, 1), reading("00001")) {
        solver.add_clause(&clause).unwrap();
    }

    for (row, col) in [(2, 1), (2, 2), (1, 2)] {
        let lit = presence_hypothesis(&space, cell(&space, row, col));
        assert_eq!(
            solver.check_sat_assuming(&[lit]).unwrap(),
            SatResult::Unsat,
            "({row},{col}) should be excluded"
        );
    }
    for (row, col) in [(1, 1), (3, 3), (1, 3)] {
        let lit = presence_hypothesis(&space, cell(&space, row, col));
        assert_eq!(solver.check_sat_assuming(&[lit]).unwrap(), SatResult::Sat);
    }
}

#[test]
fn all_silent_center_reading_contradicts_the_one_object_floor() {
    let space = VariableSpace::new(Dimension::new(3).unwrap());
    let mut solver = loaded_solver(&space);
    for clause in evidence_clauses(&space, cell(&space, 2, 2), reading("00000")) {
        solver.add_clause(&clause).unwrap();
    }
    assert_eq!(solver.check_sat().unwrap(), SatResult::Unsat);
}

#[test]
fn carried_exclusions_constrain_later_hypotheses() {
    let space = VariableSpace::new(Dimension::new(2).unwrap());
    let mut solver = loaded_solver(&space);
    let target = cell(&space, 2, 2);
    solver.add_clause(&carry_forward_clause(&space, target)).unwrap();
    let lit = presence_hypothesis(&space, target);
    assert_eq!(solver.check_sat_assuming(&[lit]).unwrap(), SatResult::Unsat);
    assert_eq!(solver.check_sat().unwrap(), SatResult::Sat);
}
