#![doc = include_str!("../README.md")]

//! Envelope World intermediate representation.
//!
//! Everything in this crate is solver-agnostic: the SMT encoding lives in
//! `eworld-smt` and the step driver in `eworld-engine`.

pub mod channel;
pub mod grid;
pub mod knowledge;
pub mod protocol;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod variables;
