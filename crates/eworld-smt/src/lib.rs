#![doc = include_str!("../README.md")]

//! Clause encoding and solver integration for the Envelope World finder.
//!
//! The encoder turns the variable layout of `eworld-ir` into CNF; any
//! `SatOracle` backend can then be asked whether an envelope is still
//! possible at a cell.

pub mod backends;
pub mod clause;
pub mod encoder;
pub mod solver;
