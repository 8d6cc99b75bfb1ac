#![doc = include_str!("../README.md")]

//! Envelope World step driver.
//!
//! This crate ties the pieces together: the simulated world answers the
//! agent's requests, the inference session turns readings into clauses and
//! refutation queries, and the finder sequences one step after another.

pub mod environment;
pub mod evidence;
pub mod finder;
pub mod loader;
pub mod result;
pub mod session;
