//! Deterministic, pure logic for candidate evaluation.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod candidates;
pub mod evaluator;
pub mod probe;
pub mod report;
pub mod types;
