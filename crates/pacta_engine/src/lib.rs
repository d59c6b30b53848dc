//! Deterministic execution engine for smart legal contract clauses.
//!
//! Maps (clause, request, prior state) to (new state, response, emitted
//! events). No clock, no randomness, no IO: every peer executing the same
//! inputs derives the identical result.

pub mod engine;
pub mod error;

pub use engine::{Engine, EngineResult};
pub use error::{EngineError, Result};
