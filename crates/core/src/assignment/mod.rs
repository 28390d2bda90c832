//! Assignment engine.
//!
//! Routing is two-step:
//! 1. Tier selection: `High` severity goes to tier 2, everything else to tier 1
//! 2. Responder selection: least lifetime assignments, random only when the
//!    whole pool is balanced

mod engine;

pub use engine::{select_index, Assignment, AssignmentEngine};
