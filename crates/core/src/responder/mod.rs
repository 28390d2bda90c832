//! Responder pools and their load counters.

mod registry;
mod types;

pub use registry::ResponderRegistry;
pub use types::{Responder, ResponderId, ResponderSnapshot, Tier};
