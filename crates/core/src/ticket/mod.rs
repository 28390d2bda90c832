//! Ticket types, lifecycle rules and the in-memory ticket arena.

mod store;
mod types;

pub use store::{CreateTicketRequest, TicketStore};
pub use types::{ParseEnumError, RefreshOutcome, Severity, Ticket, TicketId, TicketStatus};
