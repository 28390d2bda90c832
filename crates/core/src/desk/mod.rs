//! Service desk facade.
//!
//! [`ServiceDesk`] owns the responder pools and every ticket behind a single
//! lock. Submission, edits, queries and the refresh sweep all go through it.

mod service;
mod types;

pub use service::ServiceDesk;
pub use types::{DeskError, RefreshSummary};
