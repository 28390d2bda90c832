//! Types for the service desk.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::responder::{ResponderId, Tier};
use crate::ticket::TicketId;

/// Errors that can occur during desk operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskError {
    /// The tier a ticket routes to has no responders.
    #[error("no responders available in {tier}")]
    EmptyPool { tier: Tier },

    /// Ticket not found.
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// Responder not found.
    #[error("responder not found: {0}")]
    ResponderNotFound(ResponderId),

    /// Responder id already present in one of the pools.
    #[error("responder already registered: {0}")]
    DuplicateResponder(ResponderId),

    /// Archived tickets are read-only.
    #[error("ticket {0} is archived and cannot be modified")]
    TicketArchived(TicketId),

    /// Report period with start after end.
    #[error("invalid period: {start} is after {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

/// What one pass of the refresh sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// Tickets inspected across every responder history.
    pub visited: usize,
    /// Completed tickets that had no timer and got one.
    pub timers_started: usize,
    /// Tickets archived by this pass.
    pub archived: usize,
    /// Desk clock reading the pass ran at.
    pub swept_at: DateTime<Utc>,
}

impl RefreshSummary {
    /// Returns true if the pass changed any ticket.
    pub fn changed_anything(&self) -> bool {
        self.timers_started > 0 || self.archived > 0
    }
}
