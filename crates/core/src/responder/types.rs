//! Responder data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ticket::{Severity, TicketId};

/// Responder pool. Tier 2 handles high-severity tickets exclusively.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Tier1,
    Tier2,
}

impl Tier {
    /// Both tiers in sweep order.
    pub const ALL: [Tier; 2] = [Tier::Tier1, Tier::Tier2];

    /// Route a severity to the tier that handles it.
    pub fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::High => Tier::Tier2,
            Severity::Low | Severity::Medium => Tier::Tier1,
        }
    }

    /// Key used for this tier in the `[responders]` config table.
    pub fn config_key(&self) -> &'static str {
        match self {
            Tier::Tier1 => "tier1",
            Tier::Tier2 => "tier2",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Tier1 => write!(f, "tier 1"),
            Tier::Tier2 => write!(f, "tier 2"),
        }
    }
}

/// Stable responder identity (usually an e-mail address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponderId(String);

impl ResponderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResponderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResponderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResponderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl FromStr for ResponderId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// A responder owned by the registry.
///
/// `assignment_count` counts every assignment ever made to this responder and
/// is never decremented, so load balancing works on lifetime volume rather
/// than on current open work.
#[derive(Debug, Clone, PartialEq)]
pub struct Responder {
    id: ResponderId,
    name: String,
    tier: Tier,
    assignment_count: u64,
    tickets: Vec<TicketId>,
}

impl Responder {
    pub fn new(id: ResponderId, name: impl Into<String>, tier: Tier) -> Self {
        Self {
            id,
            name: name.into(),
            tier,
            assignment_count: 0,
            tickets: Vec::new(),
        }
    }

    pub fn id(&self) -> &ResponderId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn assignment_count(&self) -> u64 {
        self.assignment_count
    }

    /// Tickets currently attached to this responder, in assignment order.
    pub fn tickets(&self) -> &[TicketId] {
        &self.tickets
    }

    /// Count the assignment and attach the ticket to the active history.
    pub(crate) fn record_assignment(&mut self, ticket_id: TicketId) {
        self.assignment_count += 1;
        if !self.tickets.contains(&ticket_id) {
            self.tickets.push(ticket_id);
        }
    }

    /// Detach a ticket from the active history. The assignment count is kept.
    pub(crate) fn forget_ticket(&mut self, ticket_id: &TicketId) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|id| id != ticket_id);
        self.tickets.len() != before
    }

    pub fn snapshot(&self) -> ResponderSnapshot {
        ResponderSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            tier: self.tier,
            assignment_count: self.assignment_count,
            active_tickets: self.tickets.len(),
            tickets: self.tickets.clone(),
        }
    }
}

/// Read-only view of a responder handed out to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderSnapshot {
    pub id: ResponderId,
    pub name: String,
    pub tier: Tier,
    pub assignment_count: u64,
    pub active_tickets: usize,
    /// Attached ticket ids, in assignment order.
    pub tickets: Vec<TicketId>,
}
