//! Core ticket data types and the lifecycle state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::responder::{ResponderId, Tier};

// ============================================================================
// Identity
// ============================================================================

/// Unique ticket identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Generate a fresh random id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TicketId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// Severity & Status
// ============================================================================

/// Ticket priority. Decides which tier handles the ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// The responder tier this severity routes to.
    pub fn tier(&self) -> Tier {
        Tier::for_severity(*self)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a severity or status from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(ParseEnumError {
                kind: "severity",
                value: s.to_string(),
            }),
        }
    }
}

/// Ticket status. Archival is tracked separately by [`Ticket::archived`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    CompletedResolved,
    CompletedUnresolved,
}

impl TicketStatus {
    /// Returns true for either completed status.
    pub fn is_completed(&self) -> bool {
        !matches!(self, TicketStatus::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::CompletedResolved => "completed_resolved",
            TicketStatus::CompletedUnresolved => "completed_unresolved",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "completed_resolved" | "resolved" => Ok(TicketStatus::CompletedResolved),
            "completed_unresolved" | "unresolved" => Ok(TicketStatus::CompletedUnresolved),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Refresh outcome
// ============================================================================

/// What a single refresh did to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Ticket is open; nothing to age.
    Open,
    /// Completed ticket had no timer; the timer starts now.
    TimerStarted,
    /// Completed ticket is still inside the archival window.
    Waiting,
    /// Window elapsed during this refresh; ticket is now archived.
    Archived,
    /// Ticket was archived by an earlier refresh.
    AlreadyArchived,
}

// ============================================================================
// Ticket
// ============================================================================

/// A support request routed to a responder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Unique identifier.
    pub id: TicketId,

    /// Free-text description of the issue.
    pub description: String,

    /// Current severity.
    pub severity: Severity,

    /// Current status.
    pub status: TicketStatus,

    /// Set by the refresh sweep once a completed ticket has aged past the window.
    pub archived: bool,

    /// Requester who filed the ticket.
    pub created_by: String,

    /// Responder currently holding the ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_responder: Option<ResponderId>,

    /// When the ticket was created.
    pub created_at: DateTime<Utc>,

    /// When the ticket most recently left `Open`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_marked_at: Option<DateTime<Utc>>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Create an unassigned ticket.
    ///
    /// A ticket seeded with a completed status gets no timer here; the next
    /// refresh starts it.
    pub fn new(
        description: impl Into<String>,
        severity: Severity,
        status: TicketStatus,
        created_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TicketId::new(),
            description: description.into(),
            severity,
            status,
            archived: false,
            created_by: created_by.into(),
            assigned_responder: None,
            created_at: now,
            completion_marked_at: None,
            updated_at: now,
        }
    }

    /// Tier this ticket routes to under its current severity.
    pub fn tier(&self) -> Tier {
        self.severity.tier()
    }

    pub fn is_open(&self) -> bool {
        self.status == TicketStatus::Open
    }

    /// Change status, returning the previous one.
    ///
    /// Leaving `Open` starts the completion timer unless one is already
    /// running; moving between the two completed statuses keeps it. Returning
    /// to `Open` clears the timer and the archived flag.
    pub fn set_status(&mut self, status: TicketStatus, now: DateTime<Utc>) -> TicketStatus {
        let previous = self.status;
        self.status = status;

        if status.is_completed() {
            if self.completion_marked_at.is_none() {
                self.completion_marked_at = Some(now);
            }
        } else {
            self.completion_marked_at = None;
            self.archived = false;
        }

        self.updated_at = now;
        previous
    }

    /// Change severity, returning true when the routing tier changed.
    pub fn set_severity(&mut self, severity: Severity, now: DateTime<Utc>) -> bool {
        let previous_tier = self.tier();
        self.severity = severity;
        self.updated_at = now;
        previous_tier != self.tier()
    }

    /// Advance archival state. Never touches `status`; repeated calls at the
    /// same instant change nothing after the first.
    pub fn refresh(&mut self, now: DateTime<Utc>, window: Duration) -> RefreshOutcome {
        if self.is_open() {
            self.completion_marked_at = None;
            self.archived = false;
            return RefreshOutcome::Open;
        }

        let Some(marked_at) = self.completion_marked_at else {
            self.completion_marked_at = Some(now);
            self.updated_at = now;
            return RefreshOutcome::TimerStarted;
        };

        if self.archived {
            return RefreshOutcome::AlreadyArchived;
        }

        if now - marked_at >= window {
            self.archived = true;
            self.updated_at = now;
            RefreshOutcome::Archived
        } else {
            RefreshOutcome::Waiting
        }
    }

    /// Calendar days (UTC) from creation to completion, counting both ends.
    /// A ticket completed on the day it was opened was active 1 day. None
    /// while open.
    pub fn days_active(&self) -> Option<i64> {
        if self.is_open() {
            return None;
        }
        self.completion_marked_at.map(|completed| {
            (completed.date_naive() - self.created_at.date_naive())
                .num_days()
                .abs()
                + 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn open_ticket() -> Ticket {
        Ticket::new("Printer on fire", Severity::Low, TicketStatus::Open, "staff@x", t0())
    }

    #[test]
    fn test_new_ticket_is_open_and_unassigned() {
        let ticket = open_ticket();
        assert!(ticket.is_open());
        assert!(!ticket.archived);
        assert!(ticket.assigned_responder.is_none());
        assert!(ticket.completion_marked_at.is_none());
        assert_eq!(ticket.created_at, t0());
    }

    #[test]
    fn test_completing_starts_timer() {
        let mut ticket = open_ticket();
        let done = t0() + Duration::hours(2);
        let previous = ticket.set_status(TicketStatus::CompletedResolved, done);
        assert_eq!(previous, TicketStatus::Open);
        assert_eq!(ticket.completion_marked_at, Some(done));
    }

    #[test]
    fn test_switching_completed_status_keeps_timer() {
        let mut ticket = open_ticket();
        ticket.set_status(TicketStatus::CompletedResolved, t0());
        ticket.set_status(TicketStatus::CompletedUnresolved, t0() + Duration::hours(5));
        assert_eq!(ticket.status, TicketStatus::CompletedUnresolved);
        assert_eq!(ticket.completion_marked_at, Some(t0()));
    }

    #[test]
    fn test_reopening_clears_timer_and_archive() {
        let mut ticket = open_ticket();
        ticket.set_status(TicketStatus::CompletedResolved, t0());
        ticket.refresh(t0() + Duration::hours(30), Duration::hours(24));
        assert!(ticket.archived);

        ticket.set_status(TicketStatus::Open, t0() + Duration::hours(31));
        assert!(ticket.completion_marked_at.is_none());
        assert!(!ticket.archived);
    }

    #[test]
    fn test_refresh_respects_window() {
        let window = Duration::hours(24);
        let mut ticket = open_ticket();
        ticket.set_status(TicketStatus::CompletedResolved, t0());

        assert_eq!(ticket.refresh(t0() + Duration::hours(23), window), RefreshOutcome::Waiting);
        assert!(!ticket.archived);

        assert_eq!(ticket.refresh(t0() + Duration::hours(24), window), RefreshOutcome::Archived);
        assert!(ticket.archived);
        assert_eq!(ticket.status, TicketStatus::CompletedResolved);

        assert_eq!(
            ticket.refresh(t0() + Duration::hours(25), window),
            RefreshOutcome::AlreadyArchived
        );
    }

    #[test]
    fn test_refresh_starts_missing_timer() {
        let mut ticket = Ticket::new(
            "Imported",
            Severity::Medium,
            TicketStatus::CompletedUnresolved,
            "staff@x",
            t0(),
        );
        let now = t0() + Duration::days(10);
        assert_eq!(ticket.refresh(now, Duration::hours(24)), RefreshOutcome::TimerStarted);
        assert_eq!(ticket.completion_marked_at, Some(now));
        assert!(!ticket.archived);
    }

    #[test]
    fn test_refresh_open_ticket_is_noop() {
        let mut ticket = open_ticket();
        let before = ticket.clone();
        assert_eq!(ticket.refresh(t0() + Duration::days(3), Duration::hours(24)), RefreshOutcome::Open);
        assert_eq!(ticket, before);
    }

    #[test]
    fn test_set_severity_reports_tier_change() {
        let mut ticket = open_ticket();
        assert!(!ticket.set_severity(Severity::Medium, t0()));
        assert!(ticket.set_severity(Severity::High, t0()));
        assert_eq!(ticket.tier(), Tier::Tier2);
        assert!(ticket.set_severity(Severity::Low, t0()));
    }

    #[test]
    fn test_days_active() {
        let mut ticket = open_ticket();
        assert_eq!(ticket.days_active(), None);
        // 03-01 09:00 to 03-03 11:00 spans three calendar days
        ticket.set_status(TicketStatus::CompletedResolved, t0() + Duration::hours(50));
        assert_eq!(ticket.days_active(), Some(3));
    }

    #[test]
    fn test_days_active_same_day_counts_one() {
        let mut ticket = open_ticket();
        ticket.set_status(TicketStatus::CompletedUnresolved, t0() + Duration::minutes(30));
        assert_eq!(ticket.days_active(), Some(1));
    }

    #[test]
    fn test_days_active_counts_calendar_days_across_midnight() {
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();

        let mut same_day = Ticket::new("VPN drops", Severity::Low, TicketStatus::Open, "staff@x", late);
        same_day.set_status(TicketStatus::CompletedResolved, late + Duration::minutes(30));
        assert_eq!(same_day.days_active(), Some(1));

        let mut next_day = Ticket::new("VPN drops", Severity::Low, TicketStatus::Open, "staff@x", late);
        next_day.set_status(TicketStatus::CompletedResolved, late + Duration::hours(2));
        assert_eq!(next_day.days_active(), Some(2));
    }

    #[test]
    fn test_parse_severity_and_status() {
        assert_eq!("High".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!(" low ".parse::<Severity>().unwrap(), Severity::Low);
        assert!("urgent".parse::<Severity>().is_err());

        assert_eq!("resolved".parse::<TicketStatus>().unwrap(), TicketStatus::CompletedResolved);
        assert_eq!(
            "completed_unresolved".parse::<TicketStatus>().unwrap(),
            TicketStatus::CompletedUnresolved
        );
        let err = "archived".parse::<TicketStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown status: archived");
    }

    #[test]
    fn test_ticket_serialization() {
        let ticket = open_ticket();
        let json = serde_json::to_string(&ticket).unwrap();
        assert!(json.contains("\"status\":\"open\""));
        assert!(json.contains("\"severity\":\"low\""));
        assert!(!json.contains("assigned_responder"));

        let parsed: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ticket);
    }

    #[test]
    fn test_ticket_id_parse() {
        let id = TicketId::new();
        let parsed: TicketId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<TicketId>().is_err());
    }
}
