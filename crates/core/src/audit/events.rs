use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Ticket lifecycle
    TicketCreated {
        ticket_id: String,
        requested_by: String,
        severity: String,
        status: String,
        description: String,
    },
    TicketAssigned {
        ticket_id: String,
        responder_id: String,
        tier: String,
        /// True when the ticket moved here after a severity change.
        reassignment: bool,
        /// True when the pool was balanced and the responder was drawn at random.
        random_tie_break: bool,
    },
    TicketStatusChanged {
        ticket_id: String,
        from_status: String,
        to_status: String,
    },
    TicketSeverityChanged {
        ticket_id: String,
        from_severity: String,
        to_severity: String,
        /// Responder the ticket was detached from, when the tier changed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detached_from: Option<String>,
    },
    TicketArchived {
        ticket_id: String,
        responder_id: String,
        completion_marked_at: DateTime<Utc>,
        archived_at: DateTime<Utc>,
    },
}

impl AuditEvent {
    /// Returns the event type as a string for storage
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ServiceStarted { .. } => "service_started",
            Self::ServiceStopped { .. } => "service_stopped",
            Self::TicketCreated { .. } => "ticket_created",
            Self::TicketAssigned { .. } => "ticket_assigned",
            Self::TicketStatusChanged { .. } => "ticket_status_changed",
            Self::TicketSeverityChanged { .. } => "ticket_severity_changed",
            Self::TicketArchived { .. } => "ticket_archived",
        }
    }

    /// Extract ticket_id if this event is ticket-related
    pub fn ticket_id(&self) -> Option<&str> {
        match self {
            Self::TicketCreated { ticket_id, .. }
            | Self::TicketAssigned { ticket_id, .. }
            | Self::TicketStatusChanged { ticket_id, .. }
            | Self::TicketSeverityChanged { ticket_id, .. }
            | Self::TicketArchived { ticket_id, .. } => Some(ticket_id),
            Self::ServiceStarted { .. } | Self::ServiceStopped { .. } => None,
        }
    }

    /// Extract the acting user: the requester for creations, the responder for assignments
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::TicketCreated { requested_by, .. } => Some(requested_by),
            Self::TicketAssigned { responder_id, .. }
            | Self::TicketArchived { responder_id, .. } => Some(responder_id),
            _ => None,
        }
    }
}

/// A stored audit record with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub ticket_id: Option<String>,
    pub user_id: Option<String>,
    pub data: AuditEvent,
}
