//! In-memory ticket arena.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::ticket::{Severity, Ticket, TicketId, TicketStatus};

/// Request to create a new ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    /// Requester filing the ticket.
    pub created_by: String,
    /// Free-text description of the issue.
    pub description: String,
    /// Initial severity.
    pub severity: Severity,
    /// Initial status (normally `Open`).
    pub status: TicketStatus,
}

impl CreateTicketRequest {
    /// Create an open ticket request.
    pub fn new(
        created_by: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            created_by: created_by.into(),
            description: description.into(),
            severity,
            status: TicketStatus::Open,
        }
    }

    /// Seed a different initial status, e.g. when importing finished work.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }
}

/// Owns every ticket ever created, keyed by id. Tickets are never removed.
#[derive(Debug, Default)]
pub struct TicketStore {
    tickets: HashMap<TicketId, Ticket>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a ticket from a request.
    pub fn create(&mut self, request: CreateTicketRequest, now: DateTime<Utc>) -> &Ticket {
        let ticket = Ticket::new(
            request.description,
            request.severity,
            request.status,
            request.created_by,
            now,
        );
        let id = ticket.id;
        self.tickets.entry(id).or_insert(ticket)
    }

    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.get(id)
    }

    pub fn get_mut(&mut self, id: &TicketId) -> Option<&mut Ticket> {
        self.tickets.get_mut(id)
    }

    /// Clone the tickets for the given ids, skipping unknown ids.
    pub fn snapshot<'a>(&self, ids: impl IntoIterator<Item = &'a TicketId>) -> Vec<Ticket> {
        ids.into_iter()
            .filter_map(|id| self.tickets.get(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let mut store = TicketStore::new();
        let now = Utc::now();
        let id = store
            .create(CreateTicketRequest::new("staff@x", "VPN down", Severity::Medium), now)
            .id;

        let ticket = store.get(&id).unwrap();
        assert_eq!(ticket.description, "VPN down");
        assert_eq!(ticket.created_by, "staff@x");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_with_seeded_status() {
        let mut store = TicketStore::new();
        let request = CreateTicketRequest::new("staff@x", "Old issue", Severity::Low)
            .with_status(TicketStatus::CompletedResolved);
        let ticket = store.create(request, Utc::now());
        assert_eq!(ticket.status, TicketStatus::CompletedResolved);
        assert!(ticket.completion_marked_at.is_none());
    }

    #[test]
    fn test_snapshot_preserves_order_and_skips_unknown() {
        let mut store = TicketStore::new();
        let now = Utc::now();
        let a = store.create(CreateTicketRequest::new("s", "a", Severity::Low), now).id;
        let b = store.create(CreateTicketRequest::new("s", "b", Severity::Low), now).id;
        let unknown = TicketId::new();

        let tickets = store.snapshot(&[b, unknown, a]);
        let descriptions: Vec<&str> = tickets.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["b", "a"]);
    }
}
