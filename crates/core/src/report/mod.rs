//! Period report over tickets created within a date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ticket::{Ticket, TicketStatus};

/// Tickets created between two dates (inclusive) with status tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub tickets: Vec<Ticket>,
    pub open: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Completed tickets that have also been archived.
    pub archived: usize,
}

impl PeriodReport {
    /// Select the tickets whose UTC creation date lies in `[start, end]`.
    /// The caller guarantees `start <= end`.
    pub fn build<'a>(
        start: NaiveDate,
        end: NaiveDate,
        tickets: impl IntoIterator<Item = &'a Ticket>,
    ) -> Self {
        let mut report = Self {
            start,
            end,
            tickets: Vec::new(),
            open: 0,
            resolved: 0,
            unresolved: 0,
            archived: 0,
        };

        for ticket in tickets {
            let created = ticket.created_at.date_naive();
            if created < start || created > end {
                continue;
            }
            match ticket.status {
                TicketStatus::Open => report.open += 1,
                TicketStatus::CompletedResolved => report.resolved += 1,
                TicketStatus::CompletedUnresolved => report.unresolved += 1,
            }
            if ticket.archived {
                report.archived += 1;
            }
            report.tickets.push(ticket.clone());
        }

        report
    }

    /// Number of tickets submitted in the period.
    pub fn submitted(&self) -> usize {
        self.tickets.len()
    }
}
