//! The service desk: one lock around the responder pools and the ticket arena.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::assignment::{Assignment, AssignmentEngine};
use crate::audit::{AuditEvent, AuditHandle};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::random::{random_source_from_seed, RandomSource};
use crate::report::PeriodReport;
use crate::responder::{ResponderId, ResponderRegistry, ResponderSnapshot, Tier};
use crate::ticket::{
    CreateTicketRequest, RefreshOutcome, Severity, Ticket, TicketId, TicketStatus, TicketStore,
};

use super::types::{DeskError, RefreshSummary};

/// Everything guarded by the desk lock.
#[derive(Debug)]
struct DeskState {
    registry: ResponderRegistry,
    tickets: TicketStore,
    /// Tickets filed by each requester, in submission order.
    requesters: HashMap<String, Vec<TicketId>>,
}

/// Two-tier service desk.
///
/// Every operation takes the same lock, so an assignment never observes a
/// half-finished reassignment and the refresh sweep never interleaves with
/// a status change.
#[derive(Debug)]
pub struct ServiceDesk {
    state: Mutex<DeskState>,
    engine: AssignmentEngine,
    clock: Arc<dyn Clock>,
    archive_window: Duration,
    audit: Option<AuditHandle>,
}

impl ServiceDesk {
    /// Create a desk over an existing registry.
    pub fn new(
        registry: ResponderRegistry,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        archive_window: Duration,
    ) -> Self {
        Self {
            state: Mutex::new(DeskState {
                registry,
                tickets: TicketStore::new(),
                requesters: HashMap::new(),
            }),
            engine: AssignmentEngine::new(random),
            clock,
            archive_window,
            audit: None,
        }
    }

    /// Build a desk from loaded configuration using the system clock.
    pub fn from_config(config: &Config) -> Result<Self, DeskError> {
        let registry = ResponderRegistry::from_config(&config.responders)?;
        let random: Arc<dyn RandomSource> =
            Arc::from(random_source_from_seed(config.desk.random_seed));
        Ok(Self::new(
            registry,
            Arc::new(SystemClock),
            random,
            config.desk.archive_window(),
        ))
    }

    /// Emit audit events through `audit`.
    pub fn with_audit(mut self, audit: AuditHandle) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn archive_window(&self) -> Duration {
        self.archive_window
    }

    fn state(&self) -> MutexGuard<'_, DeskState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: AuditEvent) {
        if let Some(ref audit) = self.audit {
            audit.try_emit(event);
        }
    }

    // ------------------------------------------------------------------
    // Responders
    // ------------------------------------------------------------------

    /// Add a responder to the end of a pool.
    pub fn register_responder(
        &self,
        id: impl Into<ResponderId>,
        name: impl Into<String>,
        tier: Tier,
    ) -> Result<(), DeskError> {
        self.state().registry.register(id.into(), name, tier)
    }

    /// Snapshot of a pool in registration order.
    pub fn responders(&self, tier: Tier) -> Vec<ResponderSnapshot> {
        self.state().registry.snapshots(tier)
    }

    // ------------------------------------------------------------------
    // Tickets
    // ------------------------------------------------------------------

    /// Create a ticket without assigning it.
    pub fn create_ticket(&self, request: CreateTicketRequest) -> Ticket {
        let mut state = self.state();
        self.create_locked(&mut state, request)
    }

    /// Route a ticket to its tier and assign it to the least-loaded responder.
    ///
    /// A first assignment also records the ticket under its requester. If the
    /// ticket is still attached to a responder it is detached first.
    pub fn assign(&self, id: &TicketId, is_reassignment: bool) -> Result<ResponderId, DeskError> {
        let mut state = self.state();
        let assignment = self.assign_locked(&mut state, id, is_reassignment)?;
        Ok(assignment.responder)
    }

    /// Create a ticket and assign it in one step.
    ///
    /// When the target pool is empty the ticket stays in the desk unassigned
    /// and `EmptyPool` is returned; a later `assign` can pick it up.
    pub fn submit_ticket(&self, request: CreateTicketRequest) -> Result<Ticket, DeskError> {
        let mut state = self.state();
        let ticket = self.create_locked(&mut state, request);
        self.assign_locked(&mut state, &ticket.id, false)?;
        state
            .tickets
            .get(&ticket.id)
            .cloned()
            .ok_or(DeskError::TicketNotFound(ticket.id))
    }

    /// Change a ticket's status. Never reassigns.
    pub fn update_status(&self, id: &TicketId, status: TicketStatus) -> Result<Ticket, DeskError> {
        let now = self.clock.now();
        let mut state = self.state();
        let ticket = Self::editable(&mut state, id)?;

        let previous = ticket.set_status(status, now);
        let updated = ticket.clone();
        drop(state);

        if previous != status {
            info!(
                ticket_id = %id,
                from = previous.as_str(),
                to = status.as_str(),
                "Ticket status changed"
            );
            self.emit(AuditEvent::TicketStatusChanged {
                ticket_id: id.to_string(),
                from_status: previous.as_str().to_string(),
                to_status: status.as_str().to_string(),
            });
        }

        Ok(updated)
    }

    /// Change a ticket's severity.
    ///
    /// When the new severity routes to the other tier, the ticket is detached
    /// from its responder and reassigned within the same critical section. The
    /// previous responder keeps its assignment count. If the target pool is
    /// empty nothing changes.
    pub fn update_severity(&self, id: &TicketId, severity: Severity) -> Result<Ticket, DeskError> {
        let now = self.clock.now();
        let mut state = self.state();
        let DeskState {
            registry, tickets, ..
        } = &mut *state;

        let ticket = tickets.get_mut(id).ok_or(DeskError::TicketNotFound(*id))?;
        if ticket.archived {
            return Err(DeskError::TicketArchived(*id));
        }

        let target = severity.tier();
        let moves_tier = target != ticket.tier() && ticket.assigned_responder.is_some();
        if moves_tier && registry.pool(target).is_empty() {
            return Err(DeskError::EmptyPool { tier: target });
        }

        let previous = ticket.severity;
        ticket.set_severity(severity, now);

        let mut detached_from = None;
        let mut assignment = None;
        if moves_tier {
            if let Some(holder) = ticket.assigned_responder.take() {
                registry.detach(&holder, id);
                detached_from = Some(holder);
            }
            assignment = Some(self.engine.assign(registry, ticket)?);
        }
        let updated = ticket.clone();
        drop(state);

        if previous != severity {
            info!(
                ticket_id = %id,
                from = previous.as_str(),
                to = severity.as_str(),
                "Ticket severity changed"
            );
            self.emit(AuditEvent::TicketSeverityChanged {
                ticket_id: id.to_string(),
                from_severity: previous.as_str().to_string(),
                to_severity: severity.as_str().to_string(),
                detached_from: detached_from.as_ref().map(|r| r.to_string()),
            });
        }
        if let Some(assignment) = assignment {
            self.record_assignment(id, &assignment, true);
        }

        Ok(updated)
    }

    /// Look up a ticket by id.
    pub fn get_ticket(&self, id: &TicketId) -> Option<Ticket> {
        self.state().tickets.get(id).cloned()
    }

    /// Total tickets ever created.
    pub fn ticket_count(&self) -> usize {
        self.state().tickets.len()
    }

    // ------------------------------------------------------------------
    // Refresh sweep
    // ------------------------------------------------------------------

    /// Walk every responder history, tier 1 first, and advance archival
    /// state. Running it twice at the same instant changes nothing the
    /// second time.
    pub fn refresh_all(&self) -> RefreshSummary {
        let now = self.clock.now();
        let mut state = self.state();
        let DeskState {
            registry, tickets, ..
        } = &mut *state;

        let mut summary = RefreshSummary {
            swept_at: now,
            ..Default::default()
        };
        let mut archived = Vec::new();

        for responder in registry.iter() {
            for ticket_id in responder.tickets() {
                let Some(ticket) = tickets.get_mut(ticket_id) else {
                    continue;
                };
                summary.visited += 1;
                match ticket.refresh(now, self.archive_window) {
                    RefreshOutcome::TimerStarted => summary.timers_started += 1,
                    RefreshOutcome::Archived => {
                        summary.archived += 1;
                        archived.push(AuditEvent::TicketArchived {
                            ticket_id: ticket_id.to_string(),
                            responder_id: responder.id().to_string(),
                            completion_marked_at: ticket.completion_marked_at.unwrap_or(now),
                            archived_at: now,
                        });
                    }
                    RefreshOutcome::Open
                    | RefreshOutcome::Waiting
                    | RefreshOutcome::AlreadyArchived => {}
                }
            }
        }
        drop(state);

        if summary.changed_anything() {
            info!(
                visited = summary.visited,
                timers_started = summary.timers_started,
                archived = summary.archived,
                "Refresh sweep finished"
            );
        } else {
            debug!(visited = summary.visited, "Refresh sweep finished");
        }
        for event in archived {
            self.emit(event);
        }

        summary
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every non-open ticket attached to any responder, archived or not.
    /// Tier 1 histories come first, each in pool and assignment order.
    pub fn list_closed_and_archived(&self) -> Vec<Ticket> {
        let state = self.state();
        state
            .registry
            .iter()
            .flat_map(|r| r.tickets())
            .filter_map(|id| state.tickets.get(id))
            .filter(|t| !t.is_open())
            .cloned()
            .collect()
    }

    /// Every ticket in a responder's history, in assignment order.
    pub fn list_all_assigned(&self, responder: &ResponderId) -> Result<Vec<Ticket>, DeskError> {
        let state = self.state();
        let found = state
            .registry
            .find(responder)
            .ok_or_else(|| DeskError::ResponderNotFound(responder.clone()))?;
        Ok(state.tickets.snapshot(found.tickets()))
    }

    /// Open tickets in a responder's history.
    pub fn list_open_assigned(&self, responder: &ResponderId) -> Result<Vec<Ticket>, DeskError> {
        let mut tickets = self.list_all_assigned(responder)?;
        tickets.retain(Ticket::is_open);
        Ok(tickets)
    }

    /// Tickets a requester has submitted, in submission order.
    pub fn list_for_requester(&self, requester: &str) -> Vec<Ticket> {
        let state = self.state();
        state
            .requesters
            .get(requester)
            .map(|ids| state.tickets.snapshot(ids))
            .unwrap_or_default()
    }

    /// Open tickets a requester has submitted.
    pub fn list_open_for_requester(&self, requester: &str) -> Vec<Ticket> {
        let mut tickets = self.list_for_requester(requester);
        tickets.retain(Ticket::is_open);
        tickets
    }

    /// Report over assigned tickets created between `start` and `end`, inclusive.
    pub fn period_report(&self, start: NaiveDate, end: NaiveDate) -> Result<PeriodReport, DeskError> {
        if start > end {
            return Err(DeskError::InvalidPeriod { start, end });
        }
        let state = self.state();
        let assigned = state
            .registry
            .iter()
            .flat_map(|r| r.tickets())
            .filter_map(|id| state.tickets.get(id));
        Ok(PeriodReport::build(start, end, assigned))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn create_locked(&self, state: &mut DeskState, request: CreateTicketRequest) -> Ticket {
        let ticket = state.tickets.create(request, self.clock.now()).clone();

        info!(
            ticket_id = %ticket.id,
            created_by = %ticket.created_by,
            severity = ticket.severity.as_str(),
            "Ticket created"
        );
        self.emit(AuditEvent::TicketCreated {
            ticket_id: ticket.id.to_string(),
            requested_by: ticket.created_by.clone(),
            severity: ticket.severity.as_str().to_string(),
            status: ticket.status.as_str().to_string(),
            description: ticket.description.clone(),
        });

        ticket
    }

    fn assign_locked(
        &self,
        state: &mut DeskState,
        id: &TicketId,
        is_reassignment: bool,
    ) -> Result<Assignment, DeskError> {
        let DeskState {
            registry,
            tickets,
            requesters,
        } = state;

        let ticket = tickets.get_mut(id).ok_or(DeskError::TicketNotFound(*id))?;
        if ticket.archived {
            return Err(DeskError::TicketArchived(*id));
        }
        if registry.pool(ticket.tier()).is_empty() {
            return Err(DeskError::EmptyPool {
                tier: ticket.tier(),
            });
        }

        if let Some(holder) = ticket.assigned_responder.take() {
            registry.detach(&holder, id);
        }
        let assignment = self.engine.assign(registry, ticket)?;
        ticket.updated_at = self.clock.now();

        if !is_reassignment {
            let filed = requesters.entry(ticket.created_by.clone()).or_default();
            if !filed.contains(id) {
                filed.push(*id);
            }
        }

        self.record_assignment(id, &assignment, is_reassignment);
        Ok(assignment)
    }

    fn record_assignment(&self, id: &TicketId, assignment: &Assignment, reassignment: bool) {
        info!(
            ticket_id = %id,
            responder_id = %assignment.responder,
            tier = %assignment.tier,
            reassignment,
            "Ticket assigned"
        );
        self.emit(AuditEvent::TicketAssigned {
            ticket_id: id.to_string(),
            responder_id: assignment.responder.to_string(),
            tier: assignment.tier.config_key().to_string(),
            reassignment,
            random_tie_break: assignment.random_tie_break,
        });
    }

    fn editable<'a>(state: &'a mut DeskState, id: &TicketId) -> Result<&'a mut Ticket, DeskError> {
        let ticket = state
            .tickets
            .get_mut(id)
            .ok_or(DeskError::TicketNotFound(*id))?;
        if ticket.archived {
            return Err(DeskError::TicketArchived(*id));
        }
        Ok(ticket)
    }
}
