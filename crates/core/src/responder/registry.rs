//! Two-tier responder registry.

use crate::config::RespondersConfig;
use crate::desk::DeskError;
use crate::ticket::TicketId;

use super::{Responder, ResponderId, ResponderSnapshot, Tier};

/// Owns both responder pools. Pool order is registration order and decides
/// the first-wins tie-break during assignment.
#[derive(Debug, Clone, Default)]
pub struct ResponderRegistry {
    tier1: Vec<Responder>,
    tier2: Vec<Responder>,
}

impl ResponderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the `[responders]` config section.
    pub fn from_config(config: &RespondersConfig) -> Result<Self, DeskError> {
        let mut registry = Self::new();
        for tier in Tier::ALL {
            for entry in config.pool(tier) {
                registry.register(ResponderId::new(entry.id.clone()), entry.name.clone(), tier)?;
            }
        }
        Ok(registry)
    }

    /// Add a responder to the end of a pool. Ids are unique across both tiers.
    pub fn register(
        &mut self,
        id: ResponderId,
        name: impl Into<String>,
        tier: Tier,
    ) -> Result<(), DeskError> {
        if self.find(&id).is_some() {
            return Err(DeskError::DuplicateResponder(id));
        }
        tracing::info!(responder_id = %id, %tier, "Responder registered");
        self.pool_vec_mut(tier).push(Responder::new(id, name, tier));
        Ok(())
    }

    /// Responders of one tier, in pool order.
    pub fn pool(&self, tier: Tier) -> &[Responder] {
        match tier {
            Tier::Tier1 => &self.tier1,
            Tier::Tier2 => &self.tier2,
        }
    }

    pub(crate) fn pool_mut(&mut self, tier: Tier) -> &mut [Responder] {
        self.pool_vec_mut(tier)
    }

    fn pool_vec_mut(&mut self, tier: Tier) -> &mut Vec<Responder> {
        match tier {
            Tier::Tier1 => &mut self.tier1,
            Tier::Tier2 => &mut self.tier2,
        }
    }

    /// All responders, tier 1 first.
    pub fn iter(&self) -> impl Iterator<Item = &Responder> {
        self.tier1.iter().chain(self.tier2.iter())
    }

    pub fn find(&self, id: &ResponderId) -> Option<&Responder> {
        self.iter().find(|r| r.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: &ResponderId) -> Option<&mut Responder> {
        self.tier1
            .iter_mut()
            .chain(self.tier2.iter_mut())
            .find(|r| r.id() == id)
    }

    /// Detach a ticket from whichever responder currently holds it.
    pub(crate) fn detach(&mut self, responder_id: &ResponderId, ticket_id: &TicketId) -> bool {
        self.find_mut(responder_id)
            .map(|r| r.forget_ticket(ticket_id))
            .unwrap_or(false)
    }

    pub fn snapshots(&self, tier: Tier) -> Vec<ResponderSnapshot> {
        self.pool(tier).iter().map(Responder::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.tier1.len() + self.tier2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tier1.is_empty() && self.tier2.is_empty()
    }
}
