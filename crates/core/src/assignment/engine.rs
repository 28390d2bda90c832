//! Severity routing and load-balanced responder selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::desk::DeskError;
use crate::random::RandomSource;
use crate::responder::{ResponderId, ResponderRegistry, Tier};
use crate::ticket::Ticket;

/// Result of a single assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub responder: ResponderId,
    pub tier: Tier,
    /// Responder's assignment count before this assignment.
    pub previous_count: u64,
    /// True when the pool was perfectly balanced and the pick was random.
    pub random_tie_break: bool,
}

/// Pick a pool index from the pool's assignment counts.
///
/// When every count is equal the pick is uniform over the whole pool.
/// Otherwise the first index holding the minimum wins, with no randomness.
/// Returns `None` for an empty pool.
pub fn select_index(counts: &[u64], random: &dyn RandomSource) -> Option<usize> {
    let min = *counts.iter().min()?;
    if counts.iter().all(|&c| c == min) {
        return Some(random.pick(counts.len()));
    }
    counts.iter().position(|&c| c == min)
}

/// Chooses a responder for a ticket and records the assignment.
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    random: Arc<dyn RandomSource>,
}

impl AssignmentEngine {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Route `ticket` to its tier and hand it to the least-loaded responder.
    ///
    /// Increments the chosen responder's count, attaches the ticket to its
    /// history and sets `ticket.assigned_responder`. Any previous holder is
    /// left untouched; [`ServiceDesk::assign`](crate::desk::ServiceDesk::assign)
    /// and `update_severity` detach the ticket before calling this.
    pub fn assign(
        &self,
        registry: &mut ResponderRegistry,
        ticket: &mut Ticket,
    ) -> Result<Assignment, DeskError> {
        let tier = ticket.tier();
        let pool = registry.pool_mut(tier);

        let counts: Vec<u64> = pool.iter().map(|r| r.assignment_count()).collect();
        let random_tie_break = counts.windows(2).all(|w| w[0] == w[1]);
        let index =
            select_index(&counts, self.random.as_ref()).ok_or(DeskError::EmptyPool { tier })?;

        let responder = &mut pool[index];
        let previous_count = responder.assignment_count();
        responder.record_assignment(ticket.id);
        ticket.assigned_responder = Some(responder.id().clone());

        tracing::debug!(
            ticket_id = %ticket.id,
            responder_id = %responder.id(),
            %tier,
            previous_count,
            random_tie_break,
            "Ticket assigned"
        );

        Ok(Assignment {
            responder: responder.id().clone(),
            tier,
            previous_count,
            random_tie_break,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use crate::testing::ScriptedRandom;
    use crate::ticket::{Severity, TicketStatus};
    use chrono::Utc;

    fn registry(tier1: &[&str], tier2: &[&str]) -> ResponderRegistry {
        let mut registry = ResponderRegistry::new();
        for id in tier1 {
            registry.register((*id).into(), *id, Tier::Tier1).unwrap();
        }
        for id in tier2 {
            registry.register((*id).into(), *id, Tier::Tier2).unwrap();
        }
        registry
    }

    fn ticket(severity: Severity) -> Ticket {
        Ticket::new("issue", severity, TicketStatus::Open, "staff@x", Utc::now())
    }

    fn counts(registry: &ResponderRegistry, tier: Tier) -> Vec<u64> {
        registry.pool(tier).iter().map(|r| r.assignment_count()).collect()
    }

    #[test]
    fn test_select_index_empty_pool() {
        assert_eq!(select_index(&[], &ScriptedRandom::new(vec![])), None);
    }

    #[test]
    fn test_select_index_uses_random_only_when_uniform() {
        let random = ScriptedRandom::new(vec![2]);
        assert_eq!(select_index(&[4, 4, 4], &random), Some(2));
        assert_eq!(random.calls(), 1);

        assert_eq!(select_index(&[0, 1, 1], &random), Some(0));
        assert_eq!(select_index(&[3, 1, 1], &random), Some(1));
        assert_eq!(select_index(&[2, 5, 2], &random), Some(0));
        assert_eq!(random.calls(), 1);
    }

    #[test]
    fn test_select_index_first_minimum_wins_after_lower_value() {
        // The minimum appears after a larger value; the earliest minimum wins.
        let random = ScriptedRandom::new(vec![]);
        assert_eq!(select_index(&[1, 0, 0], &random), Some(1));
        assert_eq!(random.calls(), 0);
    }

    #[test]
    fn test_zero_one_one_is_deterministic() {
        let random = SeededRandom::new(1);
        for _ in 0..500 {
            assert_eq!(select_index(&[0, 1, 1], &random), Some(0));
        }
    }

    #[test]
    fn test_uniform_pool_is_picked_uniformly() {
        let random = SeededRandom::new(0x5eed);
        let mut hits = [0usize; 3];
        for _ in 0..3000 {
            let index = select_index(&[0, 0, 0], &random).unwrap();
            hits[index] += 1;
        }
        for count in hits {
            assert!((800..=1200).contains(&count), "skewed distribution: {:?}", hits);
        }
    }

    #[test]
    fn test_high_severity_goes_to_tier2() {
        let mut registry = registry(&["t1a", "t1b"], &["t2a"]);
        let engine = AssignmentEngine::new(Arc::new(SeededRandom::new(3)));

        let mut high = ticket(Severity::High);
        let assignment = engine.assign(&mut registry, &mut high).unwrap();
        assert_eq!(assignment.tier, Tier::Tier2);
        assert_eq!(assignment.responder.as_str(), "t2a");
        assert_eq!(high.assigned_responder, Some("t2a".into()));

        for severity in [Severity::Low, Severity::Medium] {
            let mut t = ticket(severity);
            let assignment = engine.assign(&mut registry, &mut t).unwrap();
            assert_eq!(assignment.tier, Tier::Tier1);
            assert!(assignment.responder.as_str().starts_with("t1"));
        }
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let mut registry = registry(&["t1a"], &[]);
        let engine = AssignmentEngine::new(Arc::new(SeededRandom::new(3)));
        let mut high = ticket(Severity::High);

        let err = engine.assign(&mut registry, &mut high).unwrap_err();
        assert!(matches!(err, DeskError::EmptyPool { tier: Tier::Tier2 }));
        assert!(high.assigned_responder.is_none());
        assert_eq!(counts(&registry, Tier::Tier1), vec![0]);
    }

    #[test]
    fn test_assign_records_history_and_count() {
        let mut registry = registry(&["t1a", "t1b", "t1c"], &[]);
        let engine = AssignmentEngine::new(Arc::new(ScriptedRandom::new(vec![1])));
        let mut t = ticket(Severity::Low);

        let assignment = engine.assign(&mut registry, &mut t).unwrap();
        assert!(assignment.random_tie_break);
        assert_eq!(assignment.previous_count, 0);
        assert_eq!(assignment.responder.as_str(), "t1b");
        assert_eq!(counts(&registry, Tier::Tier1), vec![0, 1, 0]);
        assert_eq!(registry.pool(Tier::Tier1)[1].tickets(), &[t.id]);

        // Now [0, 1, 0]: deterministic, first minimum.
        let mut next = ticket(Severity::Medium);
        let assignment = engine.assign(&mut registry, &mut next).unwrap();
        assert!(!assignment.random_tie_break);
        assert_eq!(assignment.responder.as_str(), "t1a");
    }

    #[test]
    fn test_repeated_assignment_stays_balanced() {
        for pool_size in 1..=6 {
            let ids: Vec<String> = (0..pool_size).map(|i| format!("r{}", i)).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let mut registry = registry(&refs, &[]);
            let engine = AssignmentEngine::new(Arc::new(SeededRandom::new(pool_size as u64)));

            for n in 1..=40 {
                let mut t = ticket(Severity::Low);
                engine.assign(&mut registry, &mut t).unwrap();

                let c = counts(&registry, Tier::Tier1);
                let max = *c.iter().max().unwrap();
                let min = *c.iter().min().unwrap();
                assert!(max - min <= 1, "pool {} after {} assignments: {:?}", pool_size, n, c);
                assert_eq!(c.iter().sum::<u64>(), n);
            }
        }
    }
}
