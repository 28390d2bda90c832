//! Testing utilities: a controllable clock, a scripted random source and
//! desk fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_core::testing::{fixtures, ManualClock};
//!
//! let (desk, clock) = fixtures::desk(&["alice@desk"], &["bob@desk"]);
//! let ticket = desk.submit_ticket(fixtures::request("staff@x", Severity::Low))?;
//!
//! clock.advance(chrono::Duration::hours(24));
//! desk.refresh_all();
//! ```

mod manual_clock;
mod scripted_random;

pub use manual_clock::ManualClock;
pub use scripted_random::ScriptedRandom;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::{ManualClock, ScriptedRandom};
    use crate::desk::ServiceDesk;
    use crate::responder::{ResponderId, ResponderRegistry, Tier};
    use crate::ticket::{CreateTicketRequest, Severity};

    /// Monday 2024-06-03 09:00 UTC.
    pub fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Registry with the given responder ids, names equal to ids.
    pub fn registry(tier1: &[&str], tier2: &[&str]) -> ResponderRegistry {
        let mut registry = ResponderRegistry::new();
        for (tier, ids) in [(Tier::Tier1, tier1), (Tier::Tier2, tier2)] {
            for id in ids {
                if let Err(e) = registry.register(ResponderId::new(*id), *id, tier) {
                    panic!("fixture registry: {}", e);
                }
            }
        }
        registry
    }

    /// Desk on a manual clock with a 24 hour window. Perfect ties pick index 0.
    pub fn desk(tier1: &[&str], tier2: &[&str]) -> (ServiceDesk, Arc<ManualClock>) {
        desk_with_random(tier1, tier2, ScriptedRandom::new(Vec::new()))
    }

    /// Desk on a manual clock with scripted tie-break picks.
    pub fn desk_with_random(
        tier1: &[&str],
        tier2: &[&str],
        random: ScriptedRandom,
    ) -> (ServiceDesk, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start_time()));
        let desk = ServiceDesk::new(
            registry(tier1, tier2),
            clock.clone(),
            Arc::new(random),
            Duration::hours(24),
        );
        (desk, clock)
    }

    /// Open ticket request with a generic description.
    pub fn request(created_by: &str, severity: Severity) -> CreateTicketRequest {
        CreateTicketRequest::new(created_by, format!("{} issue", severity.as_str()), severity)
    }
}
