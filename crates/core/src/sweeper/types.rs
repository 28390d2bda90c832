//! Types for the refresh sweeper.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status of the sweeper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweeperStatus {
    /// Whether the background loop is running.
    pub running: bool,
    /// Sweeps completed since the sweeper was created.
    pub sweeps_completed: u64,
    /// Tickets archived by those sweeps.
    pub tickets_archived: u64,
    /// Desk clock reading of the last sweep.
    pub last_sweep_at: Option<DateTime<Utc>>,
}
