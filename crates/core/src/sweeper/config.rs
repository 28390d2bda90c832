//! Refresh sweeper configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the background refresh sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Run the sweep in the background.
    /// When disabled, archival only advances through explicit `refresh_all` calls.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Pause between sweeps (milliseconds).
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    5000 // 5 seconds
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_ms: default_interval(),
        }
    }
}
