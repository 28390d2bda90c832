use std::sync::Arc;

use sentinel_core::{AuditHandle, Config, DeskError, RefreshSweeper, ServiceDesk, Tier};

/// Shared daemon state
pub struct AppState {
    desk: Arc<ServiceDesk>,
    sweeper: Option<RefreshSweeper>,
}

impl AppState {
    /// Build the desk from config and, if enabled, a sweeper over it.
    pub fn new(config: &Config, audit_handle: AuditHandle) -> Result<Self, DeskError> {
        let desk = Arc::new(ServiceDesk::from_config(config)?.with_audit(audit_handle));

        let sweeper = config
            .sweeper
            .enabled
            .then(|| RefreshSweeper::new(config.sweeper.clone(), Arc::clone(&desk)));

        Ok(Self { desk, sweeper })
    }

    pub fn desk(&self) -> &ServiceDesk {
        &self.desk
    }

    pub fn sweeper(&self) -> Option<&RefreshSweeper> {
        self.sweeper.as_ref()
    }

    /// Pool sizes as (tier 1, tier 2).
    pub fn pool_sizes(&self) -> (usize, usize) {
        (
            self.desk.responders(Tier::Tier1).len(),
            self.desk.responders(Tier::Tier2).len(),
        )
    }
}
