//! Time source for lifecycle decisions.
//!
//! Every timestamp the desk records comes from a [`Clock`], so tests can
//! drive the archival window with virtual time (see
//! [`crate::testing::ManualClock`]) instead of sleeping.

use std::fmt;

use chrono::{DateTime, Utc};

/// Supplies the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
