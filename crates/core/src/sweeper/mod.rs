//! Periodic refresh sweep.
//!
//! The sweeper calls [`ServiceDesk::refresh_all`](crate::desk::ServiceDesk::refresh_all)
//! on a fixed interval so completed tickets get archived without anyone
//! asking. Each sweep takes the desk lock once.

mod config;
mod runner;
mod types;

pub use config::SweeperConfig;
pub use runner::RefreshSweeper;
pub use types::SweeperStatus;
