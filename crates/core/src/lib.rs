pub mod assignment;
pub mod audit;
pub mod clock;
pub mod config;
pub mod desk;
pub mod random;
pub mod report;
pub mod responder;
pub mod sweeper;
pub mod testing;
pub mod ticket;

pub use assignment::{select_index, Assignment, AssignmentEngine};
pub use audit::{
    create_audit_system, AuditError, AuditEvent, AuditEventEnvelope, AuditFilter, AuditHandle,
    AuditRecord, AuditStore, AuditWriter, InMemoryAuditStore,
};
pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, AuditConfig, Config, ConfigError,
    DeskConfig, ResponderConfig, RespondersConfig,
};
pub use desk::{DeskError, RefreshSummary, ServiceDesk};
pub use random::{random_source_from_seed, RandomSource, SeededRandom, ThreadRandom};
pub use report::PeriodReport;
pub use responder::{Responder, ResponderId, ResponderRegistry, ResponderSnapshot, Tier};
pub use sweeper::{RefreshSweeper, SweeperConfig, SweeperStatus};
pub use ticket::{
    CreateTicketRequest, ParseEnumError, RefreshOutcome, Severity, Ticket, TicketId, TicketStatus,
    TicketStore,
};
