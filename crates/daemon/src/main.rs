//! `sentineld`: hosts a service desk built from configuration.
//!
//! The binary has no request surface. It owns the desk, runs the refresh
//! sweeper over it and drains the audit pipeline until Ctrl-C or SIGTERM.
//! Tickets are submitted through the `sentinel-core` API by an embedding
//! process, so a desk started by this binary alone stays empty.

mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sentinel_core::{
    create_audit_system, load_config, validate_config, AuditEvent, AuditFilter, AuditStore,
    InMemoryAuditStore,
};

use state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SENTINEL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("sentinel.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Archive window: {}h, sweep interval: {}ms",
        config.desk.archive_after_hours, config.sweeper.interval_ms
    );

    // Compute config hash for audit
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    let config_hash_short = &config_hash[..16];

    // Create audit system
    let audit_store: Arc<dyn AuditStore> = Arc::new(InMemoryAuditStore::new());
    let (audit_handle, audit_writer) =
        create_audit_system(Arc::clone(&audit_store), config.audit.buffer_size);

    // Spawn audit writer task
    let writer_handle = tokio::spawn(audit_writer.run());

    // Emit ServiceStarted event
    audit_handle
        .emit(AuditEvent::ServiceStarted {
            version: VERSION.to_string(),
            config_hash: config_hash_short.to_string(),
        })
        .await;
    info!("Emitted ServiceStarted audit event");

    // Build the desk
    let state = AppState::new(&config, audit_handle.clone())
        .context("Failed to build service desk")?;
    let (tier1, tier2) = state.pool_sizes();
    info!(
        "Service desk ready: {} tier 1, {} tier 2 responders",
        tier1, tier2
    );

    // Start the refresh sweeper if enabled
    match state.sweeper() {
        Some(sweeper) => sweeper.start().await,
        None => warn!("Refresh sweeper disabled in config; completed tickets will not be archived"),
    }

    shutdown_signal().await;
    info!("Service shutting down...");

    // Stop sweeper if running
    if let Some(sweeper) = state.sweeper() {
        sweeper.stop().await;
        let status = sweeper.status().await;
        info!(
            "Refresh sweeper ran {} sweeps, archived {} tickets",
            status.sweeps_completed, status.tickets_archived
        );
    }
    info!("Tickets on the desk: {}", state.desk().ticket_count());

    // Emit ServiceStopped event
    audit_handle
        .emit(AuditEvent::ServiceStopped {
            reason: "graceful_shutdown".to_string(),
        })
        .await;

    // Drop all holders of AuditHandle so the writer's channel closes.
    // The desk inside the state holds a clone, so the state goes too.
    drop(state);
    drop(audit_handle);

    // Wait for writer to finish processing remaining events
    let _ = writer_handle.await;
    let records = audit_store.count(&AuditFilter::new()).unwrap_or(0);
    info!("Audit writer stopped after {} records", records);

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
