//! Refresh sweeper implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::desk::{RefreshSummary, ServiceDesk};

use super::config::SweeperConfig;
use super::types::SweeperStatus;

/// Runs the desk's refresh sweep in the background.
pub struct RefreshSweeper {
    config: SweeperConfig,
    desk: Arc<ServiceDesk>,

    // Runtime state
    running: Arc<AtomicBool>,
    stats: Arc<RwLock<SweeperStatus>>,
    shutdown_tx: broadcast::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshSweeper {
    /// Create a new sweeper. Nothing runs until `start`.
    pub fn new(config: SweeperConfig, desk: Arc<ServiceDesk>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            desk,
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(RwLock::new(SweeperStatus::default())),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    /// Start the sweep loop (spawns a background task).
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Refresh sweeper already running");
            return;
        }

        info!(interval_ms = self.config.interval_ms, "Starting refresh sweeper");
        let handle = self.spawn_sweep_loop();
        *self.task.lock().await = Some(handle);
    }

    /// Stop the sweep loop and wait for it to exit.
    ///
    /// A sweep in progress finishes first; it holds the desk lock for its
    /// whole pass.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Refresh sweeper not running");
            return;
        }

        info!("Stopping refresh sweeper");
        let _ = self.shutdown_tx.send(());

        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                warn!("Refresh sweep loop ended abnormally: {}", e);
            }
        }

        info!("Refresh sweeper stopped");
    }

    /// Run one sweep now, outside the loop.
    pub async fn sweep_once(&self) -> RefreshSummary {
        Self::sweep(&self.desk, &self.stats).await
    }

    /// Get current sweeper status.
    pub async fn status(&self) -> SweeperStatus {
        let mut status = self.stats.read().await.clone();
        status.running = self.running.load(Ordering::Relaxed);
        status
    }

    fn spawn_sweep_loop(&self) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        let desk = Arc::clone(&self.desk);
        let stats = Arc::clone(&self.stats);
        let interval = Duration::from_millis(self.config.interval_ms);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Refresh sweep loop started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Refresh sweep loop received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        Self::sweep(&desk, &stats).await;
                    }
                }
            }
            info!("Refresh sweep loop stopped");
        })
    }

    async fn sweep(desk: &ServiceDesk, stats: &RwLock<SweeperStatus>) -> RefreshSummary {
        let summary = desk.refresh_all();

        let mut stats = stats.write().await;
        stats.sweeps_completed += 1;
        stats.tickets_archived += summary.archived as u64;
        stats.last_sweep_at = Some(summary.swept_at);
        debug!(
            sweeps_completed = stats.sweeps_completed,
            archived = summary.archived,
            "Sweep recorded"
        );

        summary
    }
}
