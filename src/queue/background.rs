//! Admission scheduler: periodic promotion sweep over every active queue.
//!
//! One sweep runs at a time. The loop awaits each sweep before waiting for the
//! next tick, and a tick missed during a long sweep is delayed rather than
//! replayed. Inside a sweep, queues are promoted concurrently (bounded), and a
//! failing queue is logged and skipped.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::manager::QueueManager;
use super::types::now_secs;

/// Scheduler configuration, owned by the scheduler and read on every tick.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Sweeps are no-ops while false
    pub enabled: bool,
    /// Delay before the first tick
    pub initial_delay: Duration,
    /// Delay between ticks
    pub interval: Duration,
    /// Users promoted per queue per tick
    pub batch_size: usize,
    /// Queues promoted in parallel within one sweep
    pub max_concurrency: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            initial_delay: Duration::from_secs(10),
            interval: Duration::from_secs(5),
            batch_size: 3,
            max_concurrency: 16,
        }
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tick skipped because the scheduler is disabled
    pub skipped: bool,
    /// Queues discovered for this sweep
    pub queues: usize,
    /// Users moved to proceed across all queues
    pub promoted: u64,
    /// Queues whose promotion failed
    pub failed: Vec<String>,
    /// Queue discovery itself failed
    pub discovery_failed: bool,
}

/// Running totals, readable while the scheduler runs.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SchedulerStats {
    pub enabled: bool,
    pub sweeps: u64,
    pub promoted: u64,
    pub failures: u64,
    pub last_sweep_at: Option<u64>,
}

pub struct AdmissionScheduler {
    manager: Arc<QueueManager>,
    config: SchedulerConfig,
    stats: Arc<RwLock<SchedulerStats>>,
}

impl AdmissionScheduler {
    pub fn new(manager: Arc<QueueManager>, config: SchedulerConfig) -> Self {
        let stats = SchedulerStats {
            enabled: config.enabled,
            ..Default::default()
        };
        Self {
            manager,
            config,
            stats: Arc::new(RwLock::new(stats)),
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.read().clone()
    }

    /// Run one sweep: discover queues and promote a batch on each.
    pub async fn tick(&self) -> SweepReport {
        if !self.config.enabled {
            debug!("Admission scheduler disabled, skipping tick");
            return SweepReport {
                skipped: true,
                ..Default::default()
            };
        }

        let queues = match self.manager.list_queues().await {
            Ok(queues) => queues,
            Err(e) => {
                warn!(error = %e, "Queue discovery failed, skipping sweep");
                let report = SweepReport {
                    discovery_failed: true,
                    ..Default::default()
                };
                self.record(&report);
                return report;
            }
        };

        let batch_size = self.config.batch_size;
        let outcomes: Vec<_> = stream::iter(queues)
            .map(|queue| {
                let manager = Arc::clone(&self.manager);
                async move {
                    let result = manager.promote(&queue, batch_size).await;
                    (queue, result)
                }
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut report = SweepReport {
            queues: outcomes.len(),
            ..Default::default()
        };

        for (queue, result) in outcomes {
            match result {
                Ok(allowed) => {
                    info!(
                        queue = %queue,
                        tried = batch_size,
                        allowed,
                        "Tried {} and allowed {} members of {} queue",
                        batch_size,
                        allowed,
                        queue
                    );
                    report.promoted += allowed;
                }
                Err(e) => {
                    warn!(queue = %queue, error = %e, "Promotion failed");
                    report.failed.push(queue);
                }
            }
        }

        self.record(&report);
        report
    }

    fn record(&self, report: &SweepReport) {
        let mut stats = self.stats.write();
        stats.sweeps += 1;
        stats.promoted += report.promoted;
        stats.failures += report.failed.len() as u64 + u64::from(report.discovery_failed);
        stats.last_sweep_at = Some(now_secs());
    }

    /// Spawn the scheduler loop on the tokio runtime.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stats = Arc::clone(&self.stats);
        let task = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle {
            shutdown_tx,
            task,
            stats,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            enabled = self.config.enabled,
            batch_size = self.config.batch_size,
            initial_delay_ms = self.config.initial_delay.as_millis() as u64,
            interval_ms = self.config.interval.as_millis() as u64,
            "Admission scheduler started"
        );

        tokio::select! {
            _ = tokio::time::sleep(self.config.initial_delay) => {}
            _ = shutdown.changed() => {
                info!("Admission scheduler stopped");
                return;
            }
        }

        let period = self.config.interval.max(Duration::from_millis(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.changed() => {
                    break;
                }
            }
        }

        info!("Admission scheduler stopped");
    }
}

/// Handle to a running scheduler loop.
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    stats: Arc<RwLock<SchedulerStats>>,
}

impl SchedulerHandle {
    pub fn stats(&self) -> SchedulerStats {
        self.stats.read().clone()
    }

    /// Shared view of the running totals.
    pub fn stats_handle(&self) -> Arc<RwLock<SchedulerStats>> {
        Arc::clone(&self.stats)
    }

    /// Signal the loop to stop and wait for it. A sweep in progress completes.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Admission scheduler task ended abnormally");
        }
    }
}
