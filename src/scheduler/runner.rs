//! Background task that fires due trades

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};
use crate::{
    errors::SwapError,
    execution::TradeExecutionEngine,
    registry::TradeRegistry,
};

pub struct TradeScheduler {
    registry: Arc<TradeRegistry>,
    executor: Arc<TradeExecutionEngine>,
    poll_interval: Duration,
}

/// Running scheduler task. Dropping the handle without calling `stop`
/// detaches the task, which keeps polling until the runtime shuts down.
pub struct SchedulerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the loop and in-flight executions to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            error!("Scheduler task ended abnormally: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl TradeScheduler {
    pub fn new(
        registry: Arc<TradeRegistry>,
        executor: Arc<TradeExecutionEngine>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            registry,
            executor,
            poll_interval,
        }
    }

    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) {
        info!("⏱️  Scheduler started (poll interval {:?})", self.poll_interval);

        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight = JoinSet::new();
        let mut detached = false;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    while let Some(result) = in_flight.try_join_next() {
                        log_join_result(result);
                    }
                    self.dispatch_due(&mut in_flight).await;
                }
                signal = &mut shutdown_rx, if !detached => {
                    if signal.is_ok() {
                        info!("Shutdown signal received, stopping scheduler...");
                        break;
                    }
                    debug!("Scheduler handle dropped, running detached");
                    detached = true;
                }
            }
        }

        if !in_flight.is_empty() {
            info!("Waiting for {} in-flight execution(s)", in_flight.len());
        }
        while let Some(result) = in_flight.join_next().await {
            log_join_result(result);
        }
        info!("Scheduler stopped");
    }

    /// Claim due trades under the registry lock, then execute them without it.
    ///
    /// Each execution runs in its own task so a panic inside a gateway or
    /// signer still ends with the trade recorded as failed.
    async fn dispatch_due(&self, in_flight: &mut JoinSet<()>) {
        let due = self.registry.claim_due(Utc::now()).await;
        for trade in due {
            debug!(trade_id = %trade.display_id(), "Dispatching scheduled trade");
            let executor = self.executor.clone();
            let registry = self.registry.clone();
            let mut claimed = trade.redacted();

            in_flight.spawn(async move {
                let execution = tokio::spawn(async move {
                    executor.execute(trade).await;
                });
                if let Err(e) = execution.await {
                    error!(trade_id = %claimed.display_id(), "Execution aborted: {}", e);
                    claimed.fail(SwapError::Unexpected {
                        message: format!("Execution aborted: {}", e),
                    });
                    registry.promote(&claimed).await;
                }
            });
        }
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!("Scheduled execution task failed: {}", e);
    }
}
