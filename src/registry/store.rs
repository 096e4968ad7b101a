//! Thread-safe store of scheduled and finished trades

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use crate::types::{Trade, TradeId, TradeStatus};

#[derive(Debug, Default)]
struct RegistryState {
    last_id: TradeId,
    scheduled: Vec<Trade>,
    completed: Vec<Trade>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub scheduled: usize,
    pub executing: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Owner of all trade state.
///
/// Scheduled trades keep insertion order, finished trades keep completion
/// order. Every mutation happens under one write lock, and snapshots are
/// taken under the read lock so callers never see a half-applied change.
#[derive(Debug, Default)]
pub struct TradeRegistry {
    state: RwLock<RegistryState>,
}

impl TradeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next ID and append to the scheduled set.
    pub async fn schedule(&self, mut trade: Trade) -> TradeId {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;

        trade.id = Some(id);
        trade.status = TradeStatus::Scheduled;
        trade.created_at = Utc::now();
        state.scheduled.push(trade);

        debug!(trade_id = id, "Trade added to registry");
        id
    }

    /// Drop a trade that has not started executing.
    ///
    /// Returns whether anything was removed. Unknown, executing and finished
    /// trades are left alone.
    pub async fn cancel(&self, id: TradeId) -> bool {
        let mut state = self.state.write().await;
        let before = state.scheduled.len();
        state
            .scheduled
            .retain(|t| !(t.id == Some(id) && t.status == TradeStatus::Scheduled));
        before != state.scheduled.len()
    }

    pub async fn list_scheduled(&self) -> Vec<Trade> {
        let state = self.state.read().await;
        state.scheduled.iter().map(Trade::redacted).collect()
    }

    pub async fn list_completed(&self) -> Vec<Trade> {
        let state = self.state.read().await;
        state.completed.iter().map(Trade::redacted).collect()
    }

    pub async fn find(&self, id: TradeId) -> Option<Trade> {
        let state = self.state.read().await;
        state
            .scheduled
            .iter()
            .chain(state.completed.iter())
            .find(|t| t.id == Some(id))
            .map(Trade::redacted)
    }

    /// Mark every due trade as executing and hand back owned copies.
    ///
    /// A claimed trade is no longer due, so later scans cannot pick it up
    /// again while its execution is in flight.
    pub async fn claim_due(&self, now: DateTime<Utc>) -> Vec<Trade> {
        let mut state = self.state.write().await;
        let mut claimed = Vec::new();
        for trade in state.scheduled.iter_mut().filter(|t| t.is_due(now)) {
            trade.status = TradeStatus::Executing;
            trade.execution_started = Some(now);
            claimed.push(trade.clone());
        }
        if !claimed.is_empty() {
            info!("⏰ {} scheduled trade(s) due", claimed.len());
        }
        claimed
    }

    /// Move a finished trade out of the scheduled set into the completed set.
    ///
    /// Safe to call twice: a trade already in the completed set is not
    /// appended again. Returns whether the trade was appended.
    pub async fn promote(&self, trade: &Trade) -> bool {
        if !trade.is_terminal() {
            warn!(trade_id = %trade.display_id(), status = %trade.status, "Promoting non-terminal trade");
        }

        let mut state = self.state.write().await;
        state.scheduled.retain(|t| !t.same_trade(trade));

        if state.completed.iter().any(|t| t.same_trade(trade)) {
            debug!(trade_id = %trade.display_id(), "Trade already promoted");
            return false;
        }

        let mut finished = trade.redacted();
        finished.retain_credential = false;
        state.completed.push(finished);
        true
    }

    pub async fn stats(&self) -> RegistryStats {
        let state = self.state.read().await;
        RegistryStats {
            scheduled: state
                .scheduled
                .iter()
                .filter(|t| t.status == TradeStatus::Scheduled)
                .count(),
            executing: state
                .scheduled
                .iter()
                .filter(|t| t.status == TradeStatus::Executing)
                .count(),
            completed: state
                .completed
                .iter()
                .filter(|t| t.status == TradeStatus::Completed)
                .count(),
            failed: state
                .completed
                .iter()
                .filter(|t| t.status == TradeStatus::Failed)
                .count(),
        }
    }
}
