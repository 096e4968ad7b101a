//! Trade records and requests

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use crate::errors::SwapError;
use crate::execution::TradeSigner;

pub type TradeId = u64;

/// Opaque signing capability attached to a trade.
pub type Credential = Arc<dyn TradeSigner>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Scheduled,
    Executing,
    Completed,
    Failed,
}

impl TradeStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TradeStatus::Completed | TradeStatus::Failed)
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TradeStatus::Scheduled => "scheduled",
            TradeStatus::Executing => "executing",
            TradeStatus::Completed => "completed",
            TradeStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeResult {
    pub tx_hash: String,
    pub tokens_received: Decimal,
    pub min_tokens: Decimal,
    pub symbol: String,
    pub gas_limit: u64,
    pub explorer_url: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Serialize)]
pub struct Trade {
    /// `None` for trades executed immediately without being scheduled.
    pub id: Option<TradeId>,
    /// Assigned per execution attempt.
    pub execution_id: Option<String>,
    pub token_address: String,
    pub native_amount: Decimal,
    pub network: String,
    pub slippage_pct: u32,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub execution_started: Option<DateTime<Utc>>,
    pub status: TradeStatus,
    pub error: Option<SwapError>,
    pub result: Option<TradeResult>,
    pub retain_credential: bool,
    #[serde(skip)]
    pub credential: Option<Credential>,
}

impl Trade {
    pub fn new(
        token_address: impl Into<String>,
        native_amount: Decimal,
        network: impl Into<String>,
        slippage_pct: u32,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            execution_id: None,
            token_address: token_address.into(),
            native_amount,
            network: network.into(),
            slippage_pct,
            scheduled_at,
            created_at: Utc::now(),
            execution_started: None,
            status: TradeStatus::Scheduled,
            error: None,
            result: None,
            retain_credential: false,
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: Credential, retain: bool) -> Self {
        self.credential = Some(credential);
        self.retain_credential = retain;
        self
    }

    pub fn display_id(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => "manual".to_string(),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == TradeStatus::Scheduled && self.scheduled_at <= now
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Copy without signing material, for handing to callers.
    pub fn redacted(&self) -> Self {
        Self {
            credential: None,
            ..self.clone()
        }
    }

    /// Same record as `other`: same registry ID, or same execution attempt for manual trades.
    pub fn same_trade(&self, other: &Trade) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.execution_id.is_some() && self.execution_id == other.execution_id,
            _ => false,
        }
    }

    pub fn short_token(&self) -> &str {
        let start = self.token_address.len().saturating_sub(8);
        self.token_address.get(start..).unwrap_or(&self.token_address)
    }

    pub(crate) fn fail(&mut self, error: SwapError) {
        self.status = TradeStatus::Failed;
        self.error = Some(error);
        self.result = None;
    }

    pub(crate) fn complete(&mut self, result: TradeResult) {
        self.status = TradeStatus::Completed;
        self.error = None;
        self.result = Some(result);
    }
}

impl fmt::Debug for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trade")
            .field("id", &self.id)
            .field("execution_id", &self.execution_id)
            .field("token_address", &self.token_address)
            .field("native_amount", &self.native_amount)
            .field("network", &self.network)
            .field("slippage_pct", &self.slippage_pct)
            .field("scheduled_at", &self.scheduled_at)
            .field("status", &self.status)
            .field("error", &self.error)
            .field("result", &self.result)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Caller input shared by immediate and scheduled trades.
#[derive(Clone)]
pub struct TradeRequest {
    pub token_address: String,
    pub native_amount: Decimal,
    pub network: String,
    /// Falls back to the configured default when `None`.
    pub slippage_pct: Option<u32>,
    pub credential: Option<Credential>,
}

#[derive(Clone)]
pub struct ScheduleRequest {
    pub trade: TradeRequest,
    pub scheduled_at: DateTime<Utc>,
    /// Keep the credential on the trade until it executes.
    pub retain_credential: bool,
}
