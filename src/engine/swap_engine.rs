//! Entry point used by front ends

use alloy::primitives::Address;
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use crate::{
    config::{Config, NetworkRegistry},
    errors::{SwapError, SwapResult, ValidationError},
    execution::{ExecutionSettings, TradeExecutionEngine},
    network::ChainGateway,
    quote::QuoteCalculator,
    registry::{RegistryStats, TradeRegistry},
    scheduler::{SchedulerHandle, TradeScheduler},
    types::{Credential, QuoteSummary, ScheduleRequest, Trade, TradeId, TradeRequest, TradeStatus},
    utils::to_base_units,
    validation::{validate_amount, validate_schedule_time, validate_trade_request},
};

/// Schedules, executes, cancels and reports native-to-token swaps.
pub struct SwapEngine {
    gateway: Arc<dyn ChainGateway>,
    registry: Arc<TradeRegistry>,
    executor: Arc<TradeExecutionEngine>,
    quotes: QuoteCalculator,
    networks: NetworkRegistry,
    default_slippage_pct: u32,
    poll_interval: Duration,
}

impl SwapEngine {
    pub fn new(config: &Config, gateway: Arc<dyn ChainGateway>) -> anyhow::Result<Self> {
        Self::build(config, gateway, None)
    }

    /// Engine that signs credential-less trades with `signer`.
    pub fn with_default_signer(
        config: &Config,
        gateway: Arc<dyn ChainGateway>,
        signer: Credential,
    ) -> anyhow::Result<Self> {
        Self::build(config, gateway, Some(signer))
    }

    fn build(
        config: &Config,
        gateway: Arc<dyn ChainGateway>,
        default_signer: Option<Credential>,
    ) -> anyhow::Result<Self> {
        let registry = Arc::new(TradeRegistry::new());
        let mut executor = TradeExecutionEngine::new(
            gateway.clone(),
            registry.clone(),
            config.networks.clone(),
            ExecutionSettings::from_config(config)?,
        );
        if let Some(signer) = default_signer {
            executor = executor.with_default_signer(signer);
        }

        Ok(Self {
            quotes: QuoteCalculator::new(gateway.clone()),
            gateway,
            registry,
            executor: Arc::new(executor),
            networks: config.networks.clone(),
            default_slippage_pct: config.default_slippage_pct,
            poll_interval: config.poll_interval,
        })
    }

    pub fn networks(&self) -> &NetworkRegistry {
        &self.networks
    }

    /// Validate and register a trade for later execution.
    ///
    /// The credential is kept on the trade only if `retain_credential` is set;
    /// otherwise it is dropped here and the trade will need the engine's
    /// default signer when it runs.
    pub async fn schedule(&self, request: ScheduleRequest) -> Result<TradeId, ValidationError> {
        validate_trade_request(&request.trade, self.executor.has_default_signer())?;
        validate_schedule_time(request.scheduled_at, Utc::now())?;

        let ScheduleRequest { trade: req, scheduled_at, retain_credential } = request;
        let mut trade = self.new_trade(&req, scheduled_at);
        if retain_credential {
            if let Some(credential) = req.credential {
                trade = trade.with_credential(credential, true);
            }
        }

        let id = self.registry.schedule(trade).await;
        info!(
            trade_id = id,
            token = %req.token_address,
            amount = %req.native_amount,
            scheduled_at = %scheduled_at,
            "📅 Trade scheduled"
        );
        Ok(id)
    }

    /// Execute right away. The returned trade is terminal and already recorded
    /// in the completed list.
    pub async fn execute_now(&self, request: TradeRequest) -> Result<Trade, ValidationError> {
        validate_trade_request(&request, self.executor.has_default_signer())?;

        let mut trade = self.new_trade(&request, Utc::now());
        trade.status = TradeStatus::Executing;
        trade.execution_started = Some(Utc::now());
        if let Some(credential) = request.credential {
            trade = trade.with_credential(credential, false);
        }

        Ok(self.executor.execute(trade).await)
    }

    /// Best-effort cancel; a trade that already started executing runs to completion.
    pub async fn cancel(&self, id: TradeId) {
        if self.registry.cancel(id).await {
            info!(trade_id = id, "🗑️  Trade cancelled");
        } else {
            info!(trade_id = id, "Cancel ignored, trade is not pending");
        }
    }

    /// Display-scaled expected and minimum output for a prospective swap.
    pub async fn quote(
        &self,
        token_address: &str,
        native_amount: Decimal,
        network: &str,
        slippage_pct: Option<u32>,
    ) -> SwapResult<QuoteSummary> {
        validate_amount(native_amount)?;
        let network = self.networks.resolve(network);

        if !self.gateway.is_connected(network).await {
            return Err(SwapError::RpcUnavailable { network: network.name.clone() });
        }

        let token = Address::from_str(token_address.trim())
            .map_err(|_| SwapError::InvalidToken { token: token_address.to_string() })?;
        let amount_in = to_base_units(native_amount, 18).map_err(SwapError::unexpected)?;
        let slippage = slippage_pct.unwrap_or(self.default_slippage_pct);

        let quote = self.quotes.quote(network, token, amount_in, slippage).await?;
        Ok(quote.summary())
    }

    pub async fn list_scheduled(&self) -> Vec<Trade> {
        self.registry.list_scheduled().await
    }

    pub async fn list_completed(&self) -> Vec<Trade> {
        self.registry.list_completed().await
    }

    /// Redacted snapshot of one trade, scheduled or finished.
    pub async fn find(&self, id: TradeId) -> Option<Trade> {
        self.registry.find(id).await
    }

    pub async fn stats(&self) -> RegistryStats {
        self.registry.stats().await
    }

    pub fn start_scheduler(&self) -> SchedulerHandle {
        self.start_scheduler_with_interval(self.poll_interval)
    }

    pub fn start_scheduler_with_interval(&self, poll_interval: Duration) -> SchedulerHandle {
        TradeScheduler::new(self.registry.clone(), self.executor.clone(), poll_interval).start()
    }

    fn new_trade(&self, request: &TradeRequest, scheduled_at: chrono::DateTime<Utc>) -> Trade {
        let network = self.networks.resolve(&request.network);
        Trade::new(
            request.token_address.trim(),
            request.native_amount,
            network.name.clone(),
            request.slippage_pct.unwrap_or(self.default_slippage_pct),
            scheduled_at,
        )
    }
}
