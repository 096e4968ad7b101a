//! Trade execution pipeline

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    rpc::types::eth::TransactionRequest,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use crate::{
    config::{Config, NetworkRegistry},
    errors::{SwapError, SwapResult},
    execution::TradeSigner,
    network::{contracts, ChainGateway},
    quote::QuoteCalculator,
    registry::TradeRegistry,
    storage,
    types::{Credential, NetworkConfig, Trade, TradeResult, TradeStatus},
    utils::{from_base_units, to_base_units},
};

const NATIVE_DECIMALS: u8 = 18;

/// Monetary and transaction parameters applied to every trade.
#[derive(Debug, Clone)]
pub struct ExecutionSettings {
    pub tx_deadline_secs: u64,
    pub gas_safety_margin_wei: U256,
    pub fallback_gas_cost_wei: U256,
    pub fallback_gas_limit: u64,
    pub gas_limit_headroom_pct: u64,
    pub trade_log_dir: Option<PathBuf>,
}

impl ExecutionSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            tx_deadline_secs: config.tx_deadline_secs,
            gas_safety_margin_wei: to_base_units(config.gas_safety_margin_eth, NATIVE_DECIMALS)?,
            fallback_gas_cost_wei: to_base_units(config.fallback_gas_cost_eth, NATIVE_DECIMALS)?,
            fallback_gas_limit: config.fallback_gas_limit,
            gas_limit_headroom_pct: config.gas_limit_headroom_pct,
            trade_log_dir: config.trade_log_dir.clone(),
        })
    }
}

/// Balance requirement for one swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPlan {
    pub required_balance: U256,
    /// `None` when estimation failed and the fallback limit applies.
    pub estimated_gas: Option<u64>,
    pub gas_limit: u64,
}

impl GasPlan {
    /// Spend + estimated gas cost + safety margin, or spend + fixed fallback
    /// cost when the node could not estimate the call.
    pub fn new(
        amount_in: U256,
        gas_price: u128,
        estimated_gas: Option<u64>,
        settings: &ExecutionSettings,
    ) -> Self {
        match estimated_gas {
            Some(gas) => {
                let gas_cost = U256::from(gas).saturating_mul(U256::from(gas_price));
                Self {
                    required_balance: amount_in
                        .saturating_add(gas_cost)
                        .saturating_add(settings.gas_safety_margin_wei),
                    estimated_gas,
                    gas_limit: gas.saturating_mul(settings.gas_limit_headroom_pct) / 100,
                }
            }
            None => Self {
                required_balance: amount_in.saturating_add(settings.fallback_gas_cost_wei),
                estimated_gas,
                gas_limit: settings.fallback_gas_limit,
            },
        }
    }
}

/// Router deadline as a unix timestamp, `deadline_secs` after `now`.
pub fn swap_deadline(now: DateTime<Utc>, deadline_secs: u64) -> U256 {
    U256::from((now.timestamp().max(0) as u64).saturating_add(deadline_secs))
}

pub struct TradeExecutionEngine {
    gateway: Arc<dyn ChainGateway>,
    registry: Arc<TradeRegistry>,
    networks: NetworkRegistry,
    quotes: QuoteCalculator,
    settings: ExecutionSettings,
    default_signer: Option<Credential>,
}

impl TradeExecutionEngine {
    pub fn new(
        gateway: Arc<dyn ChainGateway>,
        registry: Arc<TradeRegistry>,
        networks: NetworkRegistry,
        settings: ExecutionSettings,
    ) -> Self {
        Self {
            quotes: QuoteCalculator::new(gateway.clone()),
            gateway,
            registry,
            networks,
            settings,
            default_signer: None,
        }
    }

    /// Signer used for trades that carry no credential of their own.
    pub fn with_default_signer(mut self, signer: Credential) -> Self {
        self.default_signer = Some(signer);
        self
    }

    pub fn has_default_signer(&self) -> bool {
        self.default_signer.is_some()
    }

    /// Run one trade to a terminal state and record it in the registry.
    ///
    /// Never returns an error: every failure is stored on the returned trade.
    pub async fn execute(&self, mut trade: Trade) -> Trade {
        let execution_start = Instant::now();
        let execution_id = uuid::Uuid::new_v4().to_string();

        trade.status = TradeStatus::Executing;
        trade.execution_started.get_or_insert_with(Utc::now);
        trade.execution_id = Some(execution_id.clone());

        info!(
            trade_id = %trade.display_id(),
            execution_id = %execution_id,
            token = %trade.token_address,
            amount = %trade.native_amount,
            network = %trade.network,
            "🚀 Executing swap"
        );

        match self.run_pipeline(&trade).await {
            Ok(result) => {
                info!(
                    trade_id = %trade.display_id(),
                    tx_hash = %result.tx_hash,
                    received = %result.tokens_received,
                    symbol = %result.symbol,
                    elapsed_ms = execution_start.elapsed().as_millis() as u64,
                    "✅ Swap submitted"
                );
                trade.complete(result);
            }
            Err(e) => {
                warn!(
                    trade_id = %trade.display_id(),
                    kind = e.kind(),
                    elapsed_ms = execution_start.elapsed().as_millis() as u64,
                    "❌ Swap failed: {}", e
                );
                trade.fail(e);
            }
        }

        trade.credential = None;
        self.registry.promote(&trade).await;

        if let Some(dir) = &self.settings.trade_log_dir {
            if let Err(e) = storage::save_finished_trade(dir, &trade) {
                error!("Failed to save finished trade: {:#}", e);
            }
        }

        trade
    }

    async fn run_pipeline(&self, trade: &Trade) -> SwapResult<TradeResult> {
        let network = self.networks.resolve(&trade.network);

        if !self.gateway.is_connected(network).await {
            return Err(SwapError::RpcUnavailable { network: network.name.clone() });
        }

        let signer = trade
            .credential
            .as_ref()
            .or(self.default_signer.as_ref())
            .ok_or_else(|| SwapError::MissingCredential { trade: trade.display_id() })?;
        let signer: &dyn TradeSigner = signer.as_ref();
        let account = signer.address();

        let token = self.resolve_token(network, &trade.token_address).await?;

        let amount_in = to_base_units(trade.native_amount, NATIVE_DECIMALS)
            .map_err(SwapError::unexpected)?;
        let quote = self
            .quotes
            .quote(network, token, amount_in, trade.slippage_pct)
            .await?;

        debug!(
            trade_id = %trade.display_id(),
            expected_out = %quote.expected_out,
            min_out = %quote.min_out,
            symbol = %quote.metadata.symbol,
            "Quote received"
        );

        let deadline = swap_deadline(Utc::now(), self.settings.tx_deadline_secs);
        let nonce = self.gateway.next_nonce(network, account).await.map_err(SwapError::unexpected)?;
        let gas_price = self.gateway.gas_price(network).await.map_err(SwapError::unexpected)?;

        let mut tx = TransactionRequest::default()
            .from(account)
            .to(network.router)
            .value(amount_in)
            .input(contracts::encode_swap_exact_eth_for_tokens(quote.min_out, &quote.path, account, deadline).into())
            .nonce(nonce)
            .with_gas_price(gas_price);
        tx.chain_id = Some(network.chain_id);

        let estimated_gas = match self.gateway.estimate_gas(network, &tx).await {
            Ok(gas) => Some(gas),
            Err(e) => {
                warn!(trade_id = %trade.display_id(), "Gas estimation failed, using fallback: {:#}", e);
                None
            }
        };
        let plan = GasPlan::new(amount_in, gas_price, estimated_gas, &self.settings);

        self.ensure_balance(network, account, plan.required_balance).await?;

        let tx = tx.gas_limit(plan.gas_limit);
        let tx_hash = self
            .gateway
            .sign_and_send(network, tx, signer)
            .await
            .map_err(|e| SwapError::SubmissionFailed { message: format!("{:#}", e) })?;
        let tx_hash = format!("{:?}", tx_hash);

        Ok(TradeResult {
            explorer_url: network.explorer_link(&tx_hash),
            tx_hash,
            tokens_received: quote.expected_out_tokens,
            min_tokens: quote.min_out_tokens,
            symbol: quote.metadata.symbol,
            gas_limit: plan.gas_limit,
            completed_at: Utc::now(),
        })
    }

    /// Parse the address and require deployed code behind it.
    async fn resolve_token(&self, network: &NetworkConfig, token_address: &str) -> SwapResult<Address> {
        let invalid = || SwapError::InvalidToken { token: token_address.to_string() };

        let token = Address::from_str(token_address.trim()).map_err(|_| invalid())?;
        let has_code = self
            .gateway
            .code_exists_at(network, token)
            .await
            .map_err(SwapError::unexpected)?;

        if has_code { Ok(token) } else { Err(invalid()) }
    }

    async fn ensure_balance(&self, network: &NetworkConfig, account: Address, required: U256) -> SwapResult<()> {
        let balance = self
            .gateway
            .balance_of(network, account)
            .await
            .map_err(SwapError::unexpected)?;

        if balance >= required {
            return Ok(());
        }

        let shortfall = from_base_units(required - balance, NATIVE_DECIMALS)
            .unwrap_or(Decimal::MAX);
        Err(SwapError::InsufficientBalance {
            shortfall,
            symbol: network.native_symbol.clone(),
        })
    }
}
