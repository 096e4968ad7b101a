//! Bot configuration settings and environment variable handling

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use crate::config::NetworkRegistry;

// Scheduling constants
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

// Trade constants
pub const DEFAULT_SLIPPAGE_PCT: u32 = 5;
pub const DEFAULT_TX_DEADLINE_SECS: u64 = 600;
pub const MAX_TX_DEADLINE_SECS: u64 = 86_400;
pub const DEFAULT_GAS_SAFETY_MARGIN_ETH: Decimal = dec!(0.00005);
pub const DEFAULT_FALLBACK_GAS_COST_ETH: Decimal = dec!(0.0005);
pub const DEFAULT_FALLBACK_GAS_LIMIT: u64 = 300_000;
pub const DEFAULT_GAS_LIMIT_HEADROOM_PCT: u64 = 130; // 1.3x estimate
pub const MIN_GAS_LIMIT_HEADROOM_PCT: u64 = 100;

// Network constants
pub const DEFAULT_NETWORK: &str = "base";
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub default_network: String,
    pub networks: NetworkRegistry,
    pub poll_interval: Duration,
    pub rpc_timeout: Duration,
    // Trade defaults
    pub default_slippage_pct: u32,
    pub tx_deadline_secs: u64,
    pub gas_safety_margin_eth: Decimal,
    pub fallback_gas_cost_eth: Decimal,
    pub fallback_gas_limit: u64,
    pub gas_limit_headroom_pct: u64,
    // Engine-wide fallback signer
    pub private_key: Option<String>,
    // Audit log
    pub trade_log_dir: Option<PathBuf>,
    // Trade submitted by the binary at startup
    pub startup_trade: Option<StartupTrade>,
}

/// A trade described through the environment and submitted once on start.
#[derive(Debug, Clone)]
pub struct StartupTrade {
    pub token_address: String,
    pub amount_eth: Decimal,
    pub network: String,
    pub slippage_pct: u32,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_network: DEFAULT_NETWORK.to_string(),
            networks: NetworkRegistry::with_defaults(DEFAULT_NETWORK),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
            default_slippage_pct: DEFAULT_SLIPPAGE_PCT,
            tx_deadline_secs: DEFAULT_TX_DEADLINE_SECS,
            gas_safety_margin_eth: DEFAULT_GAS_SAFETY_MARGIN_ETH,
            fallback_gas_cost_eth: DEFAULT_FALLBACK_GAS_COST_ETH,
            fallback_gas_limit: DEFAULT_FALLBACK_GAS_LIMIT,
            gas_limit_headroom_pct: DEFAULT_GAS_LIMIT_HEADROOM_PCT,
            private_key: None,
            trade_log_dir: None,
            startup_trade: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let default_network = env::var("DEFAULT_NETWORK")
            .unwrap_or_else(|_| DEFAULT_NETWORK.to_string());

        let mut networks = NetworkRegistry::with_defaults(&default_network);
        if let Ok(url) = env::var("BASE_RPC_URL") {
            networks.set_rpc_url("base", url);
        }
        if let Ok(url) = env::var("ETHEREUM_RPC_URL") {
            networks.set_rpc_url("ethereum", url);
        }

        let default_slippage_pct = env::var("DEFAULT_SLIPPAGE_PCT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SLIPPAGE_PCT)
            .min(100);

        Self {
            default_network: networks.default_network().name.clone(),
            poll_interval: Duration::from_secs(
                env::var("POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
                    .max(MIN_POLL_INTERVAL_SECS),
            ),
            rpc_timeout: Duration::from_secs(
                env::var("RPC_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_RPC_TIMEOUT_SECS)
                    .max(1),
            ),
            default_slippage_pct,
            tx_deadline_secs: env::var("TX_DEADLINE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TX_DEADLINE_SECS)
                .min(MAX_TX_DEADLINE_SECS),
            gas_safety_margin_eth: env::var("GAS_SAFETY_MARGIN_ETH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(DEFAULT_GAS_SAFETY_MARGIN_ETH)
                .max(Decimal::ZERO),
            fallback_gas_cost_eth: env::var("FALLBACK_GAS_COST_ETH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(DEFAULT_FALLBACK_GAS_COST_ETH)
                .max(Decimal::ZERO),
            fallback_gas_limit: env::var("FALLBACK_GAS_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FALLBACK_GAS_LIMIT),
            gas_limit_headroom_pct: env::var("GAS_LIMIT_HEADROOM_PCT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_GAS_LIMIT_HEADROOM_PCT)
                .max(MIN_GAS_LIMIT_HEADROOM_PCT),
            private_key: env::var("PRIVATE_KEY").ok().filter(|s| !s.trim().is_empty()),
            trade_log_dir: env::var("TRADE_LOG_DIR").ok().map(PathBuf::from),
            startup_trade: StartupTrade::from_env(default_slippage_pct),
            networks,
        }
    }
}

impl StartupTrade {
    fn from_env(default_slippage_pct: u32) -> Option<Self> {
        let token_address = env::var("STARTUP_TOKEN_ADDRESS").ok()?;
        let amount_eth = env::var("STARTUP_AMOUNT_ETH")
            .ok()
            .and_then(|s| Decimal::from_str(&s).ok())?;

        Some(Self {
            token_address,
            amount_eth,
            network: env::var("STARTUP_NETWORK")
                .unwrap_or_else(|_| DEFAULT_NETWORK.to_string()),
            slippage_pct: env::var("STARTUP_SLIPPAGE_PCT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default_slippage_pct),
            scheduled_at: env::var("STARTUP_SCHEDULE_AT")
                .ok()
                .and_then(|s| crate::validation::parse_schedule_time(&s).ok()),
        })
    }
}
