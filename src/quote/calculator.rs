//! Router quotes and slippage-bounded minimum output

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::{
    errors::{SwapError, SwapResult},
    network::ChainGateway,
    types::{NetworkConfig, SwapQuote, TokenMetadata},
    utils::{from_base_units, MAX_TOKEN_DECIMALS},
};

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
pub const FALLBACK_DECIMALS: u8 = 18;

/// Floor of `expected_out * (100 - slippage_pct) / 100`.
///
/// Slippage above 100% yields zero instead of underflowing.
pub fn minimum_output(expected_out: U256, slippage_pct: u32) -> U256 {
    let keep = U256::from(100u32.saturating_sub(slippage_pct));
    expected_out.saturating_mul(keep) / U256::from(100u32)
}

/// Display value of a raw amount. Amounts beyond `Decimal` range saturate.
pub fn display_amount(raw: U256, decimals: u8) -> Decimal {
    from_base_units(raw, decimals).unwrap_or_else(|e| {
        warn!("Display amount saturated for {}: {:#}", raw, e);
        Decimal::MAX
    })
}

pub struct QuoteCalculator {
    gateway: Arc<dyn ChainGateway>,
}

impl QuoteCalculator {
    pub fn new(gateway: Arc<dyn ChainGateway>) -> Self {
        Self { gateway }
    }

    pub fn swap_path(&self, network: &NetworkConfig, token: Address) -> Vec<Address> {
        vec![self.gateway.wrapped_asset_address(network), token]
    }

    pub async fn quote(
        &self,
        network: &NetworkConfig,
        token: Address,
        amount_in: U256,
        slippage_pct: u32,
    ) -> SwapResult<SwapQuote> {
        let path = self.swap_path(network, token);

        let amounts = self.gateway
            .quote_path(network, amount_in, &path)
            .await
            .map_err(|e| SwapError::QuoteFailed { message: format!("{:#}", e) })?;

        let expected_out = match amounts.as_slice() {
            [_, .., last] if !last.is_zero() => *last,
            _ => {
                debug!("Router returned {:?} for {}", amounts, token);
                return Err(SwapError::NoLiquidity { token: token.to_string() });
            }
        };

        let min_out = minimum_output(expected_out, slippage_pct);
        let metadata = self.token_metadata(network, token).await;

        let expected_out_tokens = display_amount(expected_out, metadata.decimals);
        let min_out_tokens = display_amount(min_out, metadata.decimals);

        Ok(SwapQuote {
            path,
            amount_in,
            expected_out,
            min_out,
            slippage_pct,
            expected_out_tokens,
            min_out_tokens,
            metadata,
        })
    }

    /// Symbol and decimals, degrading to `UNKNOWN`/18 when the token does not answer.
    pub async fn token_metadata(&self, network: &NetworkConfig, token: Address) -> TokenMetadata {
        let symbol = match self.gateway.token_symbol(network, token).await {
            Ok(symbol) => symbol,
            Err(e) => {
                warn!("Symbol lookup failed for {}: {:#}", token, e);
                UNKNOWN_SYMBOL.to_string()
            }
        };
        let decimals = match self.gateway.token_decimals(network, token).await {
            Ok(decimals) if decimals <= MAX_TOKEN_DECIMALS => decimals,
            Ok(decimals) => {
                warn!("Unsupported decimals {} for {}, using {}", decimals, token, FALLBACK_DECIMALS);
                FALLBACK_DECIMALS
            }
            Err(e) => {
                warn!("Decimals lookup failed for {}: {:#}", token, e);
                FALLBACK_DECIMALS
            }
        };
        TokenMetadata { symbol, decimals }
    }
}
