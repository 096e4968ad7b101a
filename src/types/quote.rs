//! Swap quote types

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// Router quote for a native-to-token swap.
///
/// Raw amounts are in the token's smallest unit and are what threshold
/// comparisons and calldata use. The `*_tokens` fields are display values.
#[derive(Debug, Clone)]
pub struct SwapQuote {
    pub path: Vec<Address>,
    pub amount_in: U256,
    pub expected_out: U256,
    pub min_out: U256,
    pub slippage_pct: u32,
    pub metadata: TokenMetadata,
    pub expected_out_tokens: Decimal,
    pub min_out_tokens: Decimal,
}

impl SwapQuote {
    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            expected_out: self.expected_out_tokens,
            min_out: self.min_out_tokens,
            symbol: self.metadata.symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSummary {
    pub expected_out: Decimal,
    pub min_out: Decimal,
    pub symbol: String,
}
