//! Mathematical utility functions

use alloy::primitives::U256;
use anyhow::{Context, Result};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::str::FromStr;

const MAX_DECIMAL_SCALE: u8 = 28;
// 10^77 is the largest power of ten that fits in a U256
pub const MAX_TOKEN_DECIMALS: u8 = 77;

pub fn pow10(n: i32) -> Decimal {
    match n {
        0 => dec!(1),
        6 => dec!(1_000_000),
        18 => dec!(1_000_000_000_000_000_000),
        _ => {
            let mut result = dec!(1);
            if n > 0 {
                for _ in 0..n {
                    result *= dec!(10);
                }
            } else {
                for _ in 0..(-n) {
                    result /= dec!(10);
                }
            }
            result
        }
    }
}

/// Convert a display amount into smallest units, truncating extra precision.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() {
        return Err(anyhow::anyhow!("Negative amount: {}", amount));
    }
    let scaled = amount
        .checked_mul(pow10(decimals as i32))
        .ok_or_else(|| anyhow::anyhow!("Amount {} overflows at {} decimals", amount, decimals))?
        .trunc();
    let units = scaled
        .to_u128()
        .ok_or_else(|| anyhow::anyhow!("Amount {} out of range", amount))?;
    Ok(U256::from(units))
}

/// Convert smallest units into a display amount.
///
/// Precision beyond 28 fractional digits is truncated.
pub fn from_base_units(amount: U256, decimals: u8) -> Result<Decimal> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(anyhow::anyhow!("Unsupported token decimals: {}", decimals));
    }
    let scale = U256::from(10u8).pow(U256::from(decimals));
    let whole = Decimal::from_str(&(amount / scale).to_string())
        .context("Token amount exceeds decimal range")?;

    let mut fraction = amount % scale;
    if decimals > MAX_DECIMAL_SCALE {
        fraction /= U256::from(10u8).pow(U256::from(decimals - MAX_DECIMAL_SCALE));
    }
    let fraction: u128 = fraction.try_into().context("Fractional part out of range")?;
    let fraction = Decimal::from_i128_with_scale(
        fraction as i128,
        decimals.min(MAX_DECIMAL_SCALE) as u32,
    );

    whole
        .checked_add(fraction)
        .map(|d| d.normalize())
        .ok_or_else(|| anyhow::anyhow!("Token amount exceeds decimal range"))
}
