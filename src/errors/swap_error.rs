//! Trade outcome and request validation errors

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Caller input rejected before a trade enters the registry.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Invalid date/time format: {0}")]
    MalformedScheduleTime(String),

    #[error("Scheduled time must be in the future: {0}")]
    ScheduleInPast(DateTime<Utc>),
}

/// Terminal failure recorded on a trade.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum SwapError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("RPC failed: {network} is unreachable")]
    RpcUnavailable { network: String },

    #[error("Invalid token: {token}")]
    InvalidToken { token: String },

    #[error("No liquidity for {token}")]
    NoLiquidity { token: String },

    #[error("Quote failed: {message}")]
    QuoteFailed { message: String },

    #[error("Need {shortfall:.6} more {symbol}")]
    InsufficientBalance { shortfall: Decimal, symbol: String },

    #[error("No signing credential available for trade {trade}")]
    MissingCredential { trade: String },

    #[error("Transaction submission failed: {message}")]
    SubmissionFailed { message: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl SwapError {
    pub fn unexpected(error: anyhow::Error) -> Self {
        SwapError::Unexpected {
            message: format!("{:#}", error),
        }
    }

    /// Stable label used in statistics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SwapError::Validation(_) => "validation",
            SwapError::RpcUnavailable { .. } => "rpc_unavailable",
            SwapError::InvalidToken { .. } => "invalid_token",
            SwapError::NoLiquidity { .. } => "no_liquidity",
            SwapError::QuoteFailed { .. } => "quote_failed",
            SwapError::InsufficientBalance { .. } => "insufficient_balance",
            SwapError::MissingCredential { .. } => "missing_credential",
            SwapError::SubmissionFailed { .. } => "submission_failed",
            SwapError::Unexpected { .. } => "unexpected",
        }
    }
}

pub type SwapResult<T> = Result<T, SwapError>;
