//! Caller input validation

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use crate::{errors::ValidationError, types::TradeRequest};

pub const SCHEDULE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Checks shared by immediate and scheduled trades.
///
/// `has_fallback_signer` lets a request without its own credential through
/// when the engine can sign on its behalf.
pub fn validate_trade_request(
    request: &TradeRequest,
    has_fallback_signer: bool,
) -> Result<(), ValidationError> {
    if request.token_address.trim().is_empty() {
        return Err(ValidationError::MissingField("token_address".to_string()));
    }
    validate_amount(request.native_amount)?;
    if request.credential.is_none() && !has_fallback_signer {
        return Err(ValidationError::MissingField("credential".to_string()));
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

pub fn validate_schedule_time(
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if scheduled_at <= now {
        return Err(ValidationError::ScheduleInPast(scheduled_at));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD HH:MM:SS` (taken as UTC) or RFC 3339.
pub fn parse_schedule_time(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::MissingField("scheduled_at".to_string()));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, SCHEDULE_TIME_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::MalformedScheduleTime(input.to_string()))
}
