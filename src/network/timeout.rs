//! Per-call timeout guard for RPC requests

use std::future::Future;
use std::time::Duration;
use anyhow::Result;
use tracing::warn;

/// Run an RPC operation, failing it if it does not finish within `limit`.
///
/// No retries: a timed out call is reported to the caller as an error.
pub async fn with_timeout<Fut, T>(limit: Duration, context: &str, operation: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{} timed out after {:?}", context, limit);
            Err(anyhow::anyhow!("{} timed out after {}s", context, limit.as_secs_f64()))
        }
    }
}
