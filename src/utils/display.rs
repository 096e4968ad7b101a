//! Display and printing utilities

use std::time::Instant;
use tracing::{error, info, warn};
use crate::{
    registry::RegistryStats,
    types::{QuoteSummary, Trade, TradeStatus},
};

/// `0x1234abcd...89ef` style abbreviation for log lines.
pub fn short_hash(hash: &str) -> String {
    if hash.len() <= 18 {
        return hash.to_string();
    }
    match (hash.get(..10), hash.get(hash.len() - 6..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => hash.to_string(),
    }
}

pub fn print_trade_outcome(trade: &Trade) {
    match (&trade.status, &trade.result, &trade.error) {
        (TradeStatus::Completed, Some(result), _) => {
            warn!("\n✅ SWAP #{}", trade.display_id());
            warn!("📍 Network: {}", trade.network);
            warn!("💰 Swap Details:");
            warn!("   Spent: {} ETH", trade.native_amount);
            warn!("   Token: ...{}", trade.short_token());
            warn!("   Expected: {:.6} {}", result.tokens_received, result.symbol);
            warn!("   Minimum: {:.6} {} ({}% slippage)", result.min_tokens, result.symbol, trade.slippage_pct);
            warn!("   Gas Limit: {}", result.gas_limit);
            warn!("   Tx Hash: {}", short_hash(&result.tx_hash));
            warn!("   Explorer: {}", result.explorer_url);
        }
        (TradeStatus::Failed, _, error) => {
            error!("\n❌ SWAP FAILED #{}", trade.display_id());
            error!("   Token: ...{}", trade.short_token());
            match error {
                Some(e) => error!("   Error ({}): {}", e.kind(), e),
                None => error!("   Error: Unknown"),
            }
        }
        _ => info!("Swap #{} is {}", trade.display_id(), trade.status),
    }
}

pub fn print_quote(token_address: &str, quote: &QuoteSummary) {
    info!("💱 Quote for {}", token_address);
    info!("   Expected: {:.6} {}", quote.expected_out, quote.symbol);
    info!("   Minimum:  {:.6} {}", quote.min_out, quote.symbol);
}

pub fn print_session_stats(start_time: Instant, stats: &RegistryStats) {
    let runtime = start_time.elapsed().as_secs() / 60;
    let finished = stats.completed + stats.failed;

    info!("\n📊 Session Statistics ({} minutes)", runtime);
    info!("   📅 Scheduled: {}", stats.scheduled);
    info!("   🚀 Executing: {}", stats.executing);
    info!("   ✅ Completed: {}", stats.completed);
    info!("   ❌ Failed: {}", stats.failed);
    info!("   Success rate: {:.1}%",
        if finished > 0 {
            (stats.completed as f64 / finished as f64) * 100.0
        } else {
            0.0
        }
    );
    info!("");
}
