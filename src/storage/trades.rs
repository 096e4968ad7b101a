//! Finished trade audit log

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::types::Trade;

pub fn trade_log_path(dir: &Path) -> PathBuf {
    dir.join(format!("trades_{}.jsonl", Utc::now().format("%Y-%m-%d")))
}

/// Append one finished trade as a JSON line. Signing material is never written.
pub fn save_finished_trade(dir: &Path, trade: &Trade) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let filename = trade_log_path(dir);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&filename)?;

    writeln!(file, "{}", serde_json::to_string(&trade.redacted())?)?;

    info!(
        trade_id = %trade.display_id(),
        status = %trade.status,
        tx_hash = ?trade.result.as_ref().map(|r| &r.tx_hash),
        "Saved finished trade"
    );

    Ok(())
}
