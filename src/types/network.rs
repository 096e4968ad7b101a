//! Per-chain configuration

use alloy::primitives::Address;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NetworkConfig {
    pub name: String,
    pub display_name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub router: Address,
    pub wrapped_native: Address,
    pub native_symbol: String,
    /// Prefix that a transaction hash is appended to.
    pub explorer_tx_url: String,
}

impl NetworkConfig {
    pub fn explorer_link(&self, tx_hash: &str) -> String {
        format!("{}{}", self.explorer_tx_url, tx_hash)
    }
}
