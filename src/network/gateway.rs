//! Chain access capability used by the quote and execution paths

use alloy::{
    primitives::{Address, TxHash, U256},
    rpc::types::eth::TransactionRequest,
};
use anyhow::Result;
use async_trait::async_trait;
use crate::{execution::TradeSigner, types::NetworkConfig};

/// Everything the engine needs from a chain.
///
/// Implementations perform network I/O and may be slow; callers must not hold
/// registry locks across these calls.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Whether the network's RPC endpoint answers.
    async fn is_connected(&self, network: &NetworkConfig) -> bool;

    /// First hop of every swap path.
    fn wrapped_asset_address(&self, network: &NetworkConfig) -> Address {
        network.wrapped_native
    }

    async fn code_exists_at(&self, network: &NetworkConfig, address: Address) -> Result<bool>;

    /// Router `getAmountsOut` for `amount_in` along `path`.
    async fn quote_path(
        &self,
        network: &NetworkConfig,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>>;

    async fn token_symbol(&self, network: &NetworkConfig, token: Address) -> Result<String>;

    async fn token_decimals(&self, network: &NetworkConfig, token: Address) -> Result<u8>;

    /// Gas price in wei.
    async fn gas_price(&self, network: &NetworkConfig) -> Result<u128>;

    async fn next_nonce(&self, network: &NetworkConfig, address: Address) -> Result<u64>;

    async fn estimate_gas(&self, network: &NetworkConfig, tx: &TransactionRequest) -> Result<u64>;

    /// Native balance in wei.
    async fn balance_of(&self, network: &NetworkConfig, address: Address) -> Result<U256>;

    async fn sign_and_send(
        &self,
        network: &NetworkConfig,
        tx: TransactionRequest,
        signer: &dyn TradeSigner,
    ) -> Result<TxHash>;
}
