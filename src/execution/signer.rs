//! Signing capability handed to the execution pipeline

use alloy::{
    eips::eip2718::Encodable2718,
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes},
    rpc::types::eth::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Signs fully populated transactions for one account.
///
/// The pipeline only ever sees this interface, never key material.
#[async_trait]
pub trait TradeSigner: Send + Sync {
    /// Account that pays for and receives the swap.
    fn address(&self) -> Address;

    /// Return the EIP-2718 encoded signed transaction.
    async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes>;
}

/// In-process signer built from a hex private key.
pub struct LocalKeySigner {
    address: Address,
    wallet: EthereumWallet,
}

impl LocalKeySigner {
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key.trim())
            .context("Failed to parse private key")?;
        Ok(Self {
            address: signer.address(),
            wallet: EthereumWallet::from(signer),
        })
    }
}

impl fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TradeSigner for LocalKeySigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes> {
        let envelope = <TransactionRequest as TransactionBuilder<Ethereum>>::build(tx, &self.wallet)
            .await
            .context("Failed to sign transaction")?;
        Ok(envelope.encoded_2718().into())
    }
}
