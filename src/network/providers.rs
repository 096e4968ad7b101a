//! JSON-RPC gateway backed by alloy HTTP providers

use alloy::{
    primitives::{Address, TxHash, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::eth::TransactionRequest,
    sol_types::SolValue,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::{
    config::NetworkRegistry,
    execution::TradeSigner,
    network::{contracts, gateway::ChainGateway, timeout::with_timeout},
    types::NetworkConfig,
    ConcreteProvider,
};

pub struct AlloyGateway {
    providers: HashMap<String, Arc<ConcreteProvider>>,
    call_timeout: Duration,
}

impl AlloyGateway {
    pub fn new(networks: &NetworkRegistry, call_timeout: Duration) -> Result<Self> {
        let mut providers = HashMap::new();
        for network in networks.iter() {
            let provider: Arc<ConcreteProvider> = Arc::new(
                ProviderBuilder::new()
                    .on_http(network.rpc_url.parse().with_context(|| {
                        format!("Invalid RPC URL for {}: {}", network.name, network.rpc_url)
                    })?)
                    .boxed(),
            );
            debug!("Configured provider for {} at {}", network.name, network.rpc_url);
            providers.insert(network.name.clone(), provider);
        }

        Ok(Self {
            providers,
            call_timeout,
        })
    }

    fn provider(&self, network: &NetworkConfig) -> Result<&Arc<ConcreteProvider>> {
        self.providers
            .get(&network.name)
            .ok_or_else(|| anyhow::anyhow!("No provider configured for {}", network.name))
    }

    async fn call_token(&self, network: &NetworkConfig, token: Address, signature: &str) -> Result<alloy::primitives::Bytes> {
        let provider = self.provider(network)?;
        let tx = TransactionRequest::default()
            .to(token)
            .input(contracts::selector(signature).into());

        with_timeout(self.call_timeout, signature, async {
            provider.call(&tx).await
                .with_context(|| format!("Failed to call {} on {}", signature, token))
        }).await
    }
}

#[async_trait]
impl ChainGateway for AlloyGateway {
    async fn is_connected(&self, network: &NetworkConfig) -> bool {
        let Ok(provider) = self.provider(network) else {
            return false;
        };

        let result = with_timeout(self.call_timeout, "eth_blockNumber", async {
            provider.get_block_number().await.context("Failed to get block number")
        }).await;

        match result {
            Ok(block) => {
                debug!("{} reachable at block {}", network.name, block);
                true
            }
            Err(e) => {
                warn!("⚠️ {} RPC unreachable: {:#}", network.name, e);
                false
            }
        }
    }

    async fn code_exists_at(&self, network: &NetworkConfig, address: Address) -> Result<bool> {
        let provider = self.provider(network)?;
        let code = with_timeout(self.call_timeout, "eth_getCode", async {
            provider.get_code_at(address).await
                .with_context(|| format!("Failed to get code at {}", address))
        }).await?;
        Ok(!code.is_empty())
    }

    async fn quote_path(
        &self,
        network: &NetworkConfig,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>> {
        let provider = self.provider(network)?;
        let tx = TransactionRequest::default()
            .to(network.router)
            .input(contracts::encode_get_amounts_out(amount_in, path).into());

        let data = with_timeout(self.call_timeout, "getAmountsOut", async {
            provider.call(&tx).await.context("Failed to call getAmountsOut")
        }).await?;

        contracts::decode_get_amounts_out(&data).context("Failed to decode getAmountsOut")
    }

    async fn token_symbol(&self, network: &NetworkConfig, token: Address) -> Result<String> {
        let data = self.call_token(network, token, "symbol()").await?;
        String::abi_decode(&data, true).context("Failed to decode symbol")
    }

    async fn token_decimals(&self, network: &NetworkConfig, token: Address) -> Result<u8> {
        let data = self.call_token(network, token, "decimals()").await?;
        let raw = U256::abi_decode(&data, true).context("Failed to decode decimals")?;
        u8::try_from(raw)
            .ok()
            .with_context(|| format!("Decimals out of range for {}: {}", token, raw))
    }

    async fn gas_price(&self, network: &NetworkConfig) -> Result<u128> {
        let provider = self.provider(network)?;
        with_timeout(self.call_timeout, "eth_gasPrice", async {
            provider.get_gas_price().await.context("Failed to get gas price")
        }).await
    }

    async fn next_nonce(&self, network: &NetworkConfig, address: Address) -> Result<u64> {
        let provider = self.provider(network)?;
        with_timeout(self.call_timeout, "eth_getTransactionCount", async {
            provider.get_transaction_count(address).await
                .context("Failed to get transaction count")
        }).await
    }

    async fn estimate_gas(&self, network: &NetworkConfig, tx: &TransactionRequest) -> Result<u64> {
        let provider = self.provider(network)?;
        with_timeout(self.call_timeout, "eth_estimateGas", async {
            provider.estimate_gas(tx).await.context("Failed to estimate gas")
        }).await
    }

    async fn balance_of(&self, network: &NetworkConfig, address: Address) -> Result<U256> {
        let provider = self.provider(network)?;
        with_timeout(self.call_timeout, "eth_getBalance", async {
            provider.get_balance(address).await.context("Failed to get balance")
        }).await
    }

    async fn sign_and_send(
        &self,
        network: &NetworkConfig,
        tx: TransactionRequest,
        signer: &dyn TradeSigner,
    ) -> Result<TxHash> {
        let provider = self.provider(network)?;
        let raw = signer.sign_transaction(tx).await?;

        let pending = with_timeout(self.call_timeout, "eth_sendRawTransaction", async {
            provider.send_raw_transaction(&raw).await
                .context("Failed to send transaction")
        }).await?;

        let tx_hash = *pending.tx_hash();
        info!("📡 Transaction sent on {}: {:?}", network.display_name, tx_hash);
        Ok(tx_hash)
    }
}
