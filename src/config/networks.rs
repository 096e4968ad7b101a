//! Static registry of supported chains

use tracing::warn;
use crate::types::{
    NetworkConfig, BASE_CHAIN_ID, ETHEREUM_CHAIN_ID, UNISWAP_V2_ROUTER_BASE,
    UNISWAP_V2_ROUTER_MAINNET, WETH_BASE, WETH_MAINNET,
};

#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<NetworkConfig>,
    default_index: usize,
}

impl NetworkRegistry {
    /// Base and Ethereum mainnet with public RPC endpoints.
    ///
    /// An unknown `default_network` falls back to `base`.
    pub fn with_defaults(default_network: &str) -> Self {
        let networks = vec![
            NetworkConfig {
                name: "base".to_string(),
                display_name: "Base".to_string(),
                rpc_url: "https://mainnet.base.org".to_string(),
                chain_id: BASE_CHAIN_ID,
                router: UNISWAP_V2_ROUTER_BASE,
                wrapped_native: WETH_BASE,
                native_symbol: "ETH".to_string(),
                explorer_tx_url: "https://basescan.org/tx/".to_string(),
            },
            NetworkConfig {
                name: "ethereum".to_string(),
                display_name: "Ethereum".to_string(),
                rpc_url: "https://eth.llamarpc.com".to_string(),
                chain_id: ETHEREUM_CHAIN_ID,
                router: UNISWAP_V2_ROUTER_MAINNET,
                wrapped_native: WETH_MAINNET,
                native_symbol: "ETH".to_string(),
                explorer_tx_url: "https://etherscan.io/tx/".to_string(),
            },
        ];
        Self::new(networks, default_network)
    }

    pub fn new(networks: Vec<NetworkConfig>, default_network: &str) -> Self {
        let default_index = networks
            .iter()
            .position(|n| n.name.eq_ignore_ascii_case(default_network))
            .unwrap_or(0);
        Self { networks, default_index }
    }

    pub fn default_network(&self) -> &NetworkConfig {
        &self.networks[self.default_index]
    }

    pub fn get(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Look up a network by name, falling back to the default for unknown names.
    pub fn resolve(&self, name: &str) -> &NetworkConfig {
        match self.get(name) {
            Some(network) => network,
            None => {
                let fallback = self.default_network();
                warn!("Unknown network '{}', falling back to {}", name, fallback.name);
                fallback
            }
        }
    }

    pub fn set_rpc_url(&mut self, name: &str, rpc_url: String) {
        if let Some(network) = self.networks.iter_mut().find(|n| n.name == name) {
            network.rpc_url = rpc_url;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.iter()
    }
}
