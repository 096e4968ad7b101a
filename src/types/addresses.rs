//! Router and wrapped-native addresses per chain

use alloy::primitives::{Address, address};

pub const BASE_CHAIN_ID: u64 = 8453;
pub const ETHEREUM_CHAIN_ID: u64 = 1;

// Base mainnet
pub const WETH_BASE: Address = address!("4200000000000000000000000000000000000006");
pub const UNISWAP_V2_ROUTER_BASE: Address = address!("4752ba5DBc23f44D87826276BF6Fd6b1C372aD24");

// Ethereum mainnet
pub const WETH_MAINNET: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const UNISWAP_V2_ROUTER_MAINNET: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");
