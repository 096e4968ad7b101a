//! Swap Scheduler Bot - scheduled native-to-token swaps on Uniswap V2 style routers
//!
//! Trades are validated and either executed immediately or stored until their
//! scheduled time, when a background scheduler hands them to the execution
//! pipeline (quote, gas plan, balance check, sign and submit).

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod quote;
pub mod registry;
pub mod execution;
pub mod scheduler;
pub mod engine;
pub mod validation;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use config::{Config, CONFIG};
pub use engine::SwapEngine;
pub use errors::{SwapError, SwapResult, ValidationError};
pub use types::*;

// Type alias for our concrete provider
pub type ConcreteProvider = alloy::providers::RootProvider<alloy::transports::BoxTransport>;
