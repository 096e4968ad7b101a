//! Core data types and structures

pub mod addresses;
pub mod network;
pub mod trade;
pub mod quote;

pub use addresses::*;
pub use network::*;
pub use trade::*;
pub use quote::*;
