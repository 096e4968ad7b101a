//! Shared trade registry

pub mod store;

pub use store::*;
