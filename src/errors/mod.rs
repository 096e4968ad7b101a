//! Error types for trade validation and execution

pub mod swap_error;

pub use swap_error::*;
