//! Trade execution pipeline and signing

pub mod engine;
pub mod signer;

pub use engine::*;
pub use signer::*;
