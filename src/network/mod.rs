//! Chain access: gateway capability, alloy providers and contract bindings

pub mod gateway;
pub mod contracts;
pub mod providers;
pub mod timeout;

pub use gateway::*;
pub use providers::*;
pub use timeout::*;
