//! Engine surface for front ends

pub mod swap_engine;

pub use swap_engine::*;
