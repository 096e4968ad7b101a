//! Scheduler loop for time-triggered trades

pub mod runner;

pub use runner::*;
