//! Price estimation shared by quoting and execution

pub mod calculator;

pub use calculator::*;
