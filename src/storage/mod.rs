//! Data persistence and file operations

pub mod trades;

pub use trades::*;
