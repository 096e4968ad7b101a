//! Validation of caller input

pub mod request;

pub use request::*;
