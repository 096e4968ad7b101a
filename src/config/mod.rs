//! Configuration management for the swap scheduler

pub mod settings;
pub mod networks;

pub use settings::*;
pub use networks::*;

use lazy_static::lazy_static;

lazy_static! {
    pub static ref CONFIG: Config = Config::load();
}
