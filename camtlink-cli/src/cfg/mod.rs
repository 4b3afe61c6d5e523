//! Program configuration.

mod config;
pub(crate) mod utils;

pub use config::Config;
