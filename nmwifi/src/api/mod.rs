//! Public API module.
//!
//! The [`WifiManager`](network_manager::WifiManager) facade, the data model,
//! interface configuration and profile builders.

pub mod builders;
pub mod config;
pub mod models;
pub mod network_manager;
