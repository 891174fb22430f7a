//! Connection builders for Wi-Fi profiles.
//!
//! These construct the NetworkManager settings dictionaries passed to
//! `AddAndActivateConnection2`, `AddConnection` and `Update`.
//!
//! Most users go through [`WifiManager`](crate::WifiManager); the builders
//! are exposed for callers that need to inspect or tweak a profile before
//! it is sent.

pub mod connection_builder;
pub mod wifi;
pub mod wifi_builder;

pub use connection_builder::{ConnectionBuilder, ConnectionSettings, Section};
pub use wifi::build_wifi_connection;
pub use wifi_builder::WifiConnectionBuilder;
