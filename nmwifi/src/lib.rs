//! Wi-Fi management over NetworkManager's D-Bus API.
//!
//! This crate provides a high-level async API for the operations a Wi-Fi
//! settings plugin needs:
//!
//! - Listing visible and saved networks
//! - Connecting to open and WPA/WPA2/WPA3 personal networks, reusing saved
//!   profiles where NetworkManager allows it
//! - Forgetting and pre-seeding saved networks
//! - Scanning, signal strength and a normalized Wi-Fi state
//! - A background monitor reporting interface, Wi-Fi, address and scan
//!   events to a listener
//!
//! # Example
//!
//! ```no_run
//! use nmwifi::{SecurityMode, WifiConnectRequest, WifiManager};
//!
//! # async fn example() -> nmwifi::Result<()> {
//! let manager = WifiManager::new().await?;
//!
//! // List visible networks
//! for net in manager.get_available_ssids().await? {
//!     println!("{} ({}%, {})", net.ssid, net.strength, net.security);
//! }
//!
//! // Connect to a network
//! let request = WifiConnectRequest::new("MyNetwork", SecurityMode::Wpa2PskAes)
//!     .with_passphrase("password123");
//! manager.connect(&request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ConnectionError>`. Transport failures,
//! missing devices or profiles and rejected input are separate variants.
//! Requests are validated before anything is sent to NetworkManager.
//!
//! # Event Monitoring
//!
//! [`EventMonitor`] runs on its own thread with a single-threaded runtime and
//! calls an [`EventListener`] for every normalized event. `stop()` joins the
//! thread; no callback runs after it returns.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`.

// Internal implementation modules
mod core;
mod monitoring;
mod types;
mod util;

// Public API modules
pub mod api;
pub mod dbus;

pub use api::builders;
pub use api::config::{DEFAULT_ETHERNET_INTERFACE, DEFAULT_WIFI_INTERFACE, InterfaceConfig};
pub use api::models::{
    AccessPointInfo, ConnectionError, DeviceProperties, DeviceState, DeviceType, InterfaceState,
    IpAddressChange, SecurityMode, SignalQuality, SignalReport, StateReason, WifiBand,
    WifiConnectRequest, WifiState,
};
pub use api::network_manager::WifiManager;
pub use dbus::{NetworkBus, SystemBus};
pub use monitoring::{EventListener, EventMonitor};
pub use util::utils::signal_to_dbm;

/// A specialized `Result` type for network operations.
pub type Result<T> = std::result::Result<T, ConnectionError>;
