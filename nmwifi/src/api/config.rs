//! Interface configuration.
//!
//! Names the interfaces this crate manages and monitors. NetworkManager is
//! always queried for the device behind a name; nothing here is cached.

use serde::Serialize;

/// Default Wi-Fi interface name.
pub const DEFAULT_WIFI_INTERFACE: &str = "wlan0";

/// Default Ethernet interface name.
pub const DEFAULT_ETHERNET_INTERFACE: &str = "eth0";

/// Names of the Wi-Fi and Ethernet interfaces to manage.
///
/// # Example
///
/// ```rust
/// use nmwifi::InterfaceConfig;
///
/// let config = InterfaceConfig::new().with_wifi_interface("wlp2s0");
/// assert_eq!(config.wifi_interface, "wlp2s0");
/// assert_eq!(config.ethernet_interface, "eth0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceConfig {
    /// Interface used for scanning, connecting and Wi-Fi state.
    pub wifi_interface: String,
    /// Wired interface reported through interface-state events.
    pub ethernet_interface: String,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            wifi_interface: DEFAULT_WIFI_INTERFACE.to_string(),
            ethernet_interface: DEFAULT_ETHERNET_INTERFACE.to_string(),
        }
    }
}

impl InterfaceConfig {
    /// Creates a configuration with the default interface names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Wi-Fi interface name.
    pub fn with_wifi_interface(mut self, name: impl Into<String>) -> Self {
        self.wifi_interface = name.into();
        self
    }

    /// Sets the Ethernet interface name.
    pub fn with_ethernet_interface(mut self, name: impl Into<String>) -> Self {
        self.ethernet_interface = name.into();
        self
    }

    /// Returns `true` if events for this interface are reported.
    pub fn is_monitored(&self, interface: &str) -> bool {
        interface == self.wifi_interface || interface == self.ethernet_interface
    }

    /// Returns `true` if this is the configured Wi-Fi interface.
    pub fn is_wifi(&self, interface: &str) -> bool {
        interface == self.wifi_interface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_names() {
        let config = InterfaceConfig::default();
        assert_eq!(config.wifi_interface, "wlan0");
        assert_eq!(config.ethernet_interface, "eth0");
    }

    #[test]
    fn monitored_interfaces() {
        let config = InterfaceConfig::new()
            .with_wifi_interface("wlp3s0")
            .with_ethernet_interface("enp0s25");

        assert!(config.is_monitored("wlp3s0"));
        assert!(config.is_monitored("enp0s25"));
        assert!(!config.is_monitored("wlan0"));
        assert!(!config.is_monitored("lo"));
        assert!(config.is_wifi("wlp3s0"));
        assert!(!config.is_wifi("enp0s25"));
    }
}
