//! Shared sections of a NetworkManager profile.
//!
//! `ConnectionBuilder` fills the `connection` section and the IP sections;
//! [`WifiConnectionBuilder`](super::WifiConnectionBuilder) adds the wireless
//! sections on top.
//!
//! # Example
//!
//! ```rust
//! use nmwifi::builders::ConnectionBuilder;
//!
//! let settings = ConnectionBuilder::new("802-11-wireless", "HomeNet")
//!     .interface_name("wlan0")
//!     .ip_auto()
//!     .build();
//! assert!(settings.contains_key("ipv4"));
//! assert!(settings.contains_key("ipv6"));
//! ```

use std::collections::HashMap;
use uuid::Uuid;
use zvariant::Value;

/// One `a{sv}` section of a profile.
pub type Section = HashMap<&'static str, Value<'static>>;

/// A NetworkManager settings dictionary (`a{sa{sv}}`), ready to send.
pub type ConnectionSettings = HashMap<&'static str, Section>;

const CONNECTION: &str = "connection";
const IP_SECTIONS: [&str; 2] = ["ipv4", "ipv6"];

/// Builds the sections every profile carries.
///
/// Each profile gets a fresh random UUID; NetworkManager keys profiles by
/// it, so two builds never collide even for the same SSID.
#[derive(Debug)]
pub struct ConnectionBuilder {
    settings: ConnectionSettings,
}

impl ConnectionBuilder {
    /// Starts a profile of `connection_type` named `id`.
    pub fn new(connection_type: &str, id: impl Into<String>) -> Self {
        let connection = Section::from([
            ("type", Value::from(connection_type.to_string())),
            ("id", Value::from(id.into())),
            ("uuid", Value::from(Uuid::new_v4().to_string())),
        ]);

        Self {
            settings: ConnectionSettings::from([(CONNECTION, connection)]),
        }
    }

    /// Restricts the profile to one interface.
    pub fn interface_name(mut self, name: impl Into<String>) -> Self {
        self.settings
            .entry(CONNECTION)
            .or_default()
            .insert("interface-name", Value::from(name.into()));
        self
    }

    /// Automatic addressing for both IPv4 (DHCP) and IPv6 (SLAAC/DHCPv6).
    pub fn ip_auto(mut self) -> Self {
        for family in IP_SECTIONS {
            self.settings
                .insert(family, Section::from([("method", Value::from("auto"))]));
        }
        self
    }

    /// Adds or replaces a whole section.
    pub fn section(mut self, name: &'static str, section: Section) -> Self {
        self.settings.insert(name, section);
        self
    }

    /// Removes a section if present.
    pub fn without_section(mut self, name: &str) -> Self {
        self.settings.remove(name);
        self
    }

    pub fn build(self) -> ConnectionSettings {
        self.settings
    }
}
