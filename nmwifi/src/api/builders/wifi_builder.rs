//! WiFi connection builder.
//!
//! Wraps [`ConnectionBuilder`] and adds the `802-11-wireless` section and,
//! for pre-shared-key networks, the `802-11-wireless-security` section.

use zvariant::Value;

use super::connection_builder::{ConnectionBuilder, ConnectionSettings, Section};
use crate::types::constants::settings;

/// Builder for WiFi (802.11) infrastructure connections.
///
/// # Examples
///
/// ```rust
/// use nmwifi::builders::WifiConnectionBuilder;
///
/// let open = WifiConnectionBuilder::new("CoffeeShop").open().build();
/// assert!(!open.contains_key("802-11-wireless-security"));
///
/// let home = WifiConnectionBuilder::new("HomeNet")
///     .psk("wpa-psk", "correct horse")
///     .interface_name("wlan0")
///     .build();
/// assert!(home.contains_key("802-11-wireless-security"));
/// ```
#[derive(Debug)]
pub struct WifiConnectionBuilder {
    inner: ConnectionBuilder,
    ssid: String,
    security: Option<Section>,
    hidden: Option<bool>,
}

impl WifiConnectionBuilder {
    /// Creates a builder for `ssid` with IPv4 and IPv6 set to auto.
    ///
    /// The profile id is the SSID. Without a call to [`psk`](Self::psk) the
    /// network is open.
    pub fn new(ssid: impl Into<String>) -> Self {
        let ssid = ssid.into();
        let inner = ConnectionBuilder::new(settings::WIRELESS_TYPE, &ssid).ip_auto();

        Self {
            inner,
            ssid,
            security: None,
            hidden: None,
        }
    }

    /// Open network: no security section is emitted.
    pub fn open(mut self) -> Self {
        self.security = None;
        self
    }

    /// Pre-shared-key security.
    ///
    /// `key_mgmt` is `wpa-psk` for WPA/WPA2 personal or `sae` for WPA3.
    pub fn psk(mut self, key_mgmt: &'static str, passphrase: impl Into<String>) -> Self {
        self.security = Some(Section::from([
            ("key-mgmt", Value::from(key_mgmt)),
            ("psk", Value::from(passphrase.into())),
        ]));
        self
    }

    /// Sets the `hidden` flag so NetworkManager probes for the SSID directly.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn interface_name(mut self, name: impl Into<String>) -> Self {
        self.inner = self.inner.interface_name(name);
        self
    }

    /// Builds the final connection settings dictionary.
    pub fn build(self) -> ConnectionSettings {
        let mut wireless = Section::from([
            ("ssid", Value::from(self.ssid.into_bytes())),
            ("mode", Value::from(settings::MODE_INFRASTRUCTURE)),
        ]);
        if let Some(hidden) = self.hidden {
            wireless.insert("hidden", Value::from(hidden));
        }

        let inner = match self.security {
            Some(security) => {
                wireless.insert("security", Value::from(settings::WIRELESS_SECURITY));
                self.inner.section(settings::WIRELESS_SECURITY, security)
            }
            None => self.inner,
        };

        inner.section(settings::WIRELESS_TYPE, wireless).build()
    }
}
