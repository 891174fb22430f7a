//! Wi-Fi profile description for a connect request.
//!
//! A profile is a nested dictionary:
//! - `connection`: type, id (the SSID), uuid, interface-name
//! - `802-11-wireless`: ssid bytes, infrastructure mode, hidden flag
//! - `802-11-wireless-security`: key-mgmt and psk, pre-shared-key modes only
//! - `ipv4` / `ipv6`: method "auto"

use log::warn;

use super::connection_builder::ConnectionSettings;
use super::wifi_builder::WifiConnectionBuilder;
use crate::api::models::WifiConnectRequest;
use crate::Result;

/// Builds the settings dictionary NetworkManager receives for `request`.
///
/// The request is validated first; an invalid request never produces a
/// dictionary.
///
/// # Example
///
/// ```rust
/// use nmwifi::builders::build_wifi_connection;
/// use nmwifi::{SecurityMode, WifiConnectRequest};
///
/// let request = WifiConnectRequest::new("Cafe", SecurityMode::None);
/// let settings = build_wifi_connection(&request, "wlan0").unwrap();
/// assert!(!settings.contains_key("802-11-wireless-security"));
/// ```
pub fn build_wifi_connection(
    request: &WifiConnectRequest,
    interface: &str,
) -> Result<ConnectionSettings> {
    if let Err(e) = request.validate() {
        warn!("Rejecting request for '{}': {e}", request.ssid);
        return Err(e);
    }

    let builder = WifiConnectionBuilder::new(&request.ssid)
        .interface_name(interface)
        .hidden(true);

    let builder = match request.security.key_mgmt() {
        Some(key_mgmt) => builder.psk(key_mgmt, &request.passphrase),
        None => builder.open(),
    };

    Ok(builder.build())
}
