//! NetworkManager IP configuration proxies.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::OwnedValue;

/// IPv4 configuration of an active device.
#[proxy(
    interface = "org.freedesktop.NetworkManager.IP4Config",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMIp4Config {
    /// Address data objects (`address`, `prefix`).
    #[zbus(property)]
    fn address_data(&self) -> Result<Vec<HashMap<String, OwnedValue>>>;
}

/// IPv6 configuration of an active device.
#[proxy(
    interface = "org.freedesktop.NetworkManager.IP6Config",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMIp6Config {
    /// Address data objects (`address`, `prefix`).
    #[zbus(property)]
    fn address_data(&self) -> Result<Vec<HashMap<String, OwnedValue>>>;
}
