//! Constants for NetworkManager D-Bus interface values.
//!
//! Setting names, limits and flag bits used by NetworkManager's D-Bus API
//! for profiles and access points.

use bitflags::bitflags;

/// Well-known object paths.
pub mod dbus_names {
    /// The null object path NetworkManager uses for "none".
    pub const ROOT_PATH: &str = "/";
}

/// Connection profile setting names and values.
pub mod settings {
    pub const WIRELESS_TYPE: &str = "802-11-wireless";
    pub const WIRELESS_SECURITY: &str = "802-11-wireless-security";
    pub const MODE_INFRASTRUCTURE: &str = "infrastructure";
    pub const PERSIST_KEY: &str = "persist";
    pub const PERSIST_VOLATILE: &str = "volatile";
    pub const SCAN_SSIDS_KEY: &str = "ssids";
}

/// SSID and passphrase length limits (bytes).
pub mod limits {
    pub const SSID_MAX_LEN: usize = 32;
    pub const PSK_MIN_LEN: usize = 8;
    pub const PSK_MAX_LEN: usize = 63;
    pub const PSK_HEX_LEN: usize = 64;
}

/// Linear dBm interpolation bounds for the 0-100% strength indicator.
pub mod signal_strength {
    pub const DBM_AT_FULL: i32 = -30;
    pub const DBM_AT_ZERO: i32 = -90;

    pub const EXCELLENT_MIN_DBM: i32 = -50;
    pub const GOOD_MIN_DBM: i32 = -60;
    pub const FAIR_MIN_DBM: i32 = -67;
}

/// WiFi frequency constants (MHz)
pub mod frequency {
    pub const BAND_2_4_START: u32 = 2412;
    pub const BAND_2_4_END: u32 = 2484;
    pub const BAND_5_START: u32 = 5150;
    pub const BAND_5_END: u32 = 5925;
    pub const BAND_6_START: u32 = 5955;
    pub const BAND_6_END: u32 = 7115;
}

bitflags! {
    /// Access point capability flags (`Flags` property).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApFlags: u32 {
        const PRIVACY = 0x0000_0001;
        const WPS = 0x0000_0002;
        const WPS_PBC = 0x0000_0004;
        const WPS_PIN = 0x0000_0008;
    }

    /// Access point security flags (`WpaFlags` / `RsnFlags` properties).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApSecurityFlags: u32 {
        const PAIR_WEP40 = 0x0000_0001;
        const PAIR_WEP104 = 0x0000_0002;
        const PAIR_TKIP = 0x0000_0004;
        const PAIR_CCMP = 0x0000_0008;
        const GROUP_WEP40 = 0x0000_0010;
        const GROUP_WEP104 = 0x0000_0020;
        const GROUP_TKIP = 0x0000_0040;
        const GROUP_CCMP = 0x0000_0080;
        const KEY_MGMT_PSK = 0x0000_0100;
        const KEY_MGMT_802_1X = 0x0000_0200;
        const KEY_MGMT_SAE = 0x0000_0400;
        const KEY_MGMT_OWE = 0x0000_0800;
        const KEY_MGMT_OWE_TM = 0x0000_1000;
    }
}
