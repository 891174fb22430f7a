use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use zvariant::OwnedObjectPath;

use crate::types::constants::{frequency, limits};

/// NetworkManager device types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// Wired Ethernet device.
    Ethernet,
    /// Wi-Fi (802.11) wireless device.
    Wifi,
    /// Wi-Fi P2P (peer-to-peer) device.
    WifiP2P,
    /// Loopback device (localhost).
    Loopback,
    /// Unknown or unsupported device type with raw code.
    Other(u32),
}

impl From<u32> for DeviceType {
    fn from(value: u32) -> Self {
        match value {
            1 => DeviceType::Ethernet,
            2 => DeviceType::Wifi,
            30 => DeviceType::WifiP2P,
            32 => DeviceType::Loopback,
            v => DeviceType::Other(v),
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Ethernet => write!(f, "Ethernet"),
            DeviceType::Wifi => write!(f, "Wi-Fi"),
            DeviceType::WifiP2P => write!(f, "Wi-Fi P2P"),
            DeviceType::Loopback => write!(f, "Loopback"),
            DeviceType::Other(v) => write!(f, "Other({v})"),
        }
    }
}

/// NetworkManager device states.
///
/// Mirrors `NMDeviceState`; codes NetworkManager adds in the future land in
/// [`DeviceState::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// The device's state is unknown.
    Unknown,
    /// Device is not managed by NetworkManager.
    Unmanaged,
    /// Device is managed but not yet available (e.g., Wi-Fi disabled).
    Unavailable,
    /// Device is available but not connected.
    Disconnected,
    /// Device is preparing to connect.
    Prepare,
    /// Device is connecting to the requested network.
    Config,
    /// Device requires more information (usually secrets) to continue.
    NeedAuth,
    /// Device is requesting IP addresses and routing information.
    IpConfig,
    /// Device is checking whether further action is required.
    IpCheck,
    /// Device is waiting for a secondary connection (like a VPN).
    Secondaries,
    /// Device is fully connected and operational.
    Activated,
    /// Device is disconnecting.
    Deactivating,
    /// Device connection failed.
    Failed,
    /// Unknown or unsupported state with raw code.
    Other(u32),
}

impl DeviceState {
    /// Raw NetworkManager code for this state.
    pub fn code(&self) -> u32 {
        match self {
            DeviceState::Unknown => 0,
            DeviceState::Unmanaged => 10,
            DeviceState::Unavailable => 20,
            DeviceState::Disconnected => 30,
            DeviceState::Prepare => 40,
            DeviceState::Config => 50,
            DeviceState::NeedAuth => 60,
            DeviceState::IpConfig => 70,
            DeviceState::IpCheck => 80,
            DeviceState::Secondaries => 90,
            DeviceState::Activated => 100,
            DeviceState::Deactivating => 110,
            DeviceState::Failed => 120,
            DeviceState::Other(v) => *v,
        }
    }

    /// Returns `true` once the device has started or finished activating.
    pub fn is_beyond_disconnected(&self) -> bool {
        self.code() > DeviceState::Disconnected.code()
    }
}

impl From<u32> for DeviceState {
    fn from(value: u32) -> Self {
        match value {
            0 => DeviceState::Unknown,
            10 => DeviceState::Unmanaged,
            20 => DeviceState::Unavailable,
            30 => DeviceState::Disconnected,
            40 => DeviceState::Prepare,
            50 => DeviceState::Config,
            60 => DeviceState::NeedAuth,
            70 => DeviceState::IpConfig,
            80 => DeviceState::IpCheck,
            90 => DeviceState::Secondaries,
            100 => DeviceState::Activated,
            110 => DeviceState::Deactivating,
            120 => DeviceState::Failed,
            v => DeviceState::Other(v),
        }
    }
}

impl Display for DeviceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Unknown => write!(f, "Unknown"),
            DeviceState::Unmanaged => write!(f, "Unmanaged"),
            DeviceState::Unavailable => write!(f, "Unavailable"),
            DeviceState::Disconnected => write!(f, "Disconnected"),
            DeviceState::Prepare => write!(f, "Preparing"),
            DeviceState::Config => write!(f, "Configuring"),
            DeviceState::NeedAuth => write!(f, "Needs authentication"),
            DeviceState::IpConfig => write!(f, "Requesting IP configuration"),
            DeviceState::IpCheck => write!(f, "Checking IP connectivity"),
            DeviceState::Secondaries => write!(f, "Waiting for secondaries"),
            DeviceState::Activated => write!(f, "Activated"),
            DeviceState::Deactivating => write!(f, "Deactivating"),
            DeviceState::Failed => write!(f, "Failed"),
            DeviceState::Other(v) => write!(f, "Other({v})"),
        }
    }
}

/// NetworkManager device state reason codes (`NMDeviceStateReason`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateReason {
    None,
    Unknown,
    NowManaged,
    NowUnmanaged,
    ConfigFailed,
    IpConfigUnavailable,
    IpConfigExpired,
    NoSecrets,
    SupplicantDisconnect,
    SupplicantConfigFailed,
    SupplicantFailed,
    SupplicantTimeout,
    PppStartFailed,
    PppDisconnect,
    PppFailed,
    DhcpStartFailed,
    DhcpError,
    DhcpFailed,
    SharedStartFailed,
    SharedFailed,
    AutoIpStartFailed,
    AutoIpError,
    AutoIpFailed,
    ModemBusy,
    ModemNoDialTone,
    ModemNoCarrier,
    ModemDialTimeout,
    ModemDialFailed,
    ModemInitFailed,
    GsmApnFailed,
    GsmRegistrationNotSearching,
    GsmRegistrationDenied,
    GsmRegistrationTimeout,
    GsmRegistrationFailed,
    GsmPinCheckFailed,
    FirmwareMissing,
    Removed,
    Sleeping,
    ConnectionRemoved,
    UserRequested,
    Carrier,
    ConnectionAssumed,
    SupplicantAvailable,
    ModemNotFound,
    BluetoothFailed,
    GsmSimNotInserted,
    GsmSimPinRequired,
    GsmSimPukRequired,
    GsmSimWrong,
    InfinibandMode,
    DependencyFailed,
    Br2684Failed,
    ModemManagerUnavailable,
    SsidNotFound,
    SecondaryConnectionFailed,
    DcbFcoeFailed,
    TeamdControlFailed,
    ModemFailed,
    ModemAvailable,
    SimPinIncorrect,
    NewActivation,
    ParentChanged,
    ParentManagedChanged,
    OvsdbFailed,
    IpAddressDuplicate,
    IpMethodUnsupported,
    SriovConfigurationFailed,
    PeerNotFound,
    /// Reason code this crate does not know about.
    Other(u32),
}

/// Reason codes in NetworkManager order; the index is the wire code.
const STATE_REASONS: [StateReason; 68] = [
    StateReason::None,
    StateReason::Unknown,
    StateReason::NowManaged,
    StateReason::NowUnmanaged,
    StateReason::ConfigFailed,
    StateReason::IpConfigUnavailable,
    StateReason::IpConfigExpired,
    StateReason::NoSecrets,
    StateReason::SupplicantDisconnect,
    StateReason::SupplicantConfigFailed,
    StateReason::SupplicantFailed,
    StateReason::SupplicantTimeout,
    StateReason::PppStartFailed,
    StateReason::PppDisconnect,
    StateReason::PppFailed,
    StateReason::DhcpStartFailed,
    StateReason::DhcpError,
    StateReason::DhcpFailed,
    StateReason::SharedStartFailed,
    StateReason::SharedFailed,
    StateReason::AutoIpStartFailed,
    StateReason::AutoIpError,
    StateReason::AutoIpFailed,
    StateReason::ModemBusy,
    StateReason::ModemNoDialTone,
    StateReason::ModemNoCarrier,
    StateReason::ModemDialTimeout,
    StateReason::ModemDialFailed,
    StateReason::ModemInitFailed,
    StateReason::GsmApnFailed,
    StateReason::GsmRegistrationNotSearching,
    StateReason::GsmRegistrationDenied,
    StateReason::GsmRegistrationTimeout,
    StateReason::GsmRegistrationFailed,
    StateReason::GsmPinCheckFailed,
    StateReason::FirmwareMissing,
    StateReason::Removed,
    StateReason::Sleeping,
    StateReason::ConnectionRemoved,
    StateReason::UserRequested,
    StateReason::Carrier,
    StateReason::ConnectionAssumed,
    StateReason::SupplicantAvailable,
    StateReason::ModemNotFound,
    StateReason::BluetoothFailed,
    StateReason::GsmSimNotInserted,
    StateReason::GsmSimPinRequired,
    StateReason::GsmSimPukRequired,
    StateReason::GsmSimWrong,
    StateReason::InfinibandMode,
    StateReason::DependencyFailed,
    StateReason::Br2684Failed,
    StateReason::ModemManagerUnavailable,
    StateReason::SsidNotFound,
    StateReason::SecondaryConnectionFailed,
    StateReason::DcbFcoeFailed,
    StateReason::TeamdControlFailed,
    StateReason::ModemFailed,
    StateReason::ModemAvailable,
    StateReason::SimPinIncorrect,
    StateReason::NewActivation,
    StateReason::ParentChanged,
    StateReason::ParentManagedChanged,
    StateReason::OvsdbFailed,
    StateReason::IpAddressDuplicate,
    StateReason::IpMethodUnsupported,
    StateReason::SriovConfigurationFailed,
    StateReason::PeerNotFound,
];

impl StateReason {
    /// Every reason with a defined NetworkManager code.
    pub fn known() -> &'static [StateReason] {
        &STATE_REASONS
    }

    /// Raw NetworkManager code for this reason.
    pub fn code(&self) -> u32 {
        match self {
            StateReason::Other(v) => *v,
            known => STATE_REASONS
                .iter()
                .position(|r| r == known)
                .map_or(u32::MAX, |idx| idx as u32),
        }
    }
}

impl From<u32> for StateReason {
    fn from(code: u32) -> Self {
        STATE_REASONS
            .get(code as usize)
            .copied()
            .unwrap_or(StateReason::Other(code))
    }
}

impl Display for StateReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StateReason::None => write!(f, "no reason"),
            StateReason::NoSecrets => write!(f, "secrets were required but not provided"),
            StateReason::SupplicantDisconnect => write!(f, "802.1X supplicant disconnected"),
            StateReason::SupplicantConfigFailed => {
                write!(f, "802.1X supplicant configuration failed")
            }
            StateReason::SupplicantFailed => write!(f, "802.1X supplicant failed"),
            StateReason::SupplicantTimeout => {
                write!(f, "802.1X supplicant took too long to authenticate")
            }
            StateReason::SupplicantAvailable => write!(f, "supplicant is now available"),
            StateReason::SsidNotFound => write!(f, "the Wi-Fi network could not be found"),
            StateReason::UserRequested => write!(f, "disconnected by user"),
            StateReason::Other(v) => write!(f, "unknown reason ({v})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Wi-Fi security modes as reported for scan results and accepted for connect.
///
/// The discriminants follow the outer plugin interface's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SecurityMode {
    /// Open network, no security.
    None,
    Wep64,
    Wep128,
    WpaPskTkip,
    WpaPskAes,
    Wpa2PskTkip,
    Wpa2PskAes,
    WpaEnterpriseTkip,
    WpaEnterpriseAes,
    Wpa2EnterpriseTkip,
    Wpa2EnterpriseAes,
    WpaWpa2Psk,
    WpaWpa2Enterprise,
    Wpa3PskAes,
    Wpa3Sae,
}

impl SecurityMode {
    /// Numeric code used by the outer plugin interface.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Returns `true` if the mode authenticates with a pre-shared passphrase.
    pub fn requires_psk(&self) -> bool {
        matches!(
            self,
            SecurityMode::WpaPskTkip
                | SecurityMode::WpaPskAes
                | SecurityMode::Wpa2PskTkip
                | SecurityMode::Wpa2PskAes
                | SecurityMode::WpaWpa2Psk
                | SecurityMode::Wpa3PskAes
                | SecurityMode::Wpa3Sae
        )
    }

    /// Returns `true` if a profile can be built for this mode.
    ///
    /// WEP and enterprise (802.1X) networks are reported in scan results but
    /// cannot be joined through this crate.
    pub fn is_connectable(&self) -> bool {
        *self == SecurityMode::None || self.requires_psk()
    }

    /// `key-mgmt` value for the `802-11-wireless-security` setting.
    pub(crate) fn key_mgmt(&self) -> Option<&'static str> {
        match self {
            SecurityMode::Wpa3PskAes | SecurityMode::Wpa3Sae => Some("sae"),
            mode if mode.requires_psk() => Some("wpa-psk"),
            _ => None,
        }
    }
}

impl Display for SecurityMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            SecurityMode::None => "NONE",
            SecurityMode::Wep64 => "WEP_64",
            SecurityMode::Wep128 => "WEP_128",
            SecurityMode::WpaPskTkip => "WPA_PSK_TKIP",
            SecurityMode::WpaPskAes => "WPA_PSK_AES",
            SecurityMode::Wpa2PskTkip => "WPA2_PSK_TKIP",
            SecurityMode::Wpa2PskAes => "WPA2_PSK_AES",
            SecurityMode::WpaEnterpriseTkip => "WPA_ENTERPRISE_TKIP",
            SecurityMode::WpaEnterpriseAes => "WPA_ENTERPRISE_AES",
            SecurityMode::Wpa2EnterpriseTkip => "WPA2_ENTERPRISE_TKIP",
            SecurityMode::Wpa2EnterpriseAes => "WPA2_ENTERPRISE_AES",
            SecurityMode::WpaWpa2Psk => "WPA_WPA2_PSK",
            SecurityMode::WpaWpa2Enterprise => "WPA_WPA2_ENTERPRISE",
            SecurityMode::Wpa3PskAes => "WPA3_PSK_AES",
            SecurityMode::Wpa3Sae => "WPA3_SAE",
        };
        write!(f, "{text}")
    }
}

/// Normalized Wi-Fi state reported to subscribers and by `get_wifi_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WifiState {
    Uninstalled,
    Disabled,
    Disconnected,
    Pairing,
    Connecting,
    Connected,
    SsidNotFound,
    SsidChanged,
    ConnectionLost,
    ConnectionFailed,
    ConnectionInterrupted,
    InvalidCredentials,
    AuthenticationFailed,
    Error,
    Invalid,
}

impl Display for WifiState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            WifiState::Uninstalled => "WIFI_STATE_UNINSTALLED",
            WifiState::Disabled => "WIFI_STATE_DISABLED",
            WifiState::Disconnected => "WIFI_STATE_DISCONNECTED",
            WifiState::Pairing => "WIFI_STATE_PAIRING",
            WifiState::Connecting => "WIFI_STATE_CONNECTING",
            WifiState::Connected => "WIFI_STATE_CONNECTED",
            WifiState::SsidNotFound => "WIFI_STATE_SSID_NOT_FOUND",
            WifiState::SsidChanged => "WIFI_STATE_SSID_CHANGED",
            WifiState::ConnectionLost => "WIFI_STATE_CONNECTION_LOST",
            WifiState::ConnectionFailed => "WIFI_STATE_CONNECTION_FAILED",
            WifiState::ConnectionInterrupted => "WIFI_STATE_CONNECTION_INTERRUPTED",
            WifiState::InvalidCredentials => "WIFI_STATE_INVALID_CREDENTIALS",
            WifiState::AuthenticationFailed => "WIFI_STATE_AUTHENTICATION_FAILED",
            WifiState::Error => "WIFI_STATE_ERROR",
            WifiState::Invalid => "WIFI_STATE_INVALID",
        };
        write!(f, "{text}")
    }
}

/// Link-level state of a monitored interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterfaceState {
    Added,
    LinkUp,
    LinkDown,
    AcquiringIp,
    Removed,
    Disabled,
}

impl Display for InterfaceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            InterfaceState::Added => "INTERFACE_ADDED",
            InterfaceState::LinkUp => "INTERFACE_LINK_UP",
            InterfaceState::LinkDown => "INTERFACE_LINK_DOWN",
            InterfaceState::AcquiringIp => "INTERFACE_ACQUIRING_IP",
            InterfaceState::Removed => "INTERFACE_REMOVED",
            InterfaceState::Disabled => "INTERFACE_DISABLED",
        };
        write!(f, "{text}")
    }
}

/// Coarse signal quality of the connected network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalQuality {
    Disconnected,
    Weak,
    Fair,
    Good,
    Excellent,
}

/// Frequency band of an access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WifiBand {
    /// 2.4 GHz
    Band2_4GHz,
    /// 5 GHz
    Band5GHz,
    /// 6 GHz
    Band6GHz,
}

impl WifiBand {
    /// Band for a center frequency in MHz, if it falls in a known Wi-Fi band.
    pub fn from_frequency(mhz: u32) -> Option<Self> {
        match mhz {
            frequency::BAND_2_4_START..=frequency::BAND_2_4_END => Some(WifiBand::Band2_4GHz),
            frequency::BAND_5_START..=frequency::BAND_5_END => Some(WifiBand::Band5GHz),
            frequency::BAND_6_START..=frequency::BAND_6_END => Some(WifiBand::Band6GHz),
            _ => None,
        }
    }
}

impl Display for WifiBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WifiBand::Band2_4GHz => write!(f, "2.4"),
            WifiBand::Band5GHz => write!(f, "5"),
            WifiBand::Band6GHz => write!(f, "6"),
        }
    }
}

/// Snapshot of a NetworkManager device, resolved by interface name.
///
/// Never cached: every operation resolves a fresh snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProperties {
    /// Kernel interface name (e.g. `wlan0`).
    pub interface: String,
    /// D-Bus object path of the device.
    pub path: OwnedObjectPath,
    pub device_type: DeviceType,
    pub state: DeviceState,
    /// Reason for the most recent state transition.
    pub reason: StateReason,
    /// Active connection object, `/` when none.
    pub active_connection: OwnedObjectPath,
}

/// A decoded scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessPointInfo {
    pub ssid: String,
    /// Hardware address of the access point.
    pub bssid: String,
    /// Raw strength indicator, 0-100.
    pub strength: u8,
    /// Approximate signal level in dBm, empty when the indicator is out of range.
    pub signal_dbm: String,
    /// Center frequency in MHz.
    pub frequency: u32,
    /// Maximum bit rate in Kbit/s.
    pub bitrate: u32,
    pub security: SecurityMode,
}

impl AccessPointInfo {
    /// Frequency band of this access point.
    pub fn band(&self) -> Option<WifiBand> {
        WifiBand::from_frequency(self.frequency)
    }
}

/// Signal report for the currently connected network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalReport {
    pub ssid: String,
    pub signal_dbm: String,
    pub quality: SignalQuality,
}

/// An address appearing on or disappearing from a monitored interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpAddressChange {
    pub interface: String,
    pub address: String,
    pub ipv6: bool,
    /// `true` when the address was acquired, `false` when it was lost.
    pub acquired: bool,
}

/// A request to join (or remember) a Wi-Fi network.
///
/// # Example
///
/// ```rust
/// use nmwifi::{SecurityMode, WifiConnectRequest};
///
/// let request = WifiConnectRequest::new("HomeNet", SecurityMode::Wpa2PskAes)
///     .with_passphrase("correct horse")
///     .persist(false);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct WifiConnectRequest {
    pub ssid: String,
    pub passphrase: String,
    pub security: SecurityMode,
    /// Store the profile on disk. When `false` the profile is volatile.
    pub persist: bool,
}

impl WifiConnectRequest {
    /// Creates a persistent request with an empty passphrase.
    pub fn new(ssid: impl Into<String>, security: SecurityMode) -> Self {
        Self {
            ssid: ssid.into(),
            passphrase: String::new(),
            security,
            persist: true,
        }
    }

    /// Sets the pre-shared passphrase.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    /// Sets whether the resulting profile is written to disk.
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Checks SSID, security mode and passphrase constraints.
    ///
    /// Runs before any D-Bus call so a rejected request leaves no state
    /// behind on the service.
    pub fn validate(&self) -> Result<(), ConnectionError> {
        validate_ssid(&self.ssid)?;

        if !self.security.is_connectable() {
            return Err(ConnectionError::UnsupportedSecurity(self.security));
        }

        if self.security.requires_psk() {
            validate_passphrase(&self.passphrase)?;
        }

        Ok(())
    }
}

impl fmt::Debug for WifiConnectRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiConnectRequest")
            .field("ssid", &self.ssid)
            .field("passphrase", &"<redacted>")
            .field("security", &self.security)
            .field("persist", &self.persist)
            .finish()
    }
}

/// Validates an SSID: 1 to 32 bytes.
pub(crate) fn validate_ssid(ssid: &str) -> Result<(), ConnectionError> {
    if ssid.is_empty() {
        return Err(ConnectionError::InvalidSsid("SSID cannot be empty".into()));
    }
    if ssid.len() > limits::SSID_MAX_LEN {
        return Err(ConnectionError::InvalidSsid(format!(
            "SSID is {} bytes, maximum is {}",
            ssid.len(),
            limits::SSID_MAX_LEN
        )));
    }
    Ok(())
}

/// Validates a WPA passphrase: 8 to 63 bytes, or a 64 digit hex key.
fn validate_passphrase(passphrase: &str) -> Result<(), ConnectionError> {
    let len = passphrase.len();
    if len == limits::PSK_HEX_LEN && passphrase.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(());
    }
    if len < limits::PSK_MIN_LEN {
        return Err(ConnectionError::InvalidPassphrase(format!(
            "passphrase is {len} bytes, minimum is {}",
            limits::PSK_MIN_LEN
        )));
    }
    if len > limits::PSK_MAX_LEN {
        return Err(ConnectionError::InvalidPassphrase(format!(
            "passphrase is {len} bytes, maximum is {}",
            limits::PSK_MAX_LEN
        )));
    }
    Ok(())
}

/// Errors that can occur during network operations.
///
/// Transport failures, missing devices or profiles, and rejected input each
/// have their own variants. Callers that only need success or failure can
/// use `Result::is_ok`.
///
/// # Example
///
/// ```rust
/// use nmwifi::{ConnectionError, SecurityMode, WifiConnectRequest};
///
/// let request = WifiConnectRequest::new("Cafe", SecurityMode::Wpa2PskAes)
///     .with_passphrase("short");
///
/// match request.validate() {
///     Err(ConnectionError::InvalidPassphrase(msg)) => println!("rejected: {msg}"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A D-Bus operation failed with context about what was being attempted.
    #[error("{context}: {source}")]
    DbusOperation {
        context: String,
        #[source]
        source: zbus::Error,
    },

    /// No device with this interface name is known to NetworkManager.
    #[error("device '{0}' not found")]
    DeviceNotFound(String),

    /// The device exists but its state is unknown.
    #[error("device '{0}' is unavailable")]
    DeviceUnavailable(String),

    /// No Wi-Fi device was found on the system.
    #[error("no Wi-Fi device found")]
    NoWifiDevice,

    /// The SSID is empty or longer than 32 bytes.
    #[error("invalid SSID: {0}")]
    InvalidSsid(String),

    /// The passphrase does not satisfy the security mode's constraints.
    #[error("invalid passphrase: {0}")]
    InvalidPassphrase(String),

    /// The security mode cannot be used to build a profile.
    #[error("unsupported security mode: {0}")]
    UnsupportedSecurity(SecurityMode),

    /// No saved connection exists for the requested network.
    #[error("no saved connection for network")]
    NoSavedConnection,

    /// The Wi-Fi device is not connected to any network.
    #[error("Wi-Fi is not connected")]
    NotConnected,

    /// The access point has a hidden or malformed SSID.
    #[error("access point {0} rejected: hidden or invalid SSID")]
    AccessPointRejected(String),

    /// The event monitor could not be started.
    #[error("event monitor failed: {0}")]
    MonitorFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_from_u32_all_variants() {
        assert_eq!(DeviceType::from(1), DeviceType::Ethernet);
        assert_eq!(DeviceType::from(2), DeviceType::Wifi);
        assert_eq!(DeviceType::from(30), DeviceType::WifiP2P);
        assert_eq!(DeviceType::from(32), DeviceType::Loopback);
        assert_eq!(DeviceType::from(999), DeviceType::Other(999));
    }

    #[test]
    fn device_state_codes_round_trip() {
        for code in (0..=120).step_by(10) {
            assert_eq!(DeviceState::from(code).code(), code);
        }
        assert_eq!(DeviceState::from(7), DeviceState::Other(7));
    }

    #[test]
    fn device_state_beyond_disconnected() {
        assert!(!DeviceState::Unavailable.is_beyond_disconnected());
        assert!(!DeviceState::Disconnected.is_beyond_disconnected());
        assert!(DeviceState::Prepare.is_beyond_disconnected());
        assert!(DeviceState::Activated.is_beyond_disconnected());
    }

    #[test]
    fn state_reason_uses_networkmanager_numbering() {
        assert_eq!(StateReason::from(7), StateReason::NoSecrets);
        assert_eq!(StateReason::from(8), StateReason::SupplicantDisconnect);
        assert_eq!(StateReason::from(9), StateReason::SupplicantConfigFailed);
        assert_eq!(StateReason::from(10), StateReason::SupplicantFailed);
        assert_eq!(StateReason::from(11), StateReason::SupplicantTimeout);
        assert_eq!(StateReason::from(42), StateReason::SupplicantAvailable);
        assert_eq!(StateReason::from(53), StateReason::SsidNotFound);
        assert_eq!(StateReason::from(67), StateReason::PeerNotFound);
        assert_eq!(StateReason::from(68), StateReason::Other(68));
    }

    #[test]
    fn state_reason_code_matches_index() {
        for (idx, reason) in StateReason::known().iter().enumerate() {
            assert_eq!(reason.code(), idx as u32);
        }
    }

    #[test]
    fn security_mode_codes_follow_plugin_numbering() {
        assert_eq!(SecurityMode::None.code(), 0);
        assert_eq!(SecurityMode::Wpa2PskAes.code(), 6);
        assert_eq!(SecurityMode::Wpa3Sae.code(), 14);
    }

    #[test]
    fn security_mode_key_mgmt() {
        assert_eq!(SecurityMode::None.key_mgmt(), None);
        assert_eq!(SecurityMode::WpaPskTkip.key_mgmt(), Some("wpa-psk"));
        assert_eq!(SecurityMode::WpaWpa2Psk.key_mgmt(), Some("wpa-psk"));
        assert_eq!(SecurityMode::Wpa3Sae.key_mgmt(), Some("sae"));
        assert_eq!(SecurityMode::Wep64.key_mgmt(), None);
    }

    #[test]
    fn enterprise_and_wep_are_not_connectable() {
        assert!(!SecurityMode::Wep128.is_connectable());
        assert!(!SecurityMode::Wpa2EnterpriseAes.is_connectable());
        assert!(!SecurityMode::WpaWpa2Enterprise.is_connectable());
        assert!(SecurityMode::None.is_connectable());
        assert!(SecurityMode::Wpa2PskAes.is_connectable());
    }

    #[test]
    fn band_from_frequency() {
        assert_eq!(WifiBand::from_frequency(2437), Some(WifiBand::Band2_4GHz));
        assert_eq!(WifiBand::from_frequency(5180), Some(WifiBand::Band5GHz));
        assert_eq!(WifiBand::from_frequency(5975), Some(WifiBand::Band6GHz));
        assert_eq!(WifiBand::from_frequency(900), None);
        assert_eq!(WifiBand::Band2_4GHz.to_string(), "2.4");
    }

    #[test]
    fn request_rejects_empty_and_long_ssid() {
        let empty = WifiConnectRequest::new("", SecurityMode::None);
        assert!(matches!(empty.validate(), Err(ConnectionError::InvalidSsid(_))));

        let long = WifiConnectRequest::new("a".repeat(33), SecurityMode::None);
        assert!(matches!(long.validate(), Err(ConnectionError::InvalidSsid(_))));

        let max = WifiConnectRequest::new("a".repeat(32), SecurityMode::None);
        assert!(max.validate().is_ok());
    }

    #[test]
    fn request_rejects_short_passphrase() {
        let req = WifiConnectRequest::new("Cafe", SecurityMode::WpaPskAes).with_passphrase("short");
        assert!(matches!(
            req.validate(),
            Err(ConnectionError::InvalidPassphrase(_))
        ));

        let empty = WifiConnectRequest::new("Cafe", SecurityMode::Wpa2PskAes);
        assert!(matches!(
            empty.validate(),
            Err(ConnectionError::InvalidPassphrase(_))
        ));
    }

    #[test]
    fn request_accepts_hex_key_and_rejects_overlong_passphrase() {
        let hex = WifiConnectRequest::new("Cafe", SecurityMode::Wpa2PskAes)
            .with_passphrase("0123456789abcdef".repeat(4));
        assert!(hex.validate().is_ok());

        let long = WifiConnectRequest::new("Cafe", SecurityMode::Wpa2PskAes)
            .with_passphrase("x".repeat(64));
        assert!(matches!(
            long.validate(),
            Err(ConnectionError::InvalidPassphrase(_))
        ));
    }

    #[test]
    fn open_request_ignores_passphrase() {
        let req = WifiConnectRequest::new("Cafe", SecurityMode::None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_rejects_unsupported_security() {
        let req = WifiConnectRequest::new("Corp", SecurityMode::Wpa2EnterpriseAes)
            .with_passphrase("password123");
        assert!(matches!(
            req.validate(),
            Err(ConnectionError::UnsupportedSecurity(SecurityMode::Wpa2EnterpriseAes))
        ));
    }

    #[test]
    fn request_debug_redacts_passphrase() {
        let req = WifiConnectRequest::new("Cafe", SecurityMode::Wpa2PskAes)
            .with_passphrase("supersecret");
        let dbg = format!("{req:?}");
        assert!(!dbg.contains("supersecret"));
        assert!(dbg.contains("Cafe"));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConnectionError::DeviceNotFound("wlan0".into()).to_string(),
            "device 'wlan0' not found"
        );
        assert_eq!(
            ConnectionError::UnsupportedSecurity(SecurityMode::Wep64).to_string(),
            "unsupported security mode: WEP_64"
        );
    }
}
