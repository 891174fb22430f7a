use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use zvariant::OwnedObjectPath;

use crate::api::config::InterfaceConfig;
use crate::api::models::{
    AccessPointInfo, DeviceProperties, SignalReport, WifiConnectRequest, WifiState,
};
use crate::core::connection::{add_known, connect, disconnect, forget, known_ssids};
use crate::core::device::resolve;
use crate::core::scan::{available, connected, signal_strength, start_scan, stop_scan};
use crate::core::state::normalize;
use crate::dbus::{NetworkBus, SystemBus};
use crate::monitoring::{EventListener, EventMonitor};
use crate::Result;

/// High-level Wi-Fi interface to NetworkManager.
///
/// This is the main entry point. Every call resolves the device and profiles
/// it needs afresh; nothing is cached between calls.
///
/// # Creating an Instance
///
/// ```no_run
/// use nmwifi::{InterfaceConfig, WifiManager};
///
/// # async fn example() -> nmwifi::Result<()> {
/// let manager = WifiManager::new().await?;
///
/// // Or with a different Wi-Fi interface
/// let config = InterfaceConfig::new().with_wifi_interface("wlp2s0");
/// let manager = WifiManager::with_config(config).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Examples
///
/// ```no_run
/// use nmwifi::{SecurityMode, WifiConnectRequest, WifiManager};
///
/// # async fn example() -> nmwifi::Result<()> {
/// let manager = WifiManager::new().await?;
///
/// for net in manager.get_available_ssids().await? {
///     println!("{} {} dBm {}", net.ssid, net.signal_dbm, net.security);
/// }
///
/// let request = WifiConnectRequest::new("HomeNet", SecurityMode::Wpa2PskAes)
///     .with_passphrase("correct horse");
/// manager.connect(&request).await?;
///
/// manager.remove_known_ssid("OldNetwork").await?;
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `WifiManager` is `Clone`. Clones share the bus connection and the scan
/// notification flag, and can be used from any task or thread.
#[derive(Clone)]
pub struct WifiManager {
    bus: Arc<dyn NetworkBus>,
    config: InterfaceConfig,
    scan_notify: Arc<AtomicBool>,
}

impl fmt::Debug for WifiManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiManager")
            .field("config", &self.config)
            .field("scan_notify", &self.scan_notify)
            .finish_non_exhaustive()
    }
}

impl WifiManager {
    /// Connects to NetworkManager on the system bus with the default interfaces.
    pub async fn new() -> Result<Self> {
        Self::with_config(InterfaceConfig::default()).await
    }

    /// Connects to NetworkManager on the system bus.
    pub async fn with_config(config: InterfaceConfig) -> Result<Self> {
        let bus = SystemBus::new().await?;
        Ok(Self::with_bus(Arc::new(bus), config))
    }

    /// Uses an existing bus implementation.
    pub fn with_bus(bus: Arc<dyn NetworkBus>, config: InterfaceConfig) -> Self {
        Self {
            bus,
            config,
            scan_notify: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The interface configuration.
    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    /// Looks up the device behind an interface name.
    pub async fn device(&self, interface: &str) -> Result<DeviceProperties> {
        resolve(self.bus.as_ref(), interface).await
    }

    /// SSIDs of every saved Wi-Fi profile.
    pub async fn get_known_ssids(&self) -> Result<Vec<String>> {
        known_ssids(self.bus.as_ref()).await
    }

    /// Networks the Wi-Fi device currently sees. Hidden networks are left out.
    pub async fn get_available_ssids(&self) -> Result<Vec<AccessPointInfo>> {
        available(self.bus.as_ref(), &self.config).await
    }

    /// The network the Wi-Fi device is connecting or connected to.
    pub async fn get_connected_ssid(&self) -> Result<AccessPointInfo> {
        connected(self.bus.as_ref(), &self.config).await
    }

    /// Saves a profile for `request` without connecting.
    pub async fn add_to_known_ssids(&self, request: &WifiConnectRequest) -> Result<()> {
        add_known(self.bus.as_ref(), &self.config, request).await
    }

    /// Deletes every saved profile for `ssid`.
    ///
    /// Fails with [`NoSavedConnection`](crate::ConnectionError::NoSavedConnection)
    /// when there is none.
    pub async fn remove_known_ssid(&self, ssid: &str) -> Result<()> {
        forget(self.bus.as_ref(), ssid).await
    }

    /// Connects to a network, reusing a saved profile when the device has one.
    ///
    /// Returns the active connection path once NetworkManager has accepted the
    /// activation. Progress is reported through [`EventListener`].
    pub async fn connect(&self, request: &WifiConnectRequest) -> Result<OwnedObjectPath> {
        connect(self.bus.as_ref(), &self.config, request).await
    }

    /// Disconnects the Wi-Fi device. Succeeds if it is already disconnected.
    pub async fn disconnect(&self) -> Result<()> {
        disconnect(self.bus.as_ref(), &self.config).await
    }

    /// Requests a scan and enables scan-result events.
    ///
    /// With `ssid` set, NetworkManager probes for that network directly.
    /// Fails with `DeviceUnavailable` while the device is unmanaged or
    /// unavailable; a failed request does not enable events.
    pub async fn start_wifi_scan(&self, ssid: Option<&str>) -> Result<()> {
        start_scan(self.bus.as_ref(), &self.config, &self.scan_notify, ssid).await
    }

    /// Disables scan-result events.
    pub fn stop_wifi_scan(&self) {
        stop_scan(&self.scan_notify);
    }

    /// Signal strength of the connected network.
    pub async fn get_wifi_signal_strength(&self) -> Result<SignalReport> {
        signal_strength(self.bus.as_ref(), &self.config).await
    }

    /// Normalized state of the Wi-Fi device.
    ///
    /// A device in the unknown state reports [`WifiState::Uninstalled`].
    pub async fn get_wifi_state(&self) -> Result<WifiState> {
        let device = resolve(self.bus.as_ref(), &self.config.wifi_interface).await?;
        Ok(normalize(device.state, device.reason))
    }

    /// Creates a stopped event monitor reporting to `listener`.
    ///
    /// The monitor shares this manager's bus and scan notification flag.
    pub fn event_monitor(&self, listener: Arc<dyn EventListener>) -> EventMonitor {
        EventMonitor::new(
            Arc::clone(&self.bus),
            self.config.clone(),
            listener,
            Arc::clone(&self.scan_notify),
        )
    }
}
