//! NetworkManager Device proxy.

use zbus::{Result, proxy};
use zvariant::OwnedObjectPath;

/// Proxy for NetworkManager device interface.
///
/// Provides access to device properties like interface name, type, state,
/// and the reason for state transitions.
///
/// # Signals
///
/// The `StateChanged` signal is emitted whenever the device state changes.
/// Use `receive_device_state_changed()` to get a stream of state change events:
///
/// ```ignore
/// let mut stream = device_proxy.receive_device_state_changed().await?;
/// while let Some(signal) = stream.next().await {
///     let args = signal.args()?;
///     println!("New state: {}, Old state: {}, Reason: {}",
///              args.new_state, args.old_state, args.reason);
/// }
/// ```
#[proxy(
    interface = "org.freedesktop.NetworkManager.Device",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMDevice {
    /// The network interface name (e.g., "wlan0").
    #[zbus(property)]
    fn interface(&self) -> Result<String>;

    /// Device type as a numeric code (2 = Wi-Fi).
    #[zbus(property)]
    fn device_type(&self) -> Result<u32>;

    /// Current state and reason code for the last state change.
    #[zbus(property)]
    fn state_reason(&self) -> Result<(u32, u32)>;

    /// Active connection object ("/" if none).
    #[zbus(property)]
    fn active_connection(&self) -> Result<OwnedObjectPath>;

    /// Saved connections that could be activated on this device.
    #[zbus(property)]
    fn available_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Current IPv4 configuration object ("/" if unconfigured).
    #[zbus(property)]
    fn ip4_config(&self) -> Result<OwnedObjectPath>;

    /// Current IPv6 configuration object ("/" if unconfigured).
    #[zbus(property)]
    fn ip6_config(&self) -> Result<OwnedObjectPath>;

    /// Disconnects the device and blocks autoconnect until user action.
    fn disconnect(&self) -> Result<()>;

    /// Signal emitted when device state changes.
    ///
    /// Named `device_state_changed` to avoid clashing with a `state`
    /// property change stream.
    #[zbus(signal, name = "StateChanged")]
    fn device_state_changed(&self, new_state: u32, old_state: u32, reason: u32);
}
