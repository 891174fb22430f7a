//! Callbacks invoked by the event monitor.

use crate::api::models::{AccessPointInfo, InterfaceState, IpAddressChange, WifiState};

/// Receives normalized events from an [`EventMonitor`](super::EventMonitor).
///
/// All hooks run on the monitor's thread, one at a time, in the order the
/// underlying signals arrive. They should return quickly and must not call
/// back into the monitor (stopping it from a hook would deadlock the join).
/// Every hook defaults to doing nothing.
///
/// # Example
///
/// ```rust
/// use nmwifi::{EventListener, WifiState};
///
/// struct Printer;
///
/// impl EventListener for Printer {
///     fn on_wifi_state_changed(&self, state: WifiState) {
///         println!("wifi: {state}");
///     }
/// }
/// ```
pub trait EventListener: Send + Sync {
    /// A monitored interface appeared, disappeared or changed link state.
    fn on_interface_state_changed(&self, interface: &str, state: InterfaceState) {
        let _ = (interface, state);
    }

    /// The Wi-Fi device's normalized state changed.
    fn on_wifi_state_changed(&self, state: WifiState) {
        let _ = state;
    }

    /// An address was added to or removed from a monitored interface.
    fn on_ip_address_changed(&self, change: &IpAddressChange) {
        let _ = change;
    }

    /// A scan finished while scan notification was enabled.
    fn on_available_ssids_changed(&self, networks: &[AccessPointInfo]) {
        let _ = networks;
    }
}
