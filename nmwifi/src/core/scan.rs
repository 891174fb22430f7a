//! Scanning and queries about visible and connected networks.

use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::config::InterfaceConfig;
use crate::api::models::{
    AccessPointInfo, ConnectionError, DeviceState, SignalReport, validate_ssid,
};
use crate::core::access_point::{decode, decode_all};
use crate::core::device::resolve_wifi;
use crate::dbus::NetworkBus;
use crate::types::constants::dbus_names;
use crate::util::utils::quality_from_dbm;
use crate::Result;

/// Requests a scan on the Wi-Fi device.
///
/// Turns on scan-result notification just before the request, so the event
/// monitor reports the results. With `ssid` set, NetworkManager probes for
/// that network directly. A rejected request leaves notification as it was.
pub(crate) async fn start_scan(
    bus: &dyn NetworkBus,
    config: &InterfaceConfig,
    notify: &AtomicBool,
    ssid: Option<&str>,
) -> Result<()> {
    let ssids = match ssid {
        Some(ssid) => {
            validate_ssid(ssid)?;
            vec![ssid.as_bytes().to_vec()]
        }
        None => Vec::new(),
    };

    let device = resolve_wifi(bus, config).await?;
    if device.state.code() < DeviceState::Disconnected.code() {
        warn!("Not scanning, {} is {}", device.interface, device.state);
        return Err(ConnectionError::DeviceUnavailable(device.interface));
    }

    let was_notifying = notify.swap(true, Ordering::SeqCst);
    if let Err(e) = bus.request_scan(&device.path, ssids).await {
        warn!("Scan request on {} failed: {e}", device.interface);
        notify.store(was_notifying, Ordering::SeqCst);
        return Err(e);
    }

    debug!("Scan requested on {}", device.interface);
    Ok(())
}

/// Stops reporting scan results. Scans already in flight still complete.
pub(crate) fn stop_scan(notify: &AtomicBool) {
    notify.store(false, Ordering::SeqCst);
}

/// Access points the Wi-Fi device currently sees, hidden ones excluded.
pub(crate) async fn available(
    bus: &dyn NetworkBus,
    config: &InterfaceConfig,
) -> Result<Vec<AccessPointInfo>> {
    let device = resolve_wifi(bus, config).await?;
    let paths = bus.access_points(&device.path).await?;
    let networks = decode_all(bus, &paths).await;
    debug!("{} of {} access point(s) usable", networks.len(), paths.len());
    Ok(networks)
}

/// The access point the Wi-Fi device is connecting or connected to.
pub(crate) async fn connected(
    bus: &dyn NetworkBus,
    config: &InterfaceConfig,
) -> Result<AccessPointInfo> {
    let device = resolve_wifi(bus, config).await?;
    if !device.state.is_beyond_disconnected() {
        return Err(ConnectionError::NotConnected);
    }

    let ap = bus.active_access_point(&device.path).await?;
    if ap.as_str() == dbus_names::ROOT_PATH {
        return Err(ConnectionError::NotConnected);
    }

    decode(bus, &ap).await
}

/// Signal strength and quality of the connected network.
pub(crate) async fn signal_strength(
    bus: &dyn NetworkBus,
    config: &InterfaceConfig,
) -> Result<SignalReport> {
    let ap = connected(bus, config).await?;
    let quality = quality_from_dbm(&ap.signal_dbm);

    Ok(SignalReport {
        ssid: ap.ssid,
        signal_dbm: ap.signal_dbm,
        quality,
    })
}
