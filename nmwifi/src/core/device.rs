//! Device lookup by interface name.
//!
//! Every call enumerates the devices NetworkManager currently exposes; nothing
//! is cached between calls.

use log::{debug, warn};
use zvariant::OwnedObjectPath;

use crate::api::config::InterfaceConfig;
use crate::api::models::{ConnectionError, DeviceProperties, DeviceState, DeviceType};
use crate::dbus::{DeviceRecord, NetworkBus};
use crate::Result;

impl DeviceProperties {
    pub(crate) fn from_record(path: OwnedObjectPath, record: DeviceRecord) -> Self {
        Self {
            interface: record.interface,
            path,
            device_type: record.device_type.into(),
            state: record.state.into(),
            reason: record.reason.into(),
            active_connection: record.active_connection,
        }
    }
}

/// Finds the device whose interface name is exactly `interface`.
///
/// A failed enumeration is logged and reported as `DeviceNotFound`: to the
/// caller the device is simply unavailable.
pub(crate) async fn resolve(bus: &dyn NetworkBus, interface: &str) -> Result<DeviceProperties> {
    let paths = match bus.devices().await {
        Ok(paths) => paths,
        Err(e) => {
            warn!("Failed to enumerate devices while looking for {interface}: {e}");
            return Err(ConnectionError::DeviceNotFound(interface.to_string()));
        }
    };

    for path in paths {
        let record = match bus.device(&path).await {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping device {}: {e}", path.as_str());
                continue;
            }
        };

        if record.interface == interface {
            return Ok(DeviceProperties::from_record(path, record));
        }
    }

    debug!("No device with interface {interface}");
    Err(ConnectionError::DeviceNotFound(interface.to_string()))
}

/// Resolves the configured Wi-Fi device and checks it is usable.
///
/// Fails with `NoWifiDevice` when the configured interface is not a Wi-Fi
/// device, and with `DeviceUnavailable` while NetworkManager reports its
/// state as unknown.
pub(crate) async fn resolve_wifi(
    bus: &dyn NetworkBus,
    config: &InterfaceConfig,
) -> Result<DeviceProperties> {
    let device = resolve(bus, &config.wifi_interface).await?;

    if device.device_type != DeviceType::Wifi {
        warn!(
            "{} is a {} device, not Wi-Fi",
            device.interface, device.device_type
        );
        return Err(ConnectionError::NoWifiDevice);
    }

    if device.state == DeviceState::Unknown {
        warn!("Wi-Fi device {} is in an unknown state", device.interface);
        return Err(ConnectionError::DeviceUnavailable(device.interface));
    }

    Ok(device)
}
