//! Profile reconciliation: connect, remember, forget and disconnect.
//!
//! Connect and remember first look for a profile the Wi-Fi device can
//! already use for the SSID. A match is updated in place; otherwise a new
//! profile is created. Forget works on every profile system wide.

use log::{debug, info, warn};
use zvariant::OwnedObjectPath;

use crate::api::builders::build_wifi_connection;
use crate::api::config::InterfaceConfig;
use crate::api::models::{ConnectionError, WifiConnectRequest, validate_ssid};
use crate::core::connection_settings::{find_all_profiles, find_device_profile, saved_ssids};
use crate::core::device::resolve_wifi;
use crate::dbus::{ActivationOptions, NetworkBus};
use crate::Result;

/// Joins the network described by `request`.
///
/// The flow:
/// 1. Validate the request and build its settings (no remote call on failure)
/// 2. Resolve the Wi-Fi device
/// 3. Look for a reusable profile among the device's available connections
/// 4. Update and activate it, or create and activate a new one
///
/// Returns the active connection path. A failed update aborts before
/// activation; a failed activation after a successful update is not rolled
/// back.
pub(crate) async fn connect(
    bus: &dyn NetworkBus,
    config: &InterfaceConfig,
    request: &WifiConnectRequest,
) -> Result<OwnedObjectPath> {
    debug!("Connecting to {request:?}");
    let settings = build_wifi_connection(request, &config.wifi_interface)?;
    let device = resolve_wifi(bus, config).await?;

    let active = match find_device_profile(bus, &device.path, &request.ssid).await? {
        Some(saved) => {
            debug!("Updating saved profile {}", saved.as_str());
            bus.update_connection(&saved, settings).await?;
            bus.activate_connection(&saved, &device.path).await?
        }
        None => {
            debug!("No saved profile for '{}', creating one", request.ssid);
            let options = ActivationOptions {
                persist: request.persist,
            };
            bus.add_and_activate_connection(settings, &device.path, options)
                .await?
        }
    };

    info!("Activating '{}' on {}", request.ssid, device.interface);
    Ok(active)
}

/// Stores a profile for `request` without activating it.
///
/// An existing profile on the Wi-Fi device is updated; otherwise a new one
/// is added.
pub(crate) async fn add_known(
    bus: &dyn NetworkBus,
    config: &InterfaceConfig,
    request: &WifiConnectRequest,
) -> Result<()> {
    let settings = build_wifi_connection(request, &config.wifi_interface)?;
    let device = resolve_wifi(bus, config).await?;

    match find_device_profile(bus, &device.path, &request.ssid).await? {
        Some(saved) => {
            bus.update_connection(&saved, settings).await?;
            info!("Updated saved network '{}'", request.ssid);
        }
        None => {
            let path = bus.add_connection(settings).await?;
            info!("Saved network '{}' as {}", request.ssid, path.as_str());
        }
    }

    Ok(())
}

/// Deletes every saved profile whose SSID is `ssid`.
///
/// Succeeds if at least one profile was deleted. No match is an error
/// (`NoSavedConnection`); if every deletion failed the last failure is
/// returned.
pub(crate) async fn forget(bus: &dyn NetworkBus, ssid: &str) -> Result<()> {
    validate_ssid(ssid)?;
    debug!("Starting forget operation for: {ssid}");

    let matches = find_all_profiles(bus, ssid).await?;
    if matches.is_empty() {
        debug!("No saved connections found for '{ssid}'");
        return Err(ConnectionError::NoSavedConnection);
    }

    let mut deleted = 0;
    let mut last_error = None;
    for path in &matches {
        match bus.delete_connection(path).await {
            Ok(()) => deleted += 1,
            Err(e) => {
                warn!("Failed to delete connection {}: {e}", path.as_str());
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if deleted == 0 => Err(e),
        _ => {
            info!("Successfully deleted {deleted} connection(s) for '{ssid}'");
            Ok(())
        }
    }
}

/// Disconnects the Wi-Fi device if it is connecting or connected.
pub(crate) async fn disconnect(bus: &dyn NetworkBus, config: &InterfaceConfig) -> Result<()> {
    let device = resolve_wifi(bus, config).await?;

    if !device.state.is_beyond_disconnected() {
        debug!("{} already disconnected ({})", device.interface, device.state);
        return Ok(());
    }

    bus.disconnect_device(&device.path).await?;
    info!("Disconnected {}", device.interface);
    Ok(())
}

/// SSIDs of every saved Wi-Fi profile.
pub(crate) async fn known_ssids(bus: &dyn NetworkBus) -> Result<Vec<String>> {
    let ssids = saved_ssids(bus).await?;
    debug!("{} saved Wi-Fi network(s)", ssids.len());
    Ok(ssids)
}
