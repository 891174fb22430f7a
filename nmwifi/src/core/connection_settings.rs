//! Saved connection profile lookup.
//!
//! Profiles are matched on the SSID stored in their `802-11-wireless`
//! section, never on the profile id: a user may have renamed the profile.

use log::{debug, warn};
use zvariant::OwnedObjectPath;

use crate::dbus::{NetworkBus, StoredProfile};
use crate::types::constants::settings;
use crate::util::utils::decode_ssid_or_empty;
use crate::Result;

impl StoredProfile {
    /// The profile's SSID if it is a Wi-Fi profile with a readable SSID.
    pub(crate) fn wifi_ssid(&self) -> Option<String> {
        if self.kind != settings::WIRELESS_TYPE {
            return None;
        }
        let ssid = decode_ssid_or_empty(self.ssid.as_deref()?);
        (!ssid.is_empty()).then(|| ssid.into_owned())
    }

    pub(crate) fn matches_ssid(&self, ssid: &str) -> bool {
        self.wifi_ssid().is_some_and(|s| s == ssid)
    }
}

/// Reads every profile in `paths`, skipping any that cannot be read.
async fn read_profiles(bus: &dyn NetworkBus, paths: Vec<OwnedObjectPath>) -> Vec<StoredProfile> {
    let mut profiles = Vec::with_capacity(paths.len());
    for path in paths {
        match bus.connection_settings(&path).await {
            Ok(profile) => profiles.push(profile),
            Err(e) => warn!("Failed to read settings of {}: {e}", path.as_str()),
        }
    }
    profiles
}

/// First profile bound to `device` whose SSID is `ssid`.
///
/// Only the device's available connections are considered: a device can
/// only reuse a profile NetworkManager already allows on it.
pub(crate) async fn find_device_profile(
    bus: &dyn NetworkBus,
    device: &OwnedObjectPath,
    ssid: &str,
) -> Result<Option<OwnedObjectPath>> {
    let paths = bus.available_connections(device).await?;
    debug!("{} available connection(s) on {}", paths.len(), device.as_str());

    for path in paths {
        let profile = match bus.connection_settings(&path).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to read settings of {}: {e}", path.as_str());
                continue;
            }
        };

        if profile.matches_ssid(ssid) {
            debug!("Reusing profile '{}' for '{ssid}'", profile.id);
            return Ok(Some(profile.path));
        }
    }

    Ok(None)
}

/// Every saved profile system wide whose SSID is `ssid`.
pub(crate) async fn find_all_profiles(
    bus: &dyn NetworkBus,
    ssid: &str,
) -> Result<Vec<OwnedObjectPath>> {
    let paths = bus.list_connections().await?;
    Ok(read_profiles(bus, paths)
        .await
        .into_iter()
        .filter(|p| p.matches_ssid(ssid))
        .map(|p| p.path)
        .collect())
}

/// SSIDs of all saved Wi-Fi profiles, in enumeration order.
pub(crate) async fn saved_ssids(bus: &dyn NetworkBus) -> Result<Vec<String>> {
    let paths = bus.list_connections().await?;
    Ok(read_profiles(bus, paths)
        .await
        .iter()
        .filter_map(StoredProfile::wifi_ssid)
        .collect())
}
