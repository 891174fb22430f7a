//! Device state normalization.
//!
//! NetworkManager reports a (state, reason) pair per device. These tables
//! reduce it to a [`WifiState`] for the Wi-Fi device and to an
//! [`InterfaceState`] for any monitored interface.

use log::warn;

use crate::api::models::{DeviceState, InterfaceState, StateReason, WifiState};

/// Reasons that describe the failure better than the state does. Checked first.
const REASON_OVERRIDES: &[(StateReason, WifiState)] = &[
    (StateReason::SupplicantAvailable, WifiState::Uninstalled),
    (StateReason::SsidNotFound, WifiState::SsidNotFound),
    (StateReason::SupplicantTimeout, WifiState::AuthenticationFailed),
    (StateReason::NoSecrets, WifiState::AuthenticationFailed),
    (StateReason::SupplicantFailed, WifiState::Error),
    (StateReason::SupplicantConfigFailed, WifiState::ConnectionInterrupted),
    (StateReason::SupplicantDisconnect, WifiState::InvalidCredentials),
];

const STATE_MAP: &[(DeviceState, WifiState)] = &[
    (DeviceState::Unknown, WifiState::Uninstalled),
    (DeviceState::Unmanaged, WifiState::Disabled),
    (DeviceState::Unavailable, WifiState::Disconnected),
    (DeviceState::Disconnected, WifiState::Disconnected),
    (DeviceState::Prepare, WifiState::Pairing),
    (DeviceState::Config, WifiState::Connecting),
    (DeviceState::NeedAuth, WifiState::Connecting),
    (DeviceState::IpConfig, WifiState::Connecting),
    (DeviceState::IpCheck, WifiState::Connecting),
    (DeviceState::Secondaries, WifiState::Connecting),
    (DeviceState::Activated, WifiState::Connected),
    (DeviceState::Deactivating, WifiState::ConnectionLost),
    (DeviceState::Failed, WifiState::ConnectionFailed),
];

const INTERFACE_MAP: &[(DeviceState, InterfaceState)] = &[
    (DeviceState::Unknown, InterfaceState::Disabled),
    (DeviceState::Unmanaged, InterfaceState::Disabled),
    (DeviceState::Unavailable, InterfaceState::LinkDown),
    (DeviceState::Disconnected, InterfaceState::LinkDown),
    (DeviceState::Prepare, InterfaceState::LinkUp),
    (DeviceState::IpConfig, InterfaceState::AcquiringIp),
    (DeviceState::IpCheck, InterfaceState::AcquiringIp),
];

/// Maps a Wi-Fi device's state and reason to a [`WifiState`].
///
/// Pure and total: states outside the table yield [`WifiState::Invalid`].
pub(crate) fn normalize(state: DeviceState, reason: StateReason) -> WifiState {
    if let Some((_, wifi)) = REASON_OVERRIDES.iter().find(|(r, _)| *r == reason) {
        return *wifi;
    }

    match STATE_MAP.iter().find(|(s, _)| *s == state) {
        Some((_, wifi)) => *wifi,
        None => {
            warn!("Unmapped device state {state} (reason {reason})");
            WifiState::Invalid
        }
    }
}

/// Link-level state for a monitored interface, if this state is reported.
pub(crate) fn normalize_interface(state: DeviceState) -> Option<InterfaceState> {
    INTERFACE_MAP
        .iter()
        .find(|(s, _)| *s == state)
        .map(|(_, iface)| *iface)
}
