//! Access point decoding and security inference.

use log::{debug, warn};
use zvariant::OwnedObjectPath;

use crate::api::models::{AccessPointInfo, ConnectionError, SecurityMode};
use crate::dbus::{AccessPointRecord, NetworkBus};
use crate::types::constants::{ApFlags, ApSecurityFlags};
use crate::util::utils::{signal_to_dbm, ssid_len_valid};
use crate::Result;

type FlagRule = (fn(ApFlags, ApSecurityFlags, ApSecurityFlags) -> bool, SecurityMode);

/// Ordered inference rules. Several bits are often set at once, so the first
/// matching rule decides.
const SECURITY_RULES: &[FlagRule] = &[
    (
        |flags, wpa, rsn| flags.is_empty() && wpa.is_empty() && rsn.is_empty(),
        SecurityMode::None,
    ),
    (
        |flags, wpa, rsn| {
            flags.contains(ApFlags::PRIVACY)
                && (wpa | rsn).contains(ApSecurityFlags::PAIR_WEP40)
        },
        SecurityMode::Wep64,
    ),
    (
        |flags, wpa, rsn| {
            flags.contains(ApFlags::PRIVACY)
                && (wpa | rsn).contains(ApSecurityFlags::PAIR_WEP104)
        },
        SecurityMode::Wep128,
    ),
    (
        |_, wpa, rsn| (wpa | rsn).contains(ApSecurityFlags::PAIR_TKIP),
        SecurityMode::WpaPskTkip,
    ),
    (
        |_, wpa, rsn| (wpa | rsn).contains(ApSecurityFlags::PAIR_CCMP),
        SecurityMode::WpaPskAes,
    ),
    (
        |_, _, rsn| {
            rsn.contains(ApSecurityFlags::KEY_MGMT_PSK | ApSecurityFlags::KEY_MGMT_802_1X)
        },
        SecurityMode::WpaWpa2Enterprise,
    ),
    (
        |_, _, rsn| rsn.contains(ApSecurityFlags::KEY_MGMT_PSK),
        SecurityMode::WpaWpa2Psk,
    ),
    (
        |_, wpa, rsn| (wpa | rsn).contains(ApSecurityFlags::GROUP_CCMP),
        SecurityMode::Wpa2PskAes,
    ),
    (
        |_, wpa, rsn| (wpa | rsn).contains(ApSecurityFlags::GROUP_TKIP),
        SecurityMode::Wpa2PskTkip,
    ),
    (
        |_, _, rsn| {
            rsn.intersects(ApSecurityFlags::KEY_MGMT_OWE | ApSecurityFlags::KEY_MGMT_OWE_TM)
        },
        SecurityMode::Wpa3Sae,
    ),
];

impl SecurityMode {
    /// Infers the security mode from an access point's `Flags`, `WpaFlags`
    /// and `RsnFlags` properties.
    ///
    /// Combinations no rule recognizes are reported as open, with a warning.
    ///
    /// ```rust
    /// use nmwifi::SecurityMode;
    ///
    /// assert_eq!(SecurityMode::from_flags(0, 0, 0), SecurityMode::None);
    /// // CCMP pairwise wins over OWE.
    /// assert_eq!(SecurityMode::from_flags(1, 0, 0x8 | 0x800), SecurityMode::WpaPskAes);
    /// ```
    pub fn from_flags(flags: u32, wpa_flags: u32, rsn_flags: u32) -> Self {
        let flags = ApFlags::from_bits_retain(flags);
        let wpa = ApSecurityFlags::from_bits_retain(wpa_flags);
        let rsn = ApSecurityFlags::from_bits_retain(rsn_flags);

        SECURITY_RULES
            .iter()
            .find(|(matches, _)| matches(flags, wpa, rsn))
            .map(|(_, mode)| *mode)
            .unwrap_or_else(|| {
                warn!(
                    "Unrecognized security flags (flags={flags:?}, wpa={wpa:?}, rsn={rsn:?}); reporting as open"
                );
                SecurityMode::None
            })
    }
}

impl AccessPointInfo {
    /// Builds a normalized record, or `None` when the SSID is hidden or
    /// longer than 32 bytes.
    pub(crate) fn from_record(record: AccessPointRecord) -> Option<Self> {
        if !ssid_len_valid(&record.ssid) {
            debug!(
                "Dropping access point {} with {}-byte SSID",
                record.hw_address,
                record.ssid.len()
            );
            return None;
        }

        Some(Self {
            ssid: String::from_utf8_lossy(&record.ssid).into_owned(),
            bssid: record.hw_address,
            strength: record.strength,
            signal_dbm: signal_to_dbm(i32::from(record.strength)),
            frequency: record.frequency,
            bitrate: record.max_bitrate,
            security: SecurityMode::from_flags(record.flags, record.wpa_flags, record.rsn_flags),
        })
    }
}

/// Reads and decodes one access point.
///
/// Hidden and malformed SSIDs yield `AccessPointRejected`.
pub(crate) async fn decode(
    bus: &dyn NetworkBus,
    access_point: &OwnedObjectPath,
) -> Result<AccessPointInfo> {
    let record = bus.access_point(access_point).await?;
    AccessPointInfo::from_record(record)
        .ok_or_else(|| ConnectionError::AccessPointRejected(access_point.to_string()))
}

/// Reads every access point in `paths`, skipping rejected and unreadable ones.
pub(crate) async fn decode_all(
    bus: &dyn NetworkBus,
    paths: &[OwnedObjectPath],
) -> Vec<AccessPointInfo> {
    let mut networks = Vec::with_capacity(paths.len());
    for path in paths {
        match decode(bus, path).await {
            Ok(info) => networks.push(info),
            Err(ConnectionError::AccessPointRejected(_)) => {}
            Err(e) => debug!("Failed to read access point {}: {e}", path.as_str()),
        }
    }
    networks
}
