//! Utility functions for Wi-Fi data conversion.
//!
//! SSID bytes to strings, signal percentage to dBm, dBm to a quality bucket.

use log::warn;
use std::borrow::Cow;
use std::str;

use crate::api::models::SignalQuality;
use crate::types::constants::{limits, signal_strength};

/// Decode SSID bytes for comparison purposes, defaulting to empty string if invalid.
pub(crate) fn decode_ssid_or_empty(bytes: &[u8]) -> Cow<'static, str> {
    if bytes.is_empty() {
        return Cow::Borrowed("");
    }

    match str::from_utf8(bytes) {
        Ok(s) => Cow::Owned(s.to_owned()),
        Err(e) => {
            warn!("Invalid UTF-8 in SSID during comparison: {e}");
            Cow::Borrowed("")
        }
    }
}

/// Returns `true` if `bytes` has a usable SSID length (1 to 32 bytes).
pub(crate) fn ssid_len_valid(bytes: &[u8]) -> bool {
    (1..=limits::SSID_MAX_LEN).contains(&bytes.len())
}

/// Converts a 0-100 signal quality percentage to an approximate dBm string.
///
/// Interpolates linearly between -30 dBm at 100% and -90 dBm at 0%.
/// Percentages of 0 or below, or above 100, yield an empty string.
///
/// ```rust
/// use nmwifi::signal_to_dbm;
///
/// assert_eq!(signal_to_dbm(100), "-30");
/// assert_eq!(signal_to_dbm(0), "");
/// ```
pub fn signal_to_dbm(percent: i32) -> String {
    if percent <= 0 || percent > 100 {
        return String::new();
    }

    let span = signal_strength::DBM_AT_ZERO - signal_strength::DBM_AT_FULL;
    let dbm = signal_strength::DBM_AT_FULL + span * (100 - percent) / 100;
    dbm.to_string()
}

/// Buckets a dBm string into a [`SignalQuality`].
///
/// An empty or unparsable value means there is no signal to report.
pub(crate) fn quality_from_dbm(dbm: &str) -> SignalQuality {
    let Ok(value) = dbm.parse::<i32>() else {
        return SignalQuality::Disconnected;
    };

    match value {
        v if v >= signal_strength::EXCELLENT_MIN_DBM => SignalQuality::Excellent,
        v if v >= signal_strength::GOOD_MIN_DBM => SignalQuality::Good,
        v if v >= signal_strength::FAIR_MIN_DBM => SignalQuality::Fair,
        _ => SignalQuality::Weak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ssid_handles_bad_input() {
        assert_eq!(decode_ssid_or_empty(b"HomeNet"), "HomeNet");
        assert_eq!(decode_ssid_or_empty(b""), "");
        assert_eq!(decode_ssid_or_empty(&[0xff, 0xfe]), "");
    }

    #[test]
    fn ssid_length_bounds() {
        assert!(!ssid_len_valid(b""));
        assert!(ssid_len_valid(b"a"));
        assert!(ssid_len_valid(&[b'x'; 32]));
        assert!(!ssid_len_valid(&[b'x'; 33]));
    }

    #[test]
    fn dbm_endpoints() {
        assert_eq!(signal_to_dbm(100), "-30");
        assert_eq!(signal_to_dbm(50), "-60");
        assert_eq!(signal_to_dbm(1), "-89");
        assert_eq!(signal_to_dbm(0), "");
        assert_eq!(signal_to_dbm(-5), "");
        assert_eq!(signal_to_dbm(101), "");
    }

    #[test]
    fn dbm_is_monotonic() {
        let values: Vec<i32> = (1..=100)
            .map(|p| signal_to_dbm(p).parse().unwrap())
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values.first(), Some(&-89));
        assert_eq!(values.last(), Some(&-30));
    }

    #[test]
    fn quality_buckets() {
        assert_eq!(quality_from_dbm(""), SignalQuality::Disconnected);
        assert_eq!(quality_from_dbm("-30"), SignalQuality::Excellent);
        assert_eq!(quality_from_dbm("-50"), SignalQuality::Excellent);
        assert_eq!(quality_from_dbm("-55"), SignalQuality::Good);
        assert_eq!(quality_from_dbm("-67"), SignalQuality::Fair);
        assert_eq!(quality_from_dbm("-80"), SignalQuality::Weak);
    }
}
