//! Core internal logic.
//!
//! Device lookup, access point decoding, profile reconciliation, scanning
//! and state normalization. Everything here talks to NetworkManager only
//! through [`NetworkBus`](crate::dbus::NetworkBus).

pub(crate) mod access_point;
pub(crate) mod connection;
pub(crate) mod connection_settings;
pub(crate) mod device;
pub(crate) mod scan;
pub(crate) mod state;
