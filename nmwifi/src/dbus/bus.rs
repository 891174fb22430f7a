//! The bus seam between the core logic and NetworkManager.
//!
//! [`NetworkBus`] lists every remote call and signal the crate consumes,
//! with typed payloads. [`SystemBus`](super::SystemBus) implements it over
//! zbus; tests substitute an in-memory fake.

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use zvariant::OwnedObjectPath;

use crate::api::builders::ConnectionSettings;
use crate::Result;

/// A boxed signal stream.
pub type SignalStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Properties of a device object read in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub interface: String,
    pub device_type: u32,
    pub state: u32,
    pub reason: u32,
    pub active_connection: OwnedObjectPath,
}

/// Properties of an access point object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessPointRecord {
    pub ssid: Vec<u8>,
    pub hw_address: String,
    pub strength: u8,
    pub flags: u32,
    pub wpa_flags: u32,
    pub rsn_flags: u32,
    pub frequency: u32,
    pub max_bitrate: u32,
}

/// A saved profile, decoded from its `a{sa{sv}}` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProfile {
    pub path: OwnedObjectPath,
    /// `connection.id`
    pub id: String,
    /// `connection.type`, e.g. `802-11-wireless`.
    pub kind: String,
    /// `connection.interface-name`, if bound.
    pub interface_name: Option<String>,
    /// `802-11-wireless.ssid`, if present.
    pub ssid: Option<Vec<u8>>,
}

/// Payload of a device `StateChanged` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub new_state: u32,
    pub old_state: u32,
    pub reason: u32,
}

/// Address family of an [`AddressSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

/// The full address list of one IP configuration object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSnapshot {
    pub family: IpFamily,
    /// Addresses in CIDR notation, e.g. `192.168.1.20/24`.
    pub addresses: Vec<String>,
}

/// Options for `AddAndActivateConnection2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationOptions {
    /// When `false`, the profile is created volatile.
    pub persist: bool,
}

/// Remote calls and signal subscriptions against NetworkManager.
///
/// Every method is a fresh round trip; implementations must not cache
/// remote state. Implementations are shared between the caller's tasks and
/// the event monitor thread.
///
/// Property subscriptions (`primary_connection_changed`,
/// `last_scan_changed`, `address_changed`) yield the current value first,
/// then every change.
#[async_trait]
pub trait NetworkBus: Send + Sync {
    /// All device object paths.
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Reads interface name, type, state and reason of a device.
    async fn device(&self, device: &OwnedObjectPath) -> Result<DeviceRecord>;

    /// Profiles NetworkManager considers usable on this device.
    async fn available_connections(&self, device: &OwnedObjectPath)
    -> Result<Vec<OwnedObjectPath>>;

    /// Calls `Device.Disconnect`.
    async fn disconnect_device(&self, device: &OwnedObjectPath) -> Result<()>;

    /// All saved profiles, system wide.
    async fn list_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Reads and decodes a saved profile.
    async fn connection_settings(&self, connection: &OwnedObjectPath) -> Result<StoredProfile>;

    /// Stores a new profile without activating it.
    async fn add_connection(&self, settings: ConnectionSettings) -> Result<OwnedObjectPath>;

    /// Replaces a profile's settings.
    async fn update_connection(
        &self,
        connection: &OwnedObjectPath,
        settings: ConnectionSettings,
    ) -> Result<()>;

    /// Deletes a profile.
    async fn delete_connection(&self, connection: &OwnedObjectPath) -> Result<()>;

    /// Activates a saved profile on a device; returns the active connection.
    async fn activate_connection(
        &self,
        connection: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath>;

    /// Creates and activates a profile in one call; returns the active connection.
    async fn add_and_activate_connection(
        &self,
        settings: ConnectionSettings,
        device: &OwnedObjectPath,
        options: ActivationOptions,
    ) -> Result<OwnedObjectPath>;

    /// Requests a scan, optionally probing the given SSIDs.
    async fn request_scan(&self, device: &OwnedObjectPath, ssids: Vec<Vec<u8>>) -> Result<()>;

    /// Access points currently known to a wireless device.
    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>>;

    /// The access point a wireless device is associated with ("/" if none).
    async fn active_access_point(&self, device: &OwnedObjectPath) -> Result<OwnedObjectPath>;

    /// Reads the properties of an access point.
    async fn access_point(&self, access_point: &OwnedObjectPath) -> Result<AccessPointRecord>;

    /// `DeviceAdded` signals.
    async fn device_added(&self) -> Result<SignalStream<OwnedObjectPath>>;

    /// `DeviceRemoved` signals.
    async fn device_removed(&self) -> Result<SignalStream<OwnedObjectPath>>;

    /// `PrimaryConnection` property values.
    async fn primary_connection_changed(&self) -> Result<SignalStream<OwnedObjectPath>>;

    /// `StateChanged` signals of one device.
    async fn device_state_changed(&self, device: &OwnedObjectPath)
    -> Result<SignalStream<StateChange>>;

    /// `LastScan` property values of a wireless device.
    async fn last_scan_changed(&self, device: &OwnedObjectPath) -> Result<SignalStream<i64>>;

    /// Settings `NewConnection` signals.
    async fn connection_added(&self) -> Result<SignalStream<OwnedObjectPath>>;

    /// Settings `ConnectionRemoved` signals.
    async fn connection_removed(&self) -> Result<SignalStream<OwnedObjectPath>>;

    /// `AddressData` values of a device's IPv4 and IPv6 configurations.
    async fn address_changed(&self, device: &OwnedObjectPath)
    -> Result<SignalStream<AddressSnapshot>>;
}
