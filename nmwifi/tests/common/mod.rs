//! In-memory NetworkManager for integration tests.
//!
//! `FakeBus` answers from a mutable model, records every remote call, and
//! hands out signal streams fed by channels the test pushes into.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::mpsc::{UnboundedSender, unbounded};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use zvariant::OwnedObjectPath;

use nmwifi::builders::ConnectionSettings;
use nmwifi::dbus::{
    AccessPointRecord, ActivationOptions, AddressSnapshot, DeviceRecord, NetworkBus, SignalStream,
    StateChange, StoredProfile,
};
use nmwifi::{ConnectionError, Result};

pub const WLAN0: &str = "/org/freedesktop/NetworkManager/Devices/3";
pub const ETH0: &str = "/org/freedesktop/NetworkManager/Devices/2";

pub fn path(s: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(s).unwrap()
}

fn failure(what: &str) -> ConnectionError {
    ConnectionError::Dbus(zbus::Error::Failure(what.to_string()))
}

/// A remote call as seen by the fake.
#[derive(Debug)]
pub enum Call {
    Devices,
    Device(String),
    AvailableConnections(String),
    DisconnectDevice(String),
    ListConnections,
    ConnectionSettings(String),
    AddConnection(ConnectionSettings),
    UpdateConnection(String, ConnectionSettings),
    DeleteConnection(String),
    ActivateConnection { connection: String, device: String },
    AddAndActivate { settings: ConnectionSettings, device: String, options: ActivationOptions },
    RequestScan(String, Vec<Vec<u8>>),
    AccessPoints(String),
    ActiveAccessPoint(String),
    AccessPoint(String),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Devices => "devices",
            Call::Device(_) => "device",
            Call::AvailableConnections(_) => "available_connections",
            Call::DisconnectDevice(_) => "disconnect_device",
            Call::ListConnections => "list_connections",
            Call::ConnectionSettings(_) => "connection_settings",
            Call::AddConnection(_) => "add_connection",
            Call::UpdateConnection(..) => "update_connection",
            Call::DeleteConnection(_) => "delete_connection",
            Call::ActivateConnection { .. } => "activate_connection",
            Call::AddAndActivate { .. } => "add_and_activate_connection",
            Call::RequestScan(..) => "request_scan",
            Call::AccessPoints(_) => "access_points",
            Call::ActiveAccessPoint(_) => "active_access_point",
            Call::AccessPoint(_) => "access_point",
        }
    }
}

#[derive(Default)]
pub struct Model {
    pub devices: Vec<(OwnedObjectPath, DeviceRecord)>,
    pub profiles: Vec<StoredProfile>,
    /// Device path to the profiles it may activate.
    pub available: HashMap<String, Vec<OwnedObjectPath>>,
    pub access_points: HashMap<String, AccessPointRecord>,
    pub visible: HashMap<String, Vec<OwnedObjectPath>>,
    pub active_ap: HashMap<String, OwnedObjectPath>,
    pub fail_update: bool,
    pub fail_activate: bool,
    pub fail_delete: HashSet<String>,
    pub fail_subscriptions: bool,
    pub fail_settings_signals: bool,
    pub fail_devices: bool,
    pub fail_scan: bool,
    next_profile: u32,
}

#[derive(Default)]
pub struct Signals {
    pub device_added: Vec<UnboundedSender<OwnedObjectPath>>,
    pub device_removed: Vec<UnboundedSender<OwnedObjectPath>>,
    pub primary_connection: Vec<UnboundedSender<OwnedObjectPath>>,
    pub connection_added: Vec<UnboundedSender<OwnedObjectPath>>,
    pub connection_removed: Vec<UnboundedSender<OwnedObjectPath>>,
    pub state: HashMap<String, Vec<UnboundedSender<StateChange>>>,
    pub last_scan: HashMap<String, Vec<UnboundedSender<i64>>>,
    pub addresses: HashMap<String, Vec<UnboundedSender<AddressSnapshot>>>,
}

#[derive(Default)]
pub struct FakeBus {
    model: Mutex<Model>,
    calls: Mutex<Vec<Call>>,
    signals: Mutex<Signals>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// `wlan0` (Wi-Fi) and `eth0` (Ethernet), both in the given states.
    pub fn with_standard_devices(wifi_state: u32) -> Self {
        let bus = Self::new();
        bus.add_device(ETH0, "eth0", 1, 100);
        bus.add_device(WLAN0, "wlan0", 2, wifi_state);
        bus
    }

    pub fn model(&self) -> MutexGuard<'_, Model> {
        self.model.lock().unwrap()
    }

    pub fn calls(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }

    pub fn clear_calls(&self) {
        self.calls().clear();
    }

    pub fn signals(&self) -> MutexGuard<'_, Signals> {
        self.signals.lock().unwrap()
    }

    fn record(&self, call: Call) {
        self.calls().push(call);
    }

    pub fn add_device(&self, device: &str, interface: &str, device_type: u32, state: u32) {
        self.model().devices.push((
            path(device),
            DeviceRecord {
                interface: interface.to_string(),
                device_type,
                state,
                reason: 0,
                active_connection: path("/"),
            },
        ));
    }

    pub fn remove_device(&self, device: &str) {
        self.model().devices.retain(|(p, _)| p.as_str() != device);
    }

    pub fn set_device_state(&self, device: &str, state: u32, reason: u32) {
        let mut model = self.model();
        if let Some((_, record)) = model.devices.iter_mut().find(|(p, _)| p.as_str() == device) {
            record.state = state;
            record.reason = reason;
        }
    }

    /// Adds a saved profile. `bound_to` makes it available on that device.
    pub fn add_profile(
        &self,
        profile: &str,
        kind: &str,
        ssid: &[u8],
        bound_to: Option<&str>,
    ) {
        let mut model = self.model();
        let p = path(profile);
        model.profiles.push(StoredProfile {
            path: p.clone(),
            id: String::from_utf8_lossy(ssid).into_owned(),
            kind: kind.to_string(),
            interface_name: None,
            ssid: Some(ssid.to_vec()),
        });
        if let Some(device) = bound_to {
            model.available.entry(device.to_string()).or_default().push(p);
        }
    }

    pub fn wifi_profile(&self, profile: &str, ssid: &str, bound_to: Option<&str>) {
        self.add_profile(profile, "802-11-wireless", ssid.as_bytes(), bound_to);
    }

    pub fn profile_ssids(&self) -> Vec<String> {
        self.model()
            .profiles
            .iter()
            .filter_map(|p| p.ssid.as_ref())
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .collect()
    }

    pub fn add_access_point(&self, device: &str, ap: &str, record: AccessPointRecord) {
        let mut model = self.model();
        model.access_points.insert(ap.to_string(), record);
        model.visible.entry(device.to_string()).or_default().push(path(ap));
    }

    pub fn set_active_access_point(&self, device: &str, ap: &str) {
        self.model().active_ap.insert(device.to_string(), path(ap));
    }

    /// Number of live state-change subscriptions on `device`.
    pub fn state_subscribers(&self, device: &str) -> usize {
        self.signals()
            .state
            .get(device)
            .map_or(0, |senders| senders.iter().filter(|tx| !tx.is_closed()).count())
    }

    pub fn push_device_added(&self, device: &str) {
        for tx in &self.signals().device_added {
            let _ = tx.unbounded_send(path(device));
        }
    }

    pub fn push_device_removed(&self, device: &str) {
        for tx in &self.signals().device_removed {
            let _ = tx.unbounded_send(path(device));
        }
    }

    pub fn push_state(&self, device: &str, new_state: u32, old_state: u32, reason: u32) {
        if let Some(senders) = self.signals().state.get(device) {
            for tx in senders {
                let _ = tx.unbounded_send(StateChange {
                    new_state,
                    old_state,
                    reason,
                });
            }
        }
    }

    pub fn push_last_scan(&self, device: &str, timestamp: i64) {
        if let Some(senders) = self.signals().last_scan.get(device) {
            for tx in senders {
                let _ = tx.unbounded_send(timestamp);
            }
        }
    }

    pub fn push_addresses(&self, device: &str, snapshot: AddressSnapshot) {
        if let Some(senders) = self.signals().addresses.get(device) {
            for tx in senders {
                let _ = tx.unbounded_send(snapshot.clone());
            }
        }
    }

    fn subscription_check(&self) -> Result<()> {
        if self.model().fail_subscriptions {
            return Err(failure("subscription refused"));
        }
        Ok(())
    }
}

fn channel<T: Send + 'static>(senders: &mut Vec<UnboundedSender<T>>) -> SignalStream<T> {
    let (tx, rx) = unbounded();
    senders.push(tx);
    Box::pin(rx)
}

#[async_trait]
impl NetworkBus for FakeBus {
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>> {
        self.record(Call::Devices);
        if self.model().fail_devices {
            return Err(failure("device enumeration failed"));
        }
        Ok(self.model().devices.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn device(&self, device: &OwnedObjectPath) -> Result<DeviceRecord> {
        self.record(Call::Device(device.to_string()));
        self.model()
            .devices
            .iter()
            .find(|(p, _)| p == device)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| failure("unknown device"))
    }

    async fn available_connections(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<Vec<OwnedObjectPath>> {
        self.record(Call::AvailableConnections(device.to_string()));
        Ok(self
            .model()
            .available
            .get(device.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn disconnect_device(&self, device: &OwnedObjectPath) -> Result<()> {
        self.record(Call::DisconnectDevice(device.to_string()));
        Ok(())
    }

    async fn list_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        self.record(Call::ListConnections);
        Ok(self.model().profiles.iter().map(|p| p.path.clone()).collect())
    }

    async fn connection_settings(&self, connection: &OwnedObjectPath) -> Result<StoredProfile> {
        self.record(Call::ConnectionSettings(connection.to_string()));
        self.model()
            .profiles
            .iter()
            .find(|p| &p.path == connection)
            .cloned()
            .ok_or_else(|| failure("unknown connection"))
    }

    async fn add_connection(&self, settings: ConnectionSettings) -> Result<OwnedObjectPath> {
        self.record(Call::AddConnection(settings));
        let mut model = self.model();
        model.next_profile += 1;
        Ok(path(&format!(
            "/org/freedesktop/NetworkManager/Settings/{}",
            100 + model.next_profile
        )))
    }

    async fn update_connection(
        &self,
        connection: &OwnedObjectPath,
        settings: ConnectionSettings,
    ) -> Result<()> {
        self.record(Call::UpdateConnection(connection.to_string(), settings));
        if self.model().fail_update {
            return Err(failure("update refused"));
        }
        Ok(())
    }

    async fn delete_connection(&self, connection: &OwnedObjectPath) -> Result<()> {
        self.record(Call::DeleteConnection(connection.to_string()));
        let mut model = self.model();
        if model.fail_delete.contains(connection.as_str()) {
            return Err(failure("delete refused"));
        }
        model.profiles.retain(|p| &p.path != connection);
        for profiles in model.available.values_mut() {
            profiles.retain(|p| p != connection);
        }
        Ok(())
    }

    async fn activate_connection(
        &self,
        connection: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        self.record(Call::ActivateConnection {
            connection: connection.to_string(),
            device: device.to_string(),
        });
        if self.model().fail_activate {
            return Err(failure("activation refused"));
        }
        Ok(path("/org/freedesktop/NetworkManager/ActiveConnection/1"))
    }

    async fn add_and_activate_connection(
        &self,
        settings: ConnectionSettings,
        device: &OwnedObjectPath,
        options: ActivationOptions,
    ) -> Result<OwnedObjectPath> {
        self.record(Call::AddAndActivate {
            settings,
            device: device.to_string(),
            options,
        });
        if self.model().fail_activate {
            return Err(failure("activation refused"));
        }
        Ok(path("/org/freedesktop/NetworkManager/ActiveConnection/2"))
    }

    async fn request_scan(&self, device: &OwnedObjectPath, ssids: Vec<Vec<u8>>) -> Result<()> {
        self.record(Call::RequestScan(device.to_string(), ssids));
        if self.model().fail_scan {
            return Err(failure("scan refused"));
        }
        Ok(())
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        self.record(Call::AccessPoints(device.to_string()));
        Ok(self
            .model()
            .visible
            .get(device.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn active_access_point(&self, device: &OwnedObjectPath) -> Result<OwnedObjectPath> {
        self.record(Call::ActiveAccessPoint(device.to_string()));
        Ok(self
            .model()
            .active_ap
            .get(device.as_str())
            .cloned()
            .unwrap_or_else(|| path("/")))
    }

    async fn access_point(&self, access_point: &OwnedObjectPath) -> Result<AccessPointRecord> {
        self.record(Call::AccessPoint(access_point.to_string()));
        self.model()
            .access_points
            .get(access_point.as_str())
            .cloned()
            .ok_or_else(|| failure("unknown access point"))
    }

    async fn device_added(&self) -> Result<SignalStream<OwnedObjectPath>> {
        self.subscription_check()?;
        Ok(channel(&mut self.signals().device_added))
    }

    async fn device_removed(&self) -> Result<SignalStream<OwnedObjectPath>> {
        self.subscription_check()?;
        Ok(channel(&mut self.signals().device_removed))
    }

    async fn primary_connection_changed(&self) -> Result<SignalStream<OwnedObjectPath>> {
        self.subscription_check()?;
        Ok(channel(&mut self.signals().primary_connection))
    }

    async fn device_state_changed(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<SignalStream<StateChange>> {
        let mut signals = self.signals();
        Ok(channel(signals.state.entry(device.to_string()).or_default()))
    }

    async fn last_scan_changed(&self, device: &OwnedObjectPath) -> Result<SignalStream<i64>> {
        let mut signals = self.signals();
        Ok(channel(signals.last_scan.entry(device.to_string()).or_default()))
    }

    async fn connection_added(&self) -> Result<SignalStream<OwnedObjectPath>> {
        self.subscription_check()?;
        if self.model().fail_settings_signals {
            return Err(failure("settings unavailable"));
        }
        Ok(channel(&mut self.signals().connection_added))
    }

    async fn connection_removed(&self) -> Result<SignalStream<OwnedObjectPath>> {
        self.subscription_check()?;
        if self.model().fail_settings_signals {
            return Err(failure("settings unavailable"));
        }
        Ok(channel(&mut self.signals().connection_removed))
    }

    async fn address_changed(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<SignalStream<AddressSnapshot>> {
        let mut signals = self.signals();
        Ok(channel(signals.addresses.entry(device.to_string()).or_default()))
    }
}

/// An access point record with WPA2 personal security.
pub fn secured_ap(ssid: &[u8], strength: u8) -> AccessPointRecord {
    AccessPointRecord {
        ssid: ssid.to_vec(),
        hw_address: "AA:BB:CC:DD:EE:FF".into(),
        strength,
        flags: 0x1,
        wpa_flags: 0,
        rsn_flags: 0x8 | 0x100,
        frequency: 2437,
        max_bitrate: 54_000,
    }
}
