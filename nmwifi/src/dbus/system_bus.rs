//! zbus implementation of [`NetworkBus`].

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::collections::HashMap;
use zbus::Connection;
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use super::bus::{
    AccessPointRecord, ActivationOptions, AddressSnapshot, DeviceRecord, IpFamily, NetworkBus,
    SignalStream, StateChange, StoredProfile,
};
use super::{
    NMAccessPointProxy, NMDeviceProxy, NMIp4ConfigProxy, NMIp6ConfigProxy, NMProxy,
    NMSettingsConnectionProxy, NMSettingsProxy, NMWirelessProxy,
};
use crate::api::builders::ConnectionSettings;
use crate::api::models::ConnectionError;
use crate::types::constants::{dbus_names, settings};
use crate::Result;

/// NetworkManager on the system bus.
///
/// Holds one shared [`zbus::Connection`]; proxies are built per call and
/// dropped when the call returns. Cloning shares the connection.
#[derive(Debug, Clone)]
pub struct SystemBus {
    conn: Connection,
}

impl SystemBus {
    /// Connects to the system D-Bus.
    pub async fn new() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    async fn device_proxy(&self, path: &OwnedObjectPath) -> Result<NMDeviceProxy<'static>> {
        Ok(NMDeviceProxy::builder(&self.conn)
            .path(path.clone())?
            .build()
            .await?)
    }

    async fn wireless_proxy(&self, path: &OwnedObjectPath) -> Result<NMWirelessProxy<'static>> {
        Ok(NMWirelessProxy::builder(&self.conn)
            .path(path.clone())?
            .build()
            .await?)
    }

    async fn settings_connection_proxy(
        &self,
        path: &OwnedObjectPath,
    ) -> Result<NMSettingsConnectionProxy<'static>> {
        Ok(NMSettingsConnectionProxy::builder(&self.conn)
            .path(path.clone())?
            .build()
            .await?)
    }
}

/// Address stream for one IP config object, starting with its current value.
async fn config_addresses(
    conn: &Connection,
    config: OwnedObjectPath,
    family: IpFamily,
) -> Result<SignalStream<AddressSnapshot>> {
    match family {
        IpFamily::V4 => {
            let proxy = NMIp4ConfigProxy::builder(conn).path(config)?.build().await?;
            let current = proxy.address_data().await.unwrap_or_default();
            let changes = proxy.receive_address_data_changed().await;
            let updates = changes.filter_map(move |change| async move {
                change.get().await.ok().map(|data| snapshot(family, data))
            });
            Ok(Box::pin(
                stream::once(async move { snapshot(family, current) }).chain(updates),
            ))
        }
        IpFamily::V6 => {
            let proxy = NMIp6ConfigProxy::builder(conn).path(config)?.build().await?;
            let current = proxy.address_data().await.unwrap_or_default();
            let changes = proxy.receive_address_data_changed().await;
            let updates = changes.filter_map(move |change| async move {
                change.get().await.ok().map(|data| snapshot(family, data))
            });
            Ok(Box::pin(
                stream::once(async move { snapshot(family, current) }).chain(updates),
            ))
        }
    }
}

/// Follows a device's IP config path and the addresses of whichever config
/// object is current.
struct AddressFollower {
    conn: Connection,
    family: IpFamily,
    configs: SignalStream<OwnedObjectPath>,
    current: Option<SignalStream<AddressSnapshot>>,
}

enum FollowerStep {
    Config(Option<OwnedObjectPath>),
    Addresses(Option<AddressSnapshot>),
}

async fn next_or_pending<T>(stream: &mut Option<SignalStream<T>>) -> Option<T> {
    match stream {
        Some(s) => s.next().await,
        None => std::future::pending().await,
    }
}

fn follow_addresses(follower: AddressFollower) -> SignalStream<AddressSnapshot> {
    Box::pin(stream::unfold(follower, |mut st| async move {
        loop {
            let step = {
                let configs = &mut st.configs;
                let current = &mut st.current;
                tokio::select! {
                    path = configs.next() => FollowerStep::Config(path),
                    snap = next_or_pending(current) => FollowerStep::Addresses(snap),
                }
            };

            match step {
                FollowerStep::Config(None) => return None,
                FollowerStep::Config(Some(path)) if path.as_str() == dbus_names::ROOT_PATH => {
                    st.current = None;
                    let empty = AddressSnapshot {
                        family: st.family,
                        addresses: Vec::new(),
                    };
                    return Some((empty, st));
                }
                FollowerStep::Config(Some(path)) => {
                    st.current = match config_addresses(&st.conn, path.clone(), st.family).await {
                        Ok(s) => Some(s),
                        Err(e) => {
                            warn!("Failed to watch addresses of {}: {e}", path.as_str());
                            None
                        }
                    };
                }
                FollowerStep::Addresses(Some(snap)) => return Some((snap, st)),
                FollowerStep::Addresses(None) => st.current = None,
            }
        }
    }))
}

fn root_path() -> Result<OwnedObjectPath> {
    OwnedObjectPath::try_from(dbus_names::ROOT_PATH).map_err(|e| ConnectionError::Dbus(e.into()))
}

fn value_str(value: &OwnedValue) -> Option<String> {
    match &**value {
        Value::Str(s) => Some(s.to_string()),
        _ => None,
    }
}

fn value_bytes(value: &OwnedValue) -> Option<Vec<u8>> {
    match &**value {
        Value::Array(arr) => arr
            .iter()
            .map(|v| match v {
                Value::U8(b) => Some(*b),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Decodes the fields of a `GetSettings` reply this crate relies on.
fn decode_profile(
    path: OwnedObjectPath,
    all: &HashMap<String, HashMap<String, OwnedValue>>,
) -> StoredProfile {
    let connection = all.get("connection");
    let field = |key: &str| connection.and_then(|s| s.get(key)).and_then(value_str);

    StoredProfile {
        id: field("id").unwrap_or_default(),
        kind: field("type").unwrap_or_default(),
        interface_name: field("interface-name"),
        ssid: all
            .get(settings::WIRELESS_TYPE)
            .and_then(|s| s.get("ssid"))
            .and_then(value_bytes),
        path,
    }
}

/// Converts `AddressData` entries into CIDR strings.
fn snapshot(family: IpFamily, data: Vec<HashMap<String, OwnedValue>>) -> AddressSnapshot {
    let addresses = data
        .iter()
        .filter_map(|entry| {
            let address = entry.get("address").and_then(value_str)?;
            let prefix = match entry.get("prefix").map(|v| &**v) {
                Some(Value::U32(p)) => *p,
                _ => return Some(address),
            };
            Some(format!("{address}/{prefix}"))
        })
        .collect();

    AddressSnapshot { family, addresses }
}

#[async_trait]
impl NetworkBus for SystemBus {
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.get_devices()
            .await
            .map_err(|e| ConnectionError::DbusOperation {
                context: "failed to get device paths from NetworkManager".to_string(),
                source: e,
            })
    }

    async fn device(&self, device: &OwnedObjectPath) -> Result<DeviceRecord> {
        let proxy = self.device_proxy(device).await?;
        let interface = proxy
            .interface()
            .await
            .map_err(|e| ConnectionError::DbusOperation {
                context: format!("failed to get interface name for device {}", device.as_str()),
                source: e,
            })?;
        let device_type = proxy.device_type().await?;
        let (state, reason) = proxy.state_reason().await?;
        let active_connection = match proxy.active_connection().await {
            Ok(path) => path,
            Err(e) => {
                debug!("No active connection for {interface}: {e}");
                root_path()?
            }
        };

        Ok(DeviceRecord {
            interface,
            device_type,
            state,
            reason,
            active_connection,
        })
    }

    async fn available_connections(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<Vec<OwnedObjectPath>> {
        let proxy = self.device_proxy(device).await?;
        Ok(proxy.available_connections().await?)
    }

    async fn disconnect_device(&self, device: &OwnedObjectPath) -> Result<()> {
        let proxy = self.device_proxy(device).await?;
        Ok(proxy.disconnect().await?)
    }

    async fn list_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        settings
            .list_connections()
            .await
            .map_err(|e| ConnectionError::DbusOperation {
                context: "failed to list saved connections".to_string(),
                source: e,
            })
    }

    async fn connection_settings(&self, connection: &OwnedObjectPath) -> Result<StoredProfile> {
        let proxy = self.settings_connection_proxy(connection).await?;
        let all = proxy.get_settings().await?;
        Ok(decode_profile(connection.clone(), &all))
    }

    async fn add_connection(&self, settings: ConnectionSettings) -> Result<OwnedObjectPath> {
        let proxy = NMSettingsProxy::new(&self.conn).await?;
        Ok(proxy.add_connection(settings).await?)
    }

    async fn update_connection(
        &self,
        connection: &OwnedObjectPath,
        settings: ConnectionSettings,
    ) -> Result<()> {
        let proxy = self.settings_connection_proxy(connection).await?;
        Ok(proxy.update(settings).await?)
    }

    async fn delete_connection(&self, connection: &OwnedObjectPath) -> Result<()> {
        let proxy = self.settings_connection_proxy(connection).await?;
        proxy.delete().await?;
        debug!("Deleted connection: {}", connection.as_str());
        Ok(())
    }

    async fn activate_connection(
        &self,
        connection: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        let nm = NMProxy::new(&self.conn).await?;
        Ok(nm
            .activate_connection(connection.clone(), device.clone(), root_path()?)
            .await?)
    }

    async fn add_and_activate_connection(
        &self,
        settings: ConnectionSettings,
        device: &OwnedObjectPath,
        options: ActivationOptions,
    ) -> Result<OwnedObjectPath> {
        let nm = NMProxy::new(&self.conn).await?;

        let mut opts: HashMap<&str, Value<'_>> = HashMap::new();
        if !options.persist {
            opts.insert(settings::PERSIST_KEY, Value::from(settings::PERSIST_VOLATILE));
        }

        let (_, active, _) = nm
            .add_and_activate_connection2(settings, device.clone(), root_path()?, opts)
            .await?;
        Ok(active)
    }

    async fn request_scan(&self, device: &OwnedObjectPath, ssids: Vec<Vec<u8>>) -> Result<()> {
        let wifi = self.wireless_proxy(device).await?;

        let mut options: HashMap<&str, Value<'_>> = HashMap::new();
        if !ssids.is_empty() {
            options.insert(settings::SCAN_SSIDS_KEY, Value::from(ssids));
        }

        Ok(wifi.request_scan(options).await?)
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        let wifi = self.wireless_proxy(device).await?;
        Ok(wifi.get_all_access_points().await?)
    }

    async fn active_access_point(&self, device: &OwnedObjectPath) -> Result<OwnedObjectPath> {
        let wifi = self.wireless_proxy(device).await?;
        Ok(wifi.active_access_point().await?)
    }

    async fn access_point(&self, access_point: &OwnedObjectPath) -> Result<AccessPointRecord> {
        let ap = NMAccessPointProxy::builder(&self.conn)
            .path(access_point.clone())?
            .build()
            .await?;

        Ok(AccessPointRecord {
            ssid: ap.ssid().await?,
            hw_address: ap.hw_address().await.unwrap_or_default(),
            strength: ap.strength().await?,
            flags: ap.flags().await?,
            wpa_flags: ap.wpa_flags().await?,
            rsn_flags: ap.rsn_flags().await?,
            frequency: ap.frequency().await?,
            max_bitrate: ap.max_bitrate().await.unwrap_or(0),
        })
    }

    async fn device_added(&self) -> Result<SignalStream<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        let signals = nm.receive_device_added().await?;
        Ok(Box::pin(signals.filter_map(|signal| async move {
            match signal.args() {
                Ok(args) => Some(args.device_path),
                Err(e) => {
                    warn!("Failed to parse DeviceAdded signal args: {e}");
                    None
                }
            }
        })))
    }

    async fn device_removed(&self) -> Result<SignalStream<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        let signals = nm.receive_device_removed().await?;
        Ok(Box::pin(signals.filter_map(|signal| async move {
            match signal.args() {
                Ok(args) => Some(args.device_path),
                Err(e) => {
                    warn!("Failed to parse DeviceRemoved signal args: {e}");
                    None
                }
            }
        })))
    }

    async fn primary_connection_changed(&self) -> Result<SignalStream<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        let current = nm.primary_connection().await?;
        let changes = nm.receive_primary_connection_changed().await;
        let updates = changes.filter_map(|change| async move { change.get().await.ok() });
        Ok(Box::pin(stream::once(async move { current }).chain(updates)))
    }

    async fn device_state_changed(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<SignalStream<StateChange>> {
        let proxy = self.device_proxy(device).await?;
        let signals = proxy.receive_device_state_changed().await?;
        Ok(Box::pin(signals.filter_map(|signal| async move {
            match signal.args() {
                Ok(args) => Some(StateChange {
                    new_state: args.new_state,
                    old_state: args.old_state,
                    reason: args.reason,
                }),
                Err(e) => {
                    warn!("Failed to parse StateChanged signal args: {e}");
                    None
                }
            }
        })))
    }

    async fn last_scan_changed(&self, device: &OwnedObjectPath) -> Result<SignalStream<i64>> {
        let wifi = self.wireless_proxy(device).await?;
        let current = wifi.last_scan().await?;
        let changes = wifi.receive_last_scan_changed().await;
        let updates = changes.filter_map(|change| async move { change.get().await.ok() });
        Ok(Box::pin(stream::once(async move { current }).chain(updates)))
    }

    async fn connection_added(&self) -> Result<SignalStream<OwnedObjectPath>> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let signals = settings.receive_new_connection().await?;
        Ok(Box::pin(signals.filter_map(|signal| async move {
            signal.args().ok().map(|args| args.connection)
        })))
    }

    async fn connection_removed(&self) -> Result<SignalStream<OwnedObjectPath>> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let signals = settings.receive_connection_removed().await?;
        Ok(Box::pin(signals.filter_map(|signal| async move {
            signal.args().ok().map(|args| args.connection)
        })))
    }

    async fn address_changed(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<SignalStream<AddressSnapshot>> {
        let proxy = self.device_proxy(device).await?;

        let ip4 = proxy.ip4_config().await?;
        let ip4_changes = proxy.receive_ip4_config_changed().await;
        let ip4_configs = stream::once(async move { ip4 })
            .chain(ip4_changes.filter_map(|change| async move { change.get().await.ok() }));

        let ip6 = proxy.ip6_config().await?;
        let ip6_changes = proxy.receive_ip6_config_changed().await;
        let ip6_configs = stream::once(async move { ip6 })
            .chain(ip6_changes.filter_map(|change| async move { change.get().await.ok() }));

        let v4 = follow_addresses(AddressFollower {
            conn: self.conn.clone(),
            family: IpFamily::V4,
            configs: Box::pin(ip4_configs),
            current: None,
        });
        let v6 = follow_addresses(AddressFollower {
            conn: self.conn.clone(),
            family: IpFamily::V6,
            configs: Box::pin(ip6_configs),
            current: None,
        });

        Ok(Box::pin(stream::select(v4, v6)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(value: Value<'static>) -> OwnedValue {
        OwnedValue::try_from(value).unwrap()
    }

    #[test]
    fn decodes_wireless_profile() {
        let mut connection = HashMap::new();
        connection.insert("id".to_string(), owned(Value::from("HomeNet")));
        connection.insert("type".to_string(), owned(Value::from("802-11-wireless")));
        connection.insert("interface-name".to_string(), owned(Value::from("wlan0")));

        let mut wireless = HashMap::new();
        wireless.insert("ssid".to_string(), owned(Value::from(b"HomeNet".to_vec())));

        let mut all = HashMap::new();
        all.insert("connection".to_string(), connection);
        all.insert("802-11-wireless".to_string(), wireless);

        let path = OwnedObjectPath::try_from("/org/freedesktop/NetworkManager/Settings/1").unwrap();
        let profile = decode_profile(path.clone(), &all);

        assert_eq!(profile.path, path);
        assert_eq!(profile.id, "HomeNet");
        assert_eq!(profile.kind, "802-11-wireless");
        assert_eq!(profile.interface_name.as_deref(), Some("wlan0"));
        assert_eq!(profile.ssid.as_deref(), Some(&b"HomeNet"[..]));
    }

    #[test]
    fn decodes_profile_without_wireless_section() {
        let mut connection = HashMap::new();
        connection.insert("id".to_string(), owned(Value::from("Wired")));
        connection.insert("type".to_string(), owned(Value::from("802-3-ethernet")));

        let mut all = HashMap::new();
        all.insert("connection".to_string(), connection);

        let path = OwnedObjectPath::try_from("/org/freedesktop/NetworkManager/Settings/2").unwrap();
        let profile = decode_profile(path, &all);

        assert_eq!(profile.kind, "802-3-ethernet");
        assert_eq!(profile.ssid, None);
        assert_eq!(profile.interface_name, None);
    }

    #[test]
    fn snapshot_formats_cidr() {
        let mut entry = HashMap::new();
        entry.insert("address".to_string(), owned(Value::from("192.168.1.20")));
        entry.insert("prefix".to_string(), owned(Value::from(24u32)));

        let snap = snapshot(IpFamily::V4, vec![entry]);
        assert_eq!(snap.family, IpFamily::V4);
        assert_eq!(snap.addresses, vec!["192.168.1.20/24".to_string()]);
    }
}
