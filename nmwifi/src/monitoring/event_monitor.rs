//! Background monitoring of NetworkManager signals.
//!
//! [`EventMonitor`] owns one OS thread running a single-threaded tokio
//! runtime. All subscriptions are merged into one stream and handled
//! serially; handlers translate raw signals into [`EventListener`] calls.

use futures::stream::{self, SelectAll, StreamExt};
use log::{debug, error, info, warn};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use zvariant::OwnedObjectPath;

use super::listener::EventListener;
use crate::api::config::InterfaceConfig;
use crate::api::models::{
    ConnectionError, DeviceState, InterfaceState, IpAddressChange, StateReason,
};
use crate::core::access_point::decode_all;
use crate::core::state::{normalize, normalize_interface};
use crate::dbus::{AddressSnapshot, IpFamily, NetworkBus, SignalStream, StateChange};
use crate::Result;

const THREAD_NAME: &str = "nmwifi-monitor";

/// One item of the merged signal stream.
#[derive(Debug)]
enum BusEvent {
    DeviceAdded(OwnedObjectPath),
    DeviceRemoved(OwnedObjectPath),
    PrimaryConnection(OwnedObjectPath),
    ConnectionAdded(OwnedObjectPath),
    ConnectionRemoved(OwnedObjectPath),
    StateChanged(OwnedObjectPath, StateChange),
    LastScan(OwnedObjectPath, i64),
    Addresses(OwnedObjectPath, AddressSnapshot),
}

type EventStream = SelectAll<SignalStream<BusEvent>>;

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Watches the configured interfaces and reports changes to a listener.
///
/// Created with [`WifiManager::event_monitor`](crate::WifiManager::event_monitor).
/// The monitor is stopped on drop.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use nmwifi::{EventListener, WifiManager, WifiState};
///
/// struct Log;
/// impl EventListener for Log {
///     fn on_wifi_state_changed(&self, state: WifiState) {
///         println!("{state}");
///     }
/// }
///
/// # async fn example() -> nmwifi::Result<()> {
/// let manager = WifiManager::new().await?;
/// let mut monitor = manager.event_monitor(Arc::new(Log));
/// monitor.start()?;
/// // ...
/// monitor.stop();
/// # Ok(())
/// # }
/// ```
pub struct EventMonitor {
    bus: Arc<dyn NetworkBus>,
    config: InterfaceConfig,
    listener: Arc<dyn EventListener>,
    scan_notify: Arc<AtomicBool>,
    running: Option<Running>,
}

impl EventMonitor {
    pub(crate) fn new(
        bus: Arc<dyn NetworkBus>,
        config: InterfaceConfig,
        listener: Arc<dyn EventListener>,
        scan_notify: Arc<AtomicBool>,
    ) -> Self {
        Self {
            bus,
            config,
            listener,
            scan_notify,
            running: None,
        }
    }

    /// Returns `true` between a successful [`start`](Self::start) and
    /// [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Spawns the monitor thread and subscribes to all signals.
    ///
    /// Returns once the NetworkManager subscriptions are in place. If one of
    /// them fails the thread exits and the error is returned; nothing is
    /// retried. Settings signals and initial device enumeration are optional:
    /// their failures are logged and the monitor runs without them.
    /// Calling `start` on a running monitor does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            debug!("Event monitor already running");
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let mut dispatcher = Dispatcher::new(
            Arc::clone(&self.bus),
            self.config.clone(),
            Arc::clone(&self.listener),
            Arc::clone(&self.scan_notify),
        );
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = ready_tx.send(Err(ConnectionError::MonitorFailed(format!(
                            "failed to build runtime: {e}"
                        ))));
                        return;
                    }
                };

                runtime.block_on(async move {
                    let events = match dispatcher.subscribe().await {
                        Ok(events) => events,
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };
                    let _ = ready_tx.send(Ok(()));
                    dispatcher.run(events, token).await;
                });
            })
            .map_err(|e| ConnectionError::MonitorFailed(format!("failed to spawn thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("Event monitor running");
                self.running = Some(Running { cancel, handle });
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Event monitor failed to start: {e}");
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(ConnectionError::MonitorFailed(
                    "monitor thread exited during startup".into(),
                ))
            }
        }
    }

    /// Stops the run loop and joins the monitor thread.
    ///
    /// No listener hook runs after this returns. Stopping a monitor that is
    /// not running does nothing.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        running.cancel.cancel();
        if running.handle.join().is_err() {
            error!("Event monitor thread panicked");
        } else {
            info!("Event monitor stopped");
        }
    }
}

impl Drop for EventMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State owned by the monitor thread.
struct Dispatcher {
    bus: Arc<dyn NetworkBus>,
    config: InterfaceConfig,
    listener: Arc<dyn EventListener>,
    scan_notify: Arc<AtomicBool>,
    /// Monitored devices by path. Removed devices are no longer on the bus,
    /// so their names are remembered here.
    devices: HashMap<OwnedObjectPath, String>,
    /// Ends the per-device streams of a device once it is removed.
    watches: HashMap<OwnedObjectPath, CancellationToken>,
    last_scan: HashMap<OwnedObjectPath, i64>,
    primary: Option<OwnedObjectPath>,
    addresses: HashMap<(String, IpFamily), BTreeSet<String>>,
}

fn tagged<T, F>(stream: SignalStream<T>, tag: F) -> SignalStream<BusEvent>
where
    T: 'static,
    F: Fn(T) -> BusEvent + Send + 'static,
{
    Box::pin(stream.map(tag))
}

fn until_cancelled<T: 'static>(
    stream: SignalStream<T>,
    token: &CancellationToken,
) -> SignalStream<T> {
    Box::pin(stream.take_until(token.clone().cancelled_owned()))
}

impl Dispatcher {
    fn new(
        bus: Arc<dyn NetworkBus>,
        config: InterfaceConfig,
        listener: Arc<dyn EventListener>,
        scan_notify: Arc<AtomicBool>,
    ) -> Self {
        Self {
            bus,
            config,
            listener,
            scan_notify,
            devices: HashMap::new(),
            watches: HashMap::new(),
            last_scan: HashMap::new(),
            primary: None,
            addresses: HashMap::new(),
        }
    }

    /// Subscribes to the top-level signals and to every monitored device.
    async fn subscribe(&mut self) -> Result<EventStream> {
        let bus = Arc::clone(&self.bus);
        let mut events = stream::select_all(vec![
            tagged(bus.device_added().await?, BusEvent::DeviceAdded),
            tagged(bus.device_removed().await?, BusEvent::DeviceRemoved),
            tagged(bus.primary_connection_changed().await?, BusEvent::PrimaryConnection),
        ]);
        debug!("Subscribed to NetworkManager signals");

        match bus.connection_added().await {
            Ok(s) => events.push(tagged(s, BusEvent::ConnectionAdded)),
            Err(e) => warn!("Not watching added connections: {e}"),
        }
        match bus.connection_removed().await {
            Ok(s) => events.push(tagged(s, BusEvent::ConnectionRemoved)),
            Err(e) => warn!("Not watching removed connections: {e}"),
        }

        let paths = bus.devices().await.unwrap_or_else(|e| {
            warn!("Failed to list devices, waiting for them to be added: {e}");
            Vec::new()
        });

        for path in paths {
            let record = match bus.device(&path).await {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping device {}: {e}", path.as_str());
                    continue;
                }
            };

            if self.config.is_monitored(&record.interface) {
                self.watch_device(&mut events, path, record.interface).await;
            }
        }

        debug!("Monitoring {} signal streams", events.len());
        Ok(events)
    }

    /// Adds the per-device subscriptions. Failures are logged; the device is
    /// still tracked so removal is reported.
    async fn watch_device(&mut self, events: &mut EventStream, path: OwnedObjectPath, name: String) {
        let token = CancellationToken::new();

        match self.bus.device_state_changed(&path).await {
            Ok(s) => {
                let p = path.clone();
                let s = until_cancelled(s, &token);
                events.push(tagged(s, move |change| BusEvent::StateChanged(p.clone(), change)));
            }
            Err(e) => warn!("Failed to watch state of {name}: {e}"),
        }

        match self.bus.address_changed(&path).await {
            Ok(s) => {
                let p = path.clone();
                let s = until_cancelled(s, &token);
                events.push(tagged(s, move |snap| BusEvent::Addresses(p.clone(), snap)));
            }
            Err(e) => warn!("Failed to watch addresses of {name}: {e}"),
        }

        if self.config.is_wifi(&name) {
            match self.bus.last_scan_changed(&path).await {
                Ok(s) => {
                    let p = path.clone();
                    let s = until_cancelled(s, &token);
                    events.push(tagged(s, move |ts| BusEvent::LastScan(p.clone(), ts)));
                }
                Err(e) => warn!("Failed to watch scans on {name}: {e}"),
            }
        }

        debug!("Watching {name} at {}", path.as_str());
        if let Some(stale) = self.watches.insert(path.clone(), token) {
            stale.cancel();
        }
        self.devices.insert(path, name);
    }

    async fn run(&mut self, mut events: EventStream, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                next = events.next() => match next {
                    Some(event) => self.handle(event, &mut events).await,
                    None => {
                        warn!("All monitor streams ended");
                        cancel.cancelled().await;
                        break;
                    }
                },
            }
        }
        debug!("Event monitor loop exited");
    }

    async fn handle(&mut self, event: BusEvent, events: &mut EventStream) {
        match event {
            BusEvent::DeviceAdded(path) => self.on_device_added(path, events).await,
            BusEvent::DeviceRemoved(path) => self.on_device_removed(&path),
            BusEvent::PrimaryConnection(path) => {
                if self.primary.as_ref() != Some(&path) {
                    info!("Primary connection is now {}", path.as_str());
                    self.primary = Some(path);
                }
            }
            BusEvent::ConnectionAdded(path) => info!("Connection added: {}", path.as_str()),
            BusEvent::ConnectionRemoved(path) => info!("Connection removed: {}", path.as_str()),
            BusEvent::StateChanged(path, change) => self.on_state_changed(&path, change),
            BusEvent::LastScan(path, ts) => self.on_last_scan(path, ts).await,
            BusEvent::Addresses(path, snap) => self.on_addresses(&path, snap),
        }
    }

    async fn on_device_added(&mut self, path: OwnedObjectPath, events: &mut EventStream) {
        if self.devices.contains_key(&path) {
            return;
        }

        let record = match self.bus.device(&path).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to read added device {}: {e}", path.as_str());
                return;
            }
        };

        if !self.config.is_monitored(&record.interface) {
            debug!("Ignoring added device {}", record.interface);
            return;
        }

        self.listener
            .on_interface_state_changed(&record.interface, InterfaceState::Added);
        self.watch_device(events, path, record.interface).await;
    }

    fn on_device_removed(&mut self, path: &OwnedObjectPath) {
        let Some(name) = self.devices.remove(path) else {
            return;
        };
        if let Some(token) = self.watches.remove(path) {
            token.cancel();
        }

        self.last_scan.remove(path);
        self.addresses.retain(|(iface, _), _| *iface != name);
        self.listener
            .on_interface_state_changed(&name, InterfaceState::Removed);
    }

    fn on_state_changed(&self, path: &OwnedObjectPath, change: StateChange) {
        let Some(name) = self.devices.get(path) else {
            return;
        };

        let state = DeviceState::from(change.new_state);
        let reason = StateReason::from(change.reason);
        debug!(
            "{name}: {} -> {state} ({reason})",
            DeviceState::from(change.old_state)
        );

        if let Some(iface_state) = normalize_interface(state) {
            self.listener.on_interface_state_changed(name, iface_state);
        }

        if self.config.is_wifi(name) {
            self.listener.on_wifi_state_changed(normalize(state, reason));
        }
    }

    /// `LastScan` moving forward means a scan finished. The first value seen
    /// for a device is its baseline.
    async fn on_last_scan(&mut self, path: OwnedObjectPath, ts: i64) {
        if !self.devices.contains_key(&path) {
            return;
        }

        match self.last_scan.insert(path.clone(), ts) {
            None => return,
            Some(prev) if prev == ts => return,
            Some(_) => {}
        }

        if !self.scan_notify.load(Ordering::SeqCst) {
            debug!("Scan finished on {}, notification disabled", path.as_str());
            return;
        }

        match self.bus.access_points(&path).await {
            Ok(paths) => {
                let networks = decode_all(self.bus.as_ref(), &paths).await;
                debug!("Scan finished: {} network(s)", networks.len());
                self.listener.on_available_ssids_changed(&networks);
            }
            Err(e) => warn!("Failed to list access points after scan: {e}"),
        }
    }

    /// Reports the difference to the previous address set of the same
    /// interface and family. The first snapshot is the baseline.
    fn on_addresses(&mut self, path: &OwnedObjectPath, snap: AddressSnapshot) {
        let Some(name) = self.devices.get(path) else {
            return;
        };

        let ipv6 = snap.family == IpFamily::V6;
        let current: BTreeSet<String> = snap.addresses.into_iter().collect();
        let Some(previous) = self
            .addresses
            .insert((name.clone(), snap.family), current.clone())
        else {
            return;
        };

        for address in previous.difference(&current) {
            self.listener.on_ip_address_changed(&IpAddressChange {
                interface: name.clone(),
                address: address.clone(),
                ipv6,
                acquired: false,
            });
        }
        for address in current.difference(&previous) {
            self.listener.on_ip_address_changed(&IpAddressChange {
                interface: name.clone(),
                address: address.clone(),
                ipv6,
                acquired: true,
            });
        }
    }
}
