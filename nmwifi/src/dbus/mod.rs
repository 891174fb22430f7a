//! D-Bus access to NetworkManager.
//!
//! The proxy definitions are private; the rest of the crate talks to the
//! daemon through the [`NetworkBus`] trait.

mod access_point;
mod bus;
mod device;
mod ip_config;
mod main_nm;
mod settings;
mod system_bus;
mod wireless;

pub(crate) use access_point::NMAccessPointProxy;
pub(crate) use device::NMDeviceProxy;
pub(crate) use ip_config::{NMIp4ConfigProxy, NMIp6ConfigProxy};
pub(crate) use main_nm::NMProxy;
pub(crate) use settings::{NMSettingsConnectionProxy, NMSettingsProxy};
pub(crate) use wireless::NMWirelessProxy;

pub use bus::{
    AccessPointRecord, ActivationOptions, AddressSnapshot, DeviceRecord, IpFamily, NetworkBus,
    SignalStream, StateChange, StoredProfile,
};
pub use system_bus::SystemBus;
