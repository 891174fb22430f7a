//! Real-time monitoring of device, connection and scan signals.

pub(crate) mod event_monitor;
pub(crate) mod listener;

pub use event_monitor::EventMonitor;
pub use listener::EventListener;
