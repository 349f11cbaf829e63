// Infrastructure module - background services and caching primitives
pub mod cache;
pub(crate) mod monitor;
pub(crate) mod task_slot;

pub use cache::{Lookup, TtlCache};
pub(crate) use monitor::{MonitorTarget, ReconnectionMonitor};
pub(crate) use task_slot::TaskSlot;
