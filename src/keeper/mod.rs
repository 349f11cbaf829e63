// Module declarations
mod builder;
mod connection;
#[allow(clippy::module_inception)]
mod keeper;
mod state;

// Public API exports
pub use builder::{ConnectionKeeperBuilder, KeeperOptions, ObjectNameOptions};
pub use connection::ConnectionState;
pub(crate) use connection::ConnectionSlot;
pub use keeper::ConnectionKeeper;
pub use state::KeeperStats;
pub(crate) use state::KeeperState;
