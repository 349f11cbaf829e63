//! # Node Keeper
//!
//! A lazily-established, self-healing connection to a node's remote
//! management endpoint, with cached health and identity lookups and a small
//! set of fire-and-forget management operations.
//!
//! The wire protocol is not implemented here: plug one in through
//! [`RemoteConnector`].
//!
//! ## Example
//!
//! ```no_run
//! use node_keeper::{ConnectionKeeper, KeeperInteraction, KeeperOptions, NodeInteraction, RemoteConnector};
//! use std::sync::Arc;
//!
//! # async fn example(connector: Arc<dyn RemoteConnector>) -> Result<(), Box<dyn std::error::Error>> {
//! let keeper = ConnectionKeeper::new(
//!     KeeperOptions {
//!         jmx_host: "127.0.0.1".to_string(),
//!         jmx_port: 7100,
//!         ..Default::default()
//!     },
//!     connector,
//! )?;
//!
//! let node = KeeperInteraction::new(keeper);
//! node.connect_async().await;
//!
//! let _host_id = node.local_host_id().await?;
//! node.trigger_flush("system_auth", &[]).await?;
//! # Ok(())
//! # }
//! ```

pub mod infrastructure;
pub mod interaction;
pub mod keeper;
pub mod remote;
pub mod types;

pub use infrastructure::{Lookup, TtlCache};
pub use interaction::{KeeperInteraction, NodeInteraction};
pub use keeper::{
    ConnectionKeeper, ConnectionKeeperBuilder, ConnectionState, KeeperOptions, KeeperStats,
};
pub use remote::{
    CompactionManagerProxy, Credentials, FailureDetectorProxy, ObjectName, RemoteConnector,
    RemoteHandle, RemoteTarget, StorageServiceProxy,
};
pub use types::{KeeperError, Result};
