use crate::infrastructure::{Lookup, TtlCache};
use crate::keeper::ConnectionKeeper;
use crate::remote::RemoteSession;
use crate::types::{KeeperError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Management operations against the local node.
///
/// Management APIs move between node versions; implementations of this trait
/// let callers swap backends without touching call sites.
#[async_trait]
pub trait NodeInteraction: Send + Sync {
    /// The node's host id (e.g. `43262282-a8a9-486a-9b90-1f83e7605129`)
    async fn local_host_id(&self) -> Result<String>;

    /// Human readable local load (disk usage)
    async fn local_load(&self) -> Result<String>;

    async fn cluster_name(&self) -> Result<String>;

    /// Starts a compaction. An empty `tables` slice means every table.
    async fn trigger_compaction(&self, keyspace: &str, tables: &[&str]) -> Result<()>;

    /// Starts a cleanup with `jobs` parallel jobs (0 lets the node decide)
    async fn trigger_cleanup(&self, jobs: u32, keyspace: &str, tables: &[&str]) -> Result<()>;

    async fn trigger_flush(&self, keyspace: &str, tables: &[&str]) -> Result<()>;

    /// Whether the connection is believed usable. With `use_cache` the answer
    /// may be up to one cache ttl old.
    async fn is_connection_alive(&self, use_cache: bool) -> bool;

    /// Start background connecting and monitoring
    async fn connect_async(&self);

    /// Connect now; true if it succeeded
    async fn connect_sync(&self) -> bool;
}

/// [`NodeInteraction`] backed by a [`ConnectionKeeper`].
///
/// Every call is gated on [`ConnectionKeeper::ensure_connected`] with the
/// cache enabled and fails fast with [`KeeperError::NotConnected`] when the
/// gate is closed. Remote failures after the gate are reported as
/// [`KeeperError::Operation`] and are not retried here.
pub struct KeeperInteraction {
    keeper: Arc<ConnectionKeeper>,
    host_id: TtlCache<String>,
}

impl KeeperInteraction {
    pub fn new(keeper: Arc<ConnectionKeeper>) -> Self {
        let ttl = keeper.options().cache_ttl();
        Self {
            keeper,
            host_id: TtlCache::new(ttl),
        }
    }

    /// Number of peers the node's failure detector currently considers down
    pub async fn down_endpoint_count(&self) -> Result<u32> {
        let session = self.gate().await?;
        session
            .failure_detector
            .down_endpoint_count()
            .await
            .map_err(|e| KeeperError::operation("down_endpoint_count", e))
    }

    async fn gate(&self) -> Result<Arc<RemoteSession>> {
        if !self.keeper.ensure_connected(true).await {
            return Err(KeeperError::NotConnected);
        }
        self.keeper.session().await.ok_or(KeeperError::NotConnected)
    }
}

fn require_keyspace(keyspace: &str) -> Result<()> {
    if keyspace.trim().is_empty() {
        return Err(KeeperError::Configuration(
            "Keyspace must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl NodeInteraction for KeeperInteraction {
    async fn local_host_id(&self) -> Result<String> {
        let session = self.gate().await?;

        // Polled constantly and practically never changes
        let lookup = self
            .host_id
            .get(true, || async { session.storage.local_host_id().await })
            .await;

        match lookup {
            Lookup::Cached(id) | Lookup::Refreshed(id) => Ok(id),
            Lookup::Failed {
                previous: Some(id),
                error,
            } => {
                tracing::warn!("Host id refresh failed, serving cached value: {}", error);
                Ok(id)
            }
            Lookup::Failed {
                previous: None,
                error,
            } => Err(KeeperError::operation("local_host_id", error)),
        }
    }

    async fn local_load(&self) -> Result<String> {
        let session = self.gate().await?;
        session
            .storage
            .load_string()
            .await
            .map_err(|e| KeeperError::operation("local_load", e))
    }

    async fn cluster_name(&self) -> Result<String> {
        let session = self.gate().await?;
        session
            .storage
            .cluster_name()
            .await
            .map_err(|e| KeeperError::operation("cluster_name", e))
    }

    async fn trigger_compaction(&self, keyspace: &str, tables: &[&str]) -> Result<()> {
        require_keyspace(keyspace)?;
        let session = self.gate().await?;
        tracing::info!("Triggering compaction of {} {:?}", keyspace, tables);
        session
            .compaction
            .force_keyspace_compaction(keyspace, tables)
            .await
            .map_err(|e| KeeperError::operation("trigger_compaction", e))
    }

    async fn trigger_cleanup(&self, jobs: u32, keyspace: &str, tables: &[&str]) -> Result<()> {
        require_keyspace(keyspace)?;
        let session = self.gate().await?;
        tracing::info!("Triggering cleanup of {} {:?} with {} jobs", keyspace, tables, jobs);
        session
            .storage
            .force_keyspace_cleanup(jobs, keyspace, tables)
            .await
            .map_err(|e| KeeperError::operation("trigger_cleanup", e))
    }

    async fn trigger_flush(&self, keyspace: &str, tables: &[&str]) -> Result<()> {
        require_keyspace(keyspace)?;
        let session = self.gate().await?;
        tracing::info!("Triggering flush of {} {:?}", keyspace, tables);
        session
            .storage
            .force_keyspace_flush(keyspace, tables)
            .await
            .map_err(|e| KeeperError::operation("trigger_flush", e))
    }

    async fn is_connection_alive(&self, use_cache: bool) -> bool {
        self.keeper.is_alive(use_cache).await
    }

    async fn connect_async(&self) {
        self.keeper.connect_async().await;
    }

    async fn connect_sync(&self) -> bool {
        self.keeper.connect_sync().await
    }
}
