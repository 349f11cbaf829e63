use super::{ObjectName, RemoteTarget};
use crate::types::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Credentials passed through to the connector untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Factory for sessions to the remote management endpoint.
#[async_trait]
pub trait RemoteConnector: Send + Sync + 'static {
    async fn connect(
        &self,
        target: &RemoteTarget,
        credentials: Option<&Credentials>,
    ) -> Result<Box<dyn RemoteHandle>>;
}

/// One open session to the remote endpoint.
#[async_trait]
pub trait RemoteHandle: Send + Sync {
    /// Cheap identifier of the session, used only to infer liveness
    async fn connection_id(&self) -> Result<String>;

    async fn storage_service(&self, name: &ObjectName) -> Result<Arc<dyn StorageServiceProxy>>;

    async fn compaction_manager(
        &self,
        name: &ObjectName,
    ) -> Result<Arc<dyn CompactionManagerProxy>>;

    async fn failure_detector(&self, name: &ObjectName) -> Result<Arc<dyn FailureDetectorProxy>>;

    async fn close(&self) -> Result<()>;
}

/// Node identity and storage operations.
///
/// An empty `tables` slice means "all tables"; interpretation is left to the remote side.
#[async_trait]
pub trait StorageServiceProxy: Send + Sync {
    async fn local_host_id(&self) -> Result<String>;
    async fn load_string(&self) -> Result<String>;
    async fn cluster_name(&self) -> Result<String>;
    async fn force_keyspace_cleanup(&self, jobs: u32, keyspace: &str, tables: &[&str])
    -> Result<()>;
    async fn force_keyspace_flush(&self, keyspace: &str, tables: &[&str]) -> Result<()>;
}

#[async_trait]
pub trait CompactionManagerProxy: Send + Sync {
    async fn force_keyspace_compaction(&self, keyspace: &str, tables: &[&str]) -> Result<()>;
}

#[async_trait]
pub trait FailureDetectorProxy: Send + Sync {
    async fn down_endpoint_count(&self) -> Result<u32>;
}

/// A handle plus the proxies obtained through it in one connect attempt.
pub struct RemoteSession {
    pub(crate) handle: Box<dyn RemoteHandle>,
    pub(crate) storage: Arc<dyn StorageServiceProxy>,
    pub(crate) compaction: Arc<dyn CompactionManagerProxy>,
    pub(crate) failure_detector: Arc<dyn FailureDetectorProxy>,
    pub(crate) target: RemoteTarget,
}

impl RemoteSession {
    /// Resolve all proxies through `handle`. On failure the handle is closed
    /// before the error is returned.
    pub async fn open(
        handle: Box<dyn RemoteHandle>,
        target: RemoteTarget,
        names: &SessionObjectNames,
    ) -> Result<Self> {
        let proxies = async {
            let storage = handle.storage_service(&names.storage_service).await?;
            let compaction = handle.compaction_manager(&names.compaction_manager).await?;
            let failure_detector = handle.failure_detector(&names.failure_detector).await?;
            Ok::<_, crate::types::KeeperError>((storage, compaction, failure_detector))
        }
        .await;

        match proxies {
            Ok((storage, compaction, failure_detector)) => Ok(Self {
                handle,
                storage,
                compaction,
                failure_detector,
                target,
            }),
            Err(e) => {
                if let Err(close_err) = handle.close().await {
                    tracing::warn!(
                        "Failed to close half-open session to {}: {}",
                        target,
                        close_err
                    );
                }
                Err(e)
            }
        }
    }

    pub fn target(&self) -> &RemoteTarget {
        &self.target
    }

    pub async fn connection_id(&self) -> Result<String> {
        self.handle.connection_id().await
    }

    pub async fn close(&self) -> Result<()> {
        self.handle.close().await
    }
}

/// Object names parsed for a single connect attempt.
#[derive(Debug, Clone)]
pub struct SessionObjectNames {
    pub storage_service: ObjectName,
    pub compaction_manager: ObjectName,
    pub failure_detector: ObjectName,
}
