//! Scripted connector used by the unit tests.

use super::{
    CompactionManagerProxy, Credentials, FailureDetectorProxy, ObjectName, RemoteConnector,
    RemoteHandle, RemoteTarget, StorageServiceProxy,
};
use crate::types::{KeeperError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub(crate) struct MockRemote {
    pub unreachable: AtomicBool,
    pub fail_proxies: AtomicBool,
    pub fail_liveness: AtomicBool,
    pub fail_host_id: AtomicBool,
    pub fail_triggers: AtomicBool,
    pub connect_delay_ms: AtomicUsize,
    pub liveness_delay_ms: AtomicUsize,

    pub connects: AtomicUsize,
    pub open_handles: AtomicUsize,
    pub max_open_handles: AtomicUsize,
    pub liveness_calls: AtomicUsize,
    pub liveness_completed: AtomicUsize,
    pub host_id_calls: AtomicUsize,

    pub connection_id: Mutex<String>,
    pub host_id: Mutex<String>,
    pub targets: Mutex<Vec<String>>,
    pub credentials: Mutex<Vec<Option<Credentials>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        let remote = Self::default();
        *remote.connection_id.lock().unwrap() = "conn-1".to_string();
        *remote.host_id.lock().unwrap() = "43262282-a8a9-486a-9b90-1f83e7605129".to_string();
        Arc::new(remote)
    }

    pub fn set_connection_id(&self, id: &str) {
        *self.connection_id.lock().unwrap() = id.to_string();
    }

    pub fn set_host_id(&self, id: &str) {
        *self.host_id.lock().unwrap() = id.to_string();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        if self.fail_triggers.load(Ordering::SeqCst) {
            return Err(KeeperError::Transport("connection reset".to_string()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

pub(crate) struct MockConnector {
    pub remote: Arc<MockRemote>,
}

impl MockConnector {
    pub fn new(remote: &Arc<MockRemote>) -> Arc<Self> {
        Arc::new(Self {
            remote: Arc::clone(remote),
        })
    }
}

#[async_trait]
impl RemoteConnector for MockConnector {
    async fn connect(
        &self,
        target: &RemoteTarget,
        credentials: Option<&Credentials>,
    ) -> Result<Box<dyn RemoteHandle>> {
        let remote = &self.remote;
        remote.connects.fetch_add(1, Ordering::SeqCst);
        remote.targets.lock().unwrap().push(target.service_url());
        remote.credentials.lock().unwrap().push(credentials.cloned());

        let delay = remote.connect_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        if remote.unreachable.load(Ordering::SeqCst) {
            return Err(KeeperError::Transport(format!(
                "Connection refused to {}",
                target
            )));
        }

        let open = remote.open_handles.fetch_add(1, Ordering::SeqCst) + 1;
        remote.max_open_handles.fetch_max(open, Ordering::SeqCst);

        Ok(Box::new(MockHandle {
            remote: Arc::clone(remote),
            closed: AtomicBool::new(false),
        }))
    }
}

struct MockHandle {
    remote: Arc<MockRemote>,
    closed: AtomicBool,
}

#[async_trait]
impl RemoteHandle for MockHandle {
    async fn connection_id(&self) -> Result<String> {
        let remote = &self.remote;
        remote.liveness_calls.fetch_add(1, Ordering::SeqCst);

        let delay = remote.liveness_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        remote.liveness_completed.fetch_add(1, Ordering::SeqCst);

        if self.closed.load(Ordering::SeqCst) || remote.fail_liveness.load(Ordering::SeqCst) {
            return Err(KeeperError::Io(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        Ok(remote.connection_id.lock().unwrap().clone())
    }

    async fn storage_service(&self, _name: &ObjectName) -> Result<Arc<dyn StorageServiceProxy>> {
        if self.remote.fail_proxies.load(Ordering::SeqCst) {
            return Err(KeeperError::Transport("instance not found".to_string()));
        }
        Ok(Arc::new(MockProxy {
            remote: Arc::clone(&self.remote),
        }))
    }

    async fn compaction_manager(
        &self,
        _name: &ObjectName,
    ) -> Result<Arc<dyn CompactionManagerProxy>> {
        Ok(Arc::new(MockProxy {
            remote: Arc::clone(&self.remote),
        }))
    }

    async fn failure_detector(&self, _name: &ObjectName) -> Result<Arc<dyn FailureDetectorProxy>> {
        Ok(Arc::new(MockProxy {
            remote: Arc::clone(&self.remote),
        }))
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.remote.open_handles.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

struct MockProxy {
    remote: Arc<MockRemote>,
}

#[async_trait]
impl StorageServiceProxy for MockProxy {
    async fn local_host_id(&self) -> Result<String> {
        self.remote.host_id_calls.fetch_add(1, Ordering::SeqCst);
        if self.remote.fail_host_id.load(Ordering::SeqCst) {
            return Err(KeeperError::Transport("read timed out".to_string()));
        }
        Ok(self.remote.host_id.lock().unwrap().clone())
    }

    async fn load_string(&self) -> Result<String> {
        Ok("1.21 GiB".to_string())
    }

    async fn cluster_name(&self) -> Result<String> {
        Ok("Test Cluster".to_string())
    }

    async fn force_keyspace_cleanup(
        &self,
        jobs: u32,
        keyspace: &str,
        tables: &[&str],
    ) -> Result<()> {
        self.remote
            .record(format!("cleanup jobs={} {} [{}]", jobs, keyspace, tables.join(",")))
    }

    async fn force_keyspace_flush(&self, keyspace: &str, tables: &[&str]) -> Result<()> {
        self.remote
            .record(format!("flush {} [{}]", keyspace, tables.join(",")))
    }
}

#[async_trait]
impl CompactionManagerProxy for MockProxy {
    async fn force_keyspace_compaction(&self, keyspace: &str, tables: &[&str]) -> Result<()> {
        self.remote
            .record(format!("compaction {} [{}]", keyspace, tables.join(",")))
    }
}

#[async_trait]
impl FailureDetectorProxy for MockProxy {
    async fn down_endpoint_count(&self) -> Result<u32> {
        Ok(0)
    }
}
