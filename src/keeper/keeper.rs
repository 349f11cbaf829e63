use super::{
    ConnectionKeeperBuilder, ConnectionSlot, ConnectionState, KeeperOptions, KeeperState,
    KeeperStats,
};
use crate::infrastructure::{Lookup, MonitorTarget, ReconnectionMonitor, TtlCache};
use crate::remote::{RemoteConnector, RemoteSession, RemoteTarget};
use crate::types::{KeeperError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

/// Keeps one lazily-established, self-healing connection to a remote
/// management endpoint.
///
/// Nothing touches the network until the first connect or liveness call.
/// Connect attempts are serialized behind a single lock, which is also the
/// lock used to (re)schedule the background reconnection monitor.
///
/// Dropping the keeper does not close the remote session; call
/// [`shutdown`](Self::shutdown) first.
///
/// # Example
///
/// ```no_run
/// use node_keeper::{ConnectionKeeper, KeeperOptions, RemoteConnector};
/// use std::sync::Arc;
///
/// # async fn example(connector: Arc<dyn RemoteConnector>) -> Result<(), Box<dyn std::error::Error>> {
/// let keeper = ConnectionKeeper::new(KeeperOptions::default(), connector)?;
///
/// // Start background connection management without waiting on the network
/// keeper.connect_async().await;
///
/// if keeper.ensure_connected(true).await {
///     // safe to issue remote calls
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConnectionKeeper {
    this: Weak<ConnectionKeeper>,
    options: KeeperOptions,
    connector: Arc<dyn RemoteConnector>,

    // Current session and its state
    connection: ConnectionSlot,

    // Last connection identifier seen, for cheap liveness checks
    liveness: TtlCache<String>,

    // Connect lock: attempts, monitor scheduling, counters
    state: Mutex<KeeperState>,
}

impl ConnectionKeeper {
    /// Creates a keeper. No connection is attempted and no task is spawned.
    ///
    /// # Errors
    ///
    /// Returns [`KeeperError::Configuration`] for options that can never work.
    pub fn new(options: KeeperOptions, connector: Arc<dyn RemoteConnector>) -> Result<Arc<Self>> {
        ConnectionKeeperBuilder::new(options, connector).map(|builder| builder.build())
    }

    pub(crate) fn from_parts(
        options: KeeperOptions,
        connector: Arc<dyn RemoteConnector>,
    ) -> Arc<Self> {
        let ttl = options.cache_ttl();
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            options,
            connector,
            connection: ConnectionSlot::new(),
            liveness: TtlCache::new(ttl),
            state: Mutex::new(KeeperState::new()),
        })
    }

    pub fn options(&self) -> &KeeperOptions {
        &self.options
    }

    pub async fn state(&self) -> ConnectionState {
        self.connection.state().await
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.is_connected().await
    }

    pub async fn stats(&self) -> KeeperStats {
        self.state.lock().await.stats()
    }

    pub(crate) async fn session(&self) -> Option<Arc<RemoteSession>> {
        self.connection.session().await
    }

    /// Makes sure the reconnection monitor is scheduled and returns.
    ///
    /// Never performs network I/O itself; the first monitor tick (after the
    /// configured initial delay) does the connecting.
    pub async fn connect_async(&self) {
        self.schedule_monitor().await;
    }

    /// Attempts to connect now, waiting for the result.
    ///
    /// Always leaves the reconnection monitor running, whatever the outcome.
    /// Returns `true` iff a session was established by this call. Failures
    /// are logged, never returned; use [`try_connect`](Self::try_connect) for
    /// the error itself.
    pub async fn connect_sync(&self) -> bool {
        self.try_connect().await.is_ok()
    }

    /// Like [`connect_sync`](Self::connect_sync) but returns the failure.
    ///
    /// Configuration errors (malformed address or object names) and transport
    /// errors are both retried by the monitor at the same fixed period.
    pub async fn try_connect(&self) -> Result<()> {
        let result = self.establish().await;
        self.schedule_monitor().await;
        result
    }

    /// Whether the current session is believed usable.
    ///
    /// With `use_cache` and a connection identifier younger than the cache
    /// ttl, answers without a round-trip. Otherwise asks the session for its
    /// identifier; on failure the cached identifier is left untouched and
    /// the check reports not alive. An empty identifier never counts as alive.
    pub async fn is_alive(&self, use_cache: bool) -> bool {
        let lookup = self
            .liveness
            .get(use_cache, || async {
                let session = self
                    .connection
                    .session()
                    .await
                    .ok_or(KeeperError::NotConnected)?;
                session.connection_id().await
            })
            .await;

        match lookup {
            Lookup::Cached(id) => {
                tracing::trace!("Liveness served from cache ({})", id);
                !id.is_empty()
            }
            Lookup::Refreshed(id) => !id.is_empty(),
            Lookup::Failed {
                error: KeeperError::NotConnected,
                ..
            } => {
                tracing::debug!("Liveness check skipped: no open session");
                false
            }
            Lookup::Failed { error, .. } => {
                tracing::error!(
                    "Liveness check against {} failed: {}",
                    self.describe_target(),
                    error
                );
                false
            }
        }
    }

    /// Gate used before every remote call.
    ///
    /// Alive, or else a connect attempt whose new session then passes a
    /// liveness check; in both cases the keeper's own state must also be
    /// `Connected`.
    pub async fn ensure_connected(&self, use_cache: bool) -> bool {
        let alive = self.is_alive(use_cache).await
            || (self.connect_sync().await && self.is_alive(true).await);
        alive && self.is_connected().await
    }

    /// Releases the current session, if any.
    ///
    /// Best effort: close failures are logged. The reconnection monitor keeps
    /// running, so a later tick reconnects; use [`shutdown`](Self::shutdown)
    /// to stop for good.
    pub async fn close(&self) {
        let _guard = self.state.lock().await;
        self.release().await;
    }

    /// Stops the reconnection monitor, then closes the session.
    ///
    /// A monitor tick already in progress is allowed to finish first, so this
    /// can wait up to one liveness round-trip or connect attempt.
    pub async fn shutdown(&self) {
        let stopped = self.state.lock().await.monitor.stop();
        if let Some(monitor) = stopped
            && let Err(e) = monitor.await
        {
            tracing::warn!(
                "Connection monitor for {} ended abnormally: {}",
                self.describe_target(),
                e
            );
        }
        tracing::info!("Connection monitor for {} stopped", self.describe_target());
        self.close().await;
    }

    /// Replaces the reconnection monitor with a fresh schedule.
    ///
    /// The previous monitor is told to stop but a tick it has already started
    /// runs to completion.
    pub async fn restart_monitor(&self) {
        let mut state = self.state.lock().await;
        state.monitor.replace(|stop| self.monitor().run(stop));
    }

    async fn schedule_monitor(&self) {
        let mut state = self.state.lock().await;
        state.monitor.spawn_if_idle(|stop| self.monitor().run(stop));
    }

    fn monitor(&self) -> ReconnectionMonitor {
        let target: Weak<dyn MonitorTarget> = self.this.clone();
        ReconnectionMonitor::new(target)
            .with_initial_delay(self.options.monitor_initial_delay())
            .with_period(self.options.monitor_period())
    }

    /// One serialized connect attempt.
    async fn establish(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        self.release().await;
        self.connection.set_state(ConnectionState::Connecting).await;

        let result = match self.open_session().await {
            Ok(session) => {
                let target = session.target().to_string();
                // New handle: next cached liveness read must ask it
                self.liveness.invalidate().await;
                self.connection.install(Arc::new(session)).await;
                tracing::info!("Connection to {} established", target);
                Ok(())
            }
            Err(e) => {
                self.connection.set_state(ConnectionState::Disconnected).await;
                let target = self.describe_target();
                if e.is_configuration() {
                    tracing::error!("Failed to prepare connection to {}: {}", target, e);
                } else {
                    tracing::error!("Failed to establish connection to {}: {}", target, e);
                }
                Err(e)
            }
        };

        state.record_attempt(result.as_ref().map(|_| ()).map_err(|e| e.to_string()));
        result
    }

    /// Resolves everything from current options, then connects.
    async fn open_session(&self) -> Result<RemoteSession> {
        let target = RemoteTarget::resolve(&self.options.jmx_host, self.options.jmx_port)?;
        let names = self.options.session_object_names()?;
        let credentials = self.options.credentials();

        tracing::debug!("Connecting to {}", target);
        let handle = self.connector.connect(&target, credentials.as_ref()).await?;
        RemoteSession::open(handle, target, &names).await
    }

    /// Takes the session out of the slot and closes it. Caller holds the lock.
    async fn release(&self) {
        if let Some(session) = self.connection.take().await {
            tracing::debug!("Closing connection to {}", session.target());
            if let Err(e) = session.close().await {
                tracing::warn!("Failed to close connection to {}: {}", session.target(), e);
            }
        }
    }

    fn describe_target(&self) -> String {
        format!("{}:{}", self.options.jmx_host, self.options.jmx_port)
    }
}

impl Drop for ConnectionKeeper {
    fn drop(&mut self) {
        if let Some(session) = self.connection.session_mut() {
            tracing::warn!(
                "Keeper dropped with an open connection to {}; call shutdown() first",
                session.target()
            );
        }
    }
}

#[async_trait]
impl MonitorTarget for ConnectionKeeper {
    // Connects without rescheduling: this tick is the monitor
    async fn tick(&self) {
        if !self.is_alive(false).await && self.establish().await.is_err() {
            tracing::debug!(
                "Monitor could not restore connection to {}; retrying next tick",
                self.describe_target()
            );
        }
    }
}
