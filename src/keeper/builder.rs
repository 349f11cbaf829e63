use super::ConnectionKeeper;
use crate::remote::{Credentials, ObjectName, RemoteConnector, SessionObjectNames};
use crate::types::{
    DEFAULT_CACHE_TTL, DEFAULT_JMX_HOST, DEFAULT_JMX_PORT, DEFAULT_MONITOR_INITIAL_DELAY,
    DEFAULT_MONITOR_PERIOD, KeeperError, Result, object_names,
};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Identifiers of the remote objects a session resolves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ObjectNameOptions {
    pub storage_service: String,
    pub compaction_manager: String,
    pub failure_detector: String,
}

impl Default for ObjectNameOptions {
    fn default() -> Self {
        Self {
            storage_service: object_names::STORAGE_SERVICE.to_string(),
            compaction_manager: object_names::COMPACTION_MANAGER.to_string(),
            failure_detector: object_names::FAILURE_DETECTOR.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeeperOptions {
    pub jmx_host: String,
    pub jmx_port: u16,
    pub monitor_initial_delay_ms: u64,
    pub monitor_period_ms: u64,
    pub cache_ttl_ms: u64,
    pub username: Option<String>,
    pub password: Option<String>,
    pub object_names: ObjectNameOptions,
}

impl Default for KeeperOptions {
    fn default() -> Self {
        Self {
            jmx_host: DEFAULT_JMX_HOST.to_string(),
            jmx_port: DEFAULT_JMX_PORT,
            monitor_initial_delay_ms: DEFAULT_MONITOR_INITIAL_DELAY,
            monitor_period_ms: DEFAULT_MONITOR_PERIOD,
            cache_ttl_ms: DEFAULT_CACHE_TTL,
            username: None,
            password: None,
            object_names: ObjectNameOptions::default(),
        }
    }
}

impl fmt::Debug for KeeperOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeeperOptions")
            .field("jmx_host", &self.jmx_host)
            .field("jmx_port", &self.jmx_port)
            .field("monitor_initial_delay_ms", &self.monitor_initial_delay_ms)
            .field("monitor_period_ms", &self.monitor_period_ms)
            .field("cache_ttl_ms", &self.cache_ttl_ms)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("object_names", &self.object_names)
            .finish()
    }
}

impl KeeperOptions {
    pub fn monitor_initial_delay(&self) -> Duration {
        Duration::from_millis(self.monitor_initial_delay_ms)
    }

    pub fn monitor_period(&self) -> Duration {
        Duration::from_millis(self.monitor_period_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Credentials are only sent when a username is configured
    pub fn credentials(&self) -> Option<Credentials> {
        self.username.as_ref().map(|username| Credentials {
            username: username.clone(),
            password: self.password.clone().unwrap_or_default(),
        })
    }

    /// Parse the configured object names. Called on every connect attempt.
    pub fn session_object_names(&self) -> Result<SessionObjectNames> {
        Ok(SessionObjectNames {
            storage_service: ObjectName::parse(&self.object_names.storage_service)?,
            compaction_manager: ObjectName::parse(&self.object_names.compaction_manager)?,
            failure_detector: ObjectName::parse(&self.object_names.failure_detector)?,
        })
    }
}

/// Builder for [`ConnectionKeeper`]; building never touches the network.
pub struct ConnectionKeeperBuilder {
    options: KeeperOptions,
    connector: Arc<dyn RemoteConnector>,
}

impl ConnectionKeeperBuilder {
    /// Create a new builder
    ///
    /// Only settings that can never work are rejected here. Address and object
    /// name syntax is checked on each connect attempt instead.
    pub fn new(options: KeeperOptions, connector: Arc<dyn RemoteConnector>) -> Result<Self> {
        if options.monitor_period_ms == 0 {
            return Err(KeeperError::Configuration(
                "Monitor period must be greater than zero".to_string(),
            ));
        }

        Ok(Self { options, connector })
    }

    /// Build the keeper. No connection is attempted and no task is spawned.
    pub fn build(self) -> Arc<ConnectionKeeper> {
        ConnectionKeeper::from_parts(self.options, self.connector)
    }
}
