/// Default management host (loopback: the keeper manages a co-located node)
pub const DEFAULT_JMX_HOST: &str = "127.0.0.1";

/// Default management port
pub const DEFAULT_JMX_PORT: u16 = 7100;

/// Endpoint URL scheme and path used when resolving a target
pub const ENDPOINT_SCHEME: &str = "rmi";
pub const ENDPOINT_PATH: &str = "jmxrmi";

/// Prefix of the service URL handed to connectors
pub const SERVICE_URL_PREFIX: &str = "service:jmx:rmi:///jndi/";

/// Delay before the first monitor tick (milliseconds)
pub const DEFAULT_MONITOR_INITIAL_DELAY: u64 = 100;

/// Period between monitor ticks (milliseconds)
pub const DEFAULT_MONITOR_PERIOD: u64 = 60_000;

/// How long cached liveness / identity values are trusted (milliseconds)
pub const DEFAULT_CACHE_TTL: u64 = 10_000;

/// Well-known remote object names
pub mod object_names {
    pub const STORAGE_SERVICE: &str = "org.apache.cassandra.db:type=StorageService";
    pub const COMPACTION_MANAGER: &str = "org.apache.cassandra.db:type=CompactionManager";
    pub const FAILURE_DETECTOR: &str = "org.apache.cassandra.net:type=FailureDetector";
}
