use crate::types::{ENDPOINT_PATH, ENDPOINT_SCHEME, KeeperError, Result, SERVICE_URL_PREFIX};
use url::Url;

/// A resolved remote management endpoint.
///
/// Built fresh from configuration on every connect attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    host: String,
    port: u16,
    endpoint: Url,
}

impl RemoteTarget {
    /// Resolve `host:port` into an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`KeeperError::UrlParse`] for hosts the URL parser rejects and
    /// [`KeeperError::Configuration`] when no host is left after parsing.
    pub fn resolve(host: &str, port: u16) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "{}://{}:{}/{}",
            ENDPOINT_SCHEME,
            host.trim(),
            port,
            ENDPOINT_PATH
        ))?;

        let resolved_host = endpoint
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                KeeperError::Configuration(format!("No host in remote address '{}'", host))
            })?
            .to_string();

        Ok(Self {
            host: resolved_host,
            port,
            endpoint,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Full service URL handed to connectors
    pub fn service_url(&self) -> String {
        format!("{}{}", SERVICE_URL_PREFIX, self.endpoint)
    }
}

impl std::fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.service_url())
    }
}
