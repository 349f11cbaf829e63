use thiserror::Error;

/// Errors produced by the connection keeper and the interaction façade.
#[derive(Error, Debug)]
pub enum KeeperError {
    /// Malformed address or remote object name; keeps failing until configuration changes
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Endpoint URL could not be parsed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Connection-level failure talking to the remote endpoint
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O failure underneath a connector
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote call failed while the keeper believed it was connected
    #[error("Remote operation '{operation}' failed: {reason}")]
    Operation { operation: String, reason: String },

    /// The keeper could not certify a usable connection
    #[error("Not connected")]
    NotConnected,
}

impl KeeperError {
    /// Errors that will repeat on every attempt until configuration changes.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::UrlParse(_))
    }

    /// Errors that may clear up on their own (network, remote process down).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Io(_))
    }

    pub(crate) fn operation(operation: &str, source: KeeperError) -> Self {
        Self::Operation {
            operation: operation.to_string(),
            reason: source.to_string(),
        }
    }
}

/// Convenience type alias for `Result<T, KeeperError>`.
pub type Result<T> = std::result::Result<T, KeeperError>;
