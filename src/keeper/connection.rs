use crate::remote::RemoteSession;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the current session and the connection state.
///
/// `Connected` is only ever set together with an installed session, and the
/// state drops back to `Disconnected` before a session is taken out.
pub(crate) struct ConnectionSlot {
    session: RwLock<Option<Arc<RemoteSession>>>,
    state: RwLock<ConnectionState>,
}

impl ConnectionSlot {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
            state: RwLock::new(ConnectionState::Disconnected),
        }
    }

    /// Gets the current connection state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Sets the state; `Connected` is reserved for [`install`](Self::install)
    pub async fn set_state(&self, new_state: ConnectionState) {
        debug_assert_ne!(new_state, ConnectionState::Connected);
        *self.state.write().await = new_state;
    }

    /// Checks if currently connected
    pub async fn is_connected(&self) -> bool {
        *self.state.read().await == ConnectionState::Connected
    }

    /// The current session, if any
    pub async fn session(&self) -> Option<Arc<RemoteSession>> {
        self.session.read().await.clone()
    }

    /// Installs a freshly opened session and marks the slot connected
    pub async fn install(&self, session: Arc<RemoteSession>) {
        *self.session.write().await = Some(session);
        *self.state.write().await = ConnectionState::Connected;
    }

    /// Marks the slot disconnected and hands back the session for closing
    pub async fn take(&self) -> Option<Arc<RemoteSession>> {
        *self.state.write().await = ConnectionState::Disconnected;
        self.session.write().await.take()
    }

    /// The installed session, for callers holding exclusive access
    pub fn session_mut(&mut self) -> Option<&RemoteSession> {
        self.session.get_mut().as_deref()
    }
}

impl Default for ConnectionSlot {
    fn default() -> Self {
        Self::new()
    }
}
