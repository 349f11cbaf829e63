use crate::infrastructure::TaskSlot;

/// Mutable keeper state guarded by the connect lock.
///
/// Connect attempts and monitor (re)scheduling both go through this single
/// lock so that a restart can never interleave with an attempt.
pub(crate) struct KeeperState {
    /// The reconnection monitor task
    pub monitor: TaskSlot,

    pub connect_attempts: u64,
    pub connect_failures: u64,

    /// Message of the most recent failed attempt, cleared on success
    pub last_error: Option<String>,
}

impl KeeperState {
    pub fn new() -> Self {
        Self {
            monitor: TaskSlot::new(),
            connect_attempts: 0,
            connect_failures: 0,
            last_error: None,
        }
    }

    pub fn record_attempt(&mut self, outcome: Result<(), String>) {
        self.connect_attempts += 1;
        match outcome {
            Ok(()) => self.last_error = None,
            Err(e) => {
                self.connect_failures += 1;
                self.last_error = Some(e);
            }
        }
    }

    pub fn stats(&self) -> KeeperStats {
        KeeperStats {
            connect_attempts: self.connect_attempts,
            connect_failures: self.connect_failures,
            monitor_starts: self.monitor.starts(),
            monitor_running: self.monitor.is_running(),
            last_error: self.last_error.clone(),
        }
    }
}

impl Default for KeeperState {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time diagnostics for a keeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeeperStats {
    pub connect_attempts: u64,
    pub connect_failures: u64,
    pub monitor_starts: u64,
    pub monitor_running: bool,
    pub last_error: Option<String>,
}
