use async_trait::async_trait;
use std::sync::Weak;
use std::time::Duration;
use tokio::time::{self, Instant};

use super::task_slot::StopSignal;
use crate::types::{DEFAULT_MONITOR_INITIAL_DELAY, DEFAULT_MONITOR_PERIOD};

/// Something the monitor drives once per tick.
#[async_trait]
pub trait MonitorTarget: Send + Sync {
    /// Verify connectivity and restore it if needed. Must not fail.
    async fn tick(&self);
}

/// Periodic reconnection check.
///
/// Holds only a weak reference to its target and exits once the target is
/// dropped or the stop signal fires. The signal is only observed between
/// ticks. A slow tick delays the next one instead of queueing a burst.
pub struct ReconnectionMonitor {
    target: Weak<dyn MonitorTarget>,
    initial_delay: Duration,
    period: Duration,
}

impl ReconnectionMonitor {
    pub fn new(target: Weak<dyn MonitorTarget>) -> Self {
        Self {
            target,
            initial_delay: Duration::from_millis(DEFAULT_MONITOR_INITIAL_DELAY),
            period: Duration::from_millis(DEFAULT_MONITOR_PERIOD),
        }
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Runs until the target is dropped or `stop` fires
    pub(crate) async fn run(self, mut stop: StopSignal) {
        tracing::info!(
            "Scheduling connection monitor with initial delay of {} ms and interval of {} ms",
            self.initial_delay.as_millis(),
            self.period.as_millis()
        );

        let mut ticker = time::interval_at(Instant::now() + self.initial_delay, self.period);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => {
                    tracing::debug!("Connection monitor stopped");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let target = match self.target.upgrade() {
                Some(target) => target,
                None => {
                    tracing::debug!("Connection keeper dropped, stopping monitor");
                    break;
                }
            };

            tracing::debug!("Connection monitor tick");
            target.tick().await;
        }
    }
}
