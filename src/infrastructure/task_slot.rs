use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Stop signal handed to a task spawned in a [`TaskSlot`].
///
/// Resolves `changed()` once the slot asks the task to stop, or once the slot
/// itself is gone.
pub(crate) type StopSignal = watch::Receiver<bool>;

struct Running {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

/// Holds at most one supervised background task.
///
/// Stopping is cooperative: the task is signalled and decides where it may
/// exit, so work it has already started runs to completion. Only dropping the
/// slot aborts.
pub(crate) struct TaskSlot {
    task: Option<Running>,
    starts: u64,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self {
            task: None,
            starts: 0,
        }
    }

    /// Whether a task is installed and has not finished
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.handle.is_finished())
    }

    /// Number of tasks ever installed in this slot
    pub fn starts(&self) -> u64 {
        self.starts
    }

    /// Signal the installed task to stop and spawn a new one in its place.
    ///
    /// The previous task is detached, not awaited.
    pub fn replace<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        let (stop, signal) = watch::channel(false);
        self.task = Some(Running {
            handle: tokio::spawn(task(signal)),
            stop,
        });
        self.starts += 1;
    }

    /// Spawn a task only if none is running; returns whether one was spawned
    pub fn spawn_if_idle<F, Fut>(&mut self, task: F) -> bool
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_running() {
            return false;
        }
        self.replace(task);
        true
    }

    /// Signal the installed task to stop and empty the slot.
    ///
    /// Returns the task's handle so the caller can wait for it to wind down.
    pub fn stop(&mut self) -> Option<JoinHandle<()>> {
        self.task.take().map(|running| {
            running.stop.send_replace(true);
            running.handle
        })
    }
}

impl Default for TaskSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        if let Some(running) = self.task.take() {
            running.handle.abort();
        }
    }
}
