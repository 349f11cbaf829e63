use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// A value together with the instant it was last refreshed.
#[derive(Debug, Clone)]
pub(crate) struct CachedValue<T> {
    pub value: Option<T>,
    pub refreshed_at: Option<Instant>,
}

impl<T> CachedValue<T> {
    fn empty() -> Self {
        Self {
            value: None,
            refreshed_at: None,
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        match self.refreshed_at {
            Some(at) => self.value.is_some() && at.elapsed() <= ttl,
            None => false,
        }
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T, E> {
    /// Served from the cache, no refresh performed
    Cached(T),
    /// Refresh succeeded and the new value was stored
    Refreshed(T),
    /// Refresh failed; the previous value (if any) is untouched
    Failed { previous: Option<T>, error: E },
}

/// Time-bounded cache over an expensive remote lookup.
///
/// A failed refresh never clears the stored value; it only leaves the
/// timestamp alone so the next read tries again. Reads and refreshes
/// race benignly: two callers may both refresh a stale entry.
pub struct TtlCache<T> {
    ttl: Duration,
    entry: RwLock<CachedValue<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(CachedValue::empty()),
        }
    }

    /// Returns the stored value if it is within the ttl.
    pub async fn fresh(&self) -> Option<T> {
        let entry = self.entry.read().await;
        if entry.is_fresh(self.ttl) {
            entry.value.clone()
        } else {
            None
        }
    }

    /// Returns the stored value regardless of age.
    pub async fn peek(&self) -> Option<T> {
        self.entry.read().await.value.clone()
    }

    /// Reads through the cache.
    ///
    /// With `use_cache` and a fresh entry the stored value is returned without
    /// calling `refresh`. Otherwise `refresh` runs; success stores the value and
    /// stamps it, failure leaves the entry exactly as it was.
    pub async fn get<F, Fut, E>(&self, use_cache: bool, refresh: F) -> Lookup<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        if use_cache && let Some(value) = self.fresh().await {
            tracing::trace!("Serving cached value (ttl {:?})", self.ttl);
            return Lookup::Cached(value);
        }

        match refresh().await {
            Ok(value) => {
                let mut entry = self.entry.write().await;
                entry.value = Some(value.clone());
                entry.refreshed_at = Some(Instant::now());
                Lookup::Refreshed(value)
            }
            Err(error) => {
                tracing::debug!("Cache refresh failed, keeping previous value: {}", error);
                Lookup::Failed {
                    previous: self.peek().await,
                    error,
                }
            }
        }
    }

    /// Forces the next cached read to refresh; the value itself is kept.
    pub async fn invalidate(&self) {
        self.entry.write().await.refreshed_at = None;
    }

    #[cfg(test)]
    pub(crate) async fn snapshot(&self) -> CachedValue<T> {
        self.entry.read().await.clone()
    }
}
