use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{trace, warn};

use super::{AdapterConfig, AdapterError, AdapterKind, Lookup, TtlCache};

/// Cache, timeout, and error-to-skip conversion around a source call.
///
/// Successful answers are cached, including "not found". Failures are not:
/// the next call retries the source. The source runs on a worker thread and
/// the caller waits at most the configured timeout for its answer; a source
/// still running past the deadline is abandoned and its late answer dropped.
#[derive(Debug)]
pub struct FailSafeAdapter<V> {
    kind: AdapterKind,
    timeout: Duration,
    cache: TtlCache<V>,
}

impl<V: Clone + Send + 'static> FailSafeAdapter<V> {
    pub fn new(kind: AdapterKind, config: AdapterConfig) -> Self {
        Self {
            kind,
            timeout: config.timeout,
            cache: TtlCache::new(config.ttl),
        }
    }

    pub fn kind(&self) -> AdapterKind {
        self.kind
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache(&self) -> &TtlCache<V> {
        &self.cache
    }

    /// Serve `key` from the cache, or call `fetch` with the timeout budget.
    pub fn lookup_with<F>(&self, key: &str, fetch: F) -> Lookup<V>
    where
        F: FnOnce(Duration) -> Result<Option<V>, AdapterError> + Send + 'static,
    {
        if let Some(cached) = self.cache.get(key) {
            trace!(adapter = %self.kind, key, "cache hit");
            return cached.map_or(Lookup::NotFound, Lookup::Found);
        }
        trace!(adapter = %self.kind, key, "cache miss");

        match self.fetch_within_deadline(fetch) {
            Ok(value) => {
                self.cache.insert(key, value.clone());
                value.map_or(Lookup::NotFound, Lookup::Found)
            }
            Err(err) => {
                warn!(adapter = %self.kind, key, reason = %err, "external lookup skipped");
                Lookup::Skipped(err.to_string())
            }
        }
    }

    fn fetch_within_deadline<F>(&self, fetch: F) -> Result<Option<V>, AdapterError>
    where
        F: FnOnce(Duration) -> Result<Option<V>, AdapterError> + Send + 'static,
    {
        let timeout = self.timeout;
        let (tx, rx) = mpsc::sync_channel(1);
        thread::Builder::new()
            .name(format!("nota-{}", self.kind))
            .spawn(move || {
                // the receiver is gone once the caller has given up
                let _ = tx.send(fetch(timeout));
            })
            .map_err(|err| AdapterError::Unavailable(format!("cannot start lookup: {err}")))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(AdapterError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(AdapterError::Unavailable("source panicked".to_string()))
            }
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
