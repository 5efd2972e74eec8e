//! Process-local snapshot cache keyed by month.
//!
//! Each key moves through `Unfetched → Loading → Ready`, back to `Loading`
//! on a forced refresh, and to `Error` when a fetch fails. Snapshots are
//! stored as `Arc<V>` and replaced wholesale; readers never observe a
//! partially updated value. Entries never expire on their own.
//!
//! The lock is a `std::sync::RwLock` and is never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Month cache lock poisoned")]
    Poisoned,
}

/// Lifecycle of one cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthState {
    Unfetched,
    Loading,
    Ready,
    /// Last fetch failed; no data is held
    Error(String),
}

impl MonthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unfetched => "unfetched",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Error(_) => "error",
        }
    }
}

/// Cached state and snapshot for one key.
#[derive(Debug)]
struct MonthEntry<V> {
    state: MonthState,
    /// Present in `Ready`, and in `Loading` while a forced refresh replaces
    /// a previous snapshot
    data: Option<Arc<V>>,
}

#[derive(Debug)]
pub struct MonthCache<V> {
    entries: RwLock<HashMap<String, MonthEntry<V>>>,
}

impl<V> Default for MonthCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MonthCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, MonthEntry<V>>>, CacheError> {
        self.entries.read().map_err(|_| CacheError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, MonthEntry<V>>>, CacheError> {
        self.entries.write().map_err(|_| CacheError::Poisoned)
    }

    /// Returns the cached snapshot for `key`, if one is held.
    pub fn get(&self, key: &str) -> Result<Option<Arc<V>>, CacheError> {
        let snapshot = self.read()?.get(key).and_then(|entry| entry.data.clone());
        debug!(cache.key = %key, hit = snapshot.is_some(), "Month cache lookup");
        Ok(snapshot)
    }

    pub fn state(&self, key: &str) -> Result<MonthState, CacheError> {
        Ok(self
            .read()?
            .get(key)
            .map(|entry| entry.state.clone())
            .unwrap_or(MonthState::Unfetched))
    }

    /// Marks `key` as loading, keeping any previous snapshot until it is
    /// replaced.
    pub fn begin_loading(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.write()?;
        let entry = entries.entry(key.to_string()).or_insert(MonthEntry {
            state: MonthState::Unfetched,
            data: None,
        });
        entry.state = MonthState::Loading;
        Ok(())
    }

    /// Stores a fresh snapshot and marks `key` ready.
    ///
    /// When fetches overlap, the last one to store wins.
    pub fn store(&self, key: &str, value: V) -> Result<Arc<V>, CacheError> {
        let snapshot = Arc::new(value);
        self.write()?.insert(
            key.to_string(),
            MonthEntry {
                state: MonthState::Ready,
                data: Some(Arc::clone(&snapshot)),
            },
        );
        debug!(cache.key = %key, "Month cache set");
        Ok(snapshot)
    }

    /// Records a failed fetch. Any previous snapshot is dropped.
    pub fn fail(&self, key: &str, message: impl Into<String>) -> Result<(), CacheError> {
        self.write()?.insert(
            key.to_string(),
            MonthEntry {
                state: MonthState::Error(message.into()),
                data: None,
            },
        );
        Ok(())
    }

}
