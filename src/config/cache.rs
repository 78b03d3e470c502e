//! Cache of resolved table patterns.

use crate::model::{EngineVersion, TableParsePattern};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Outcome of resolving one pattern resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedPatterns {
    /// The resource was loaded and parsed.
    Resolved(Vec<TableParsePattern>),
    /// The resource is known not to exist or not to be usable.
    Absent,
}

impl CachedPatterns {
    /// Table patterns for the section (empty when absent).
    pub fn patterns(&self) -> Vec<TableParsePattern> {
        match self {
            CachedPatterns::Resolved(patterns) => patterns.clone(),
            CachedPatterns::Absent => Vec::new(),
        }
    }
}

type Slot = Arc<OnceCell<CachedPatterns>>;

/// Pattern cache keyed by `(version, pattern id)`.
///
/// Each key owns a slot that is filled at most once; concurrent resolutions
/// of the same key wait on the first one instead of fetching again.
#[derive(Debug, Default)]
pub struct PatternCache {
    slots: Mutex<HashMap<(EngineVersion, String), Slot>>,
}

impl PatternCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached entry.
    pub fn get(&self, version: EngineVersion, pattern_id: &str) -> Option<CachedPatterns> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(version, pattern_id.to_string()))
            .and_then(|slot| slot.get().cloned())
    }

    /// Store an entry, replacing any previous one.
    pub fn insert(&self, version: EngineVersion, pattern_id: &str, entry: CachedPatterns) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (version, pattern_id.to_string()),
                Arc::new(OnceCell::new_with(Some(entry))),
            );
    }

    /// Get the entry for a key, running `resolve` if nobody has yet.
    pub async fn get_or_resolve<F, Fut>(
        &self,
        version: EngineVersion,
        pattern_id: &str,
        resolve: F,
    ) -> CachedPatterns
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedPatterns>,
    {
        let slot = self.slot(version, pattern_id);
        slot.get_or_init(resolve).await.clone()
    }

    /// Number of resolved keys.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn slot(&self, version: EngineVersion, pattern_id: &str) -> Slot {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((version, pattern_id.to_string()))
            .or_default()
            .clone()
    }
}
