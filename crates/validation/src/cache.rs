//! Fingerprint-gated cache of validation verdicts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{ObjectKey, ValidationContext};

/// A frozen verdict for one object.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Fingerprint of the object when the verdict was produced.
    pub fingerprint: u32,
    /// Rule-set generation the verdict was produced under.
    pub generation: u64,
    /// The context produced by that validation. Never mutated once cached.
    pub context: Arc<ValidationContext>,
    pub cached_at: DateTime<Utc>,
}

/// Lookup counters for the result cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage (0-100). Zero when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Maps object identity to the last verdict and the fingerprint it was
/// computed for.
///
/// A hit requires both the stored fingerprint and the stored rule-set
/// generation to equal the current ones; any mismatch counts as a miss and
/// the caller replaces the entry. Each
/// read or write holds the map lock for its whole duration, so an entry is
/// never observed half-replaced.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<ObjectKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ObjectKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached context for `key` if it was produced for
    /// `fingerprint` under rule-set `generation`, recording a hit or a miss.
    pub fn lookup(
        &self,
        key: &ObjectKey,
        fingerprint: u32,
        generation: u64,
    ) -> Option<Arc<ValidationContext>> {
        let found = self
            .entries()
            .get(key)
            .filter(|entry| entry.fingerprint == fingerprint && entry.generation == generation)
            .map(|entry| Arc::clone(&entry.context));

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(target: "validation::cache", object = %key, "Cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(target: "validation::cache", object = %key, fingerprint, "Cache miss");
        }
        found
    }

    /// Stores a verdict, replacing any previous entry for `key`.
    pub fn store(
        &self,
        key: ObjectKey,
        fingerprint: u32,
        generation: u64,
        context: Arc<ValidationContext>,
    ) {
        let entry = CacheEntry {
            fingerprint,
            generation,
            context,
            cached_at: Utc::now(),
        };
        self.entries().insert(key, entry);
    }

    /// Returns a copy of the entry for `key` without touching the counters.
    pub fn peek(&self, key: &ObjectKey) -> Option<CacheEntry> {
        self.entries().get(key).cloned()
    }

    /// Evicts the entry for `key`. Returns true if one existed.
    pub fn invalidate(&self, key: &ObjectKey) -> bool {
        self.entries().remove(key).is_some()
    }

    /// Evicts every entry and returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries();
        let evicted = entries.len();
        entries.clear();
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeTag;

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(TypeTag::new("weapon"), name)
    }

    fn context() -> Arc<ValidationContext> {
        Arc::new(ValidationContext::new("weapon", "sword"))
    }

    #[test]
    fn test_hit_requires_matching_fingerprint() {
        let cache = ResultCache::new();
        assert!(cache.lookup(&key("sword"), 1, 0).is_none());

        cache.store(key("sword"), 1, 0, context());
        assert!(cache.lookup(&key("sword"), 1, 0).is_some());
        assert!(cache.lookup(&key("sword"), 2, 0).is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_store_replaces_entry() {
        let cache = ResultCache::new();
        cache.store(key("sword"), 1, 0, context());
        cache.store(key("sword"), 7, 0, context());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.peek(&key("sword")).unwrap().fingerprint, 7);
    }

    #[test]
    fn test_hit_requires_matching_generation() {
        let cache = ResultCache::new();
        cache.store(key("sword"), 1, 3, context());

        assert!(cache.lookup(&key("sword"), 1, 4).is_none());
        assert!(cache.lookup(&key("sword"), 1, 3).is_some());
        assert_eq!(cache.peek(&key("sword")).unwrap().generation, 3);
    }

    #[test]
    fn test_entries_are_keyed_by_identity() {
        let cache = ResultCache::new();
        cache.store(key("sword"), 1, 0, context());
        assert!(cache.lookup(&key("axe"), 1, 0).is_none());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ResultCache::new();
        cache.store(key("sword"), 1, 0, context());
        cache.store(key("axe"), 2, 0, context());

        assert!(cache.invalidate(&key("sword")));
        assert!(!cache.invalidate(&key("sword")));
        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 0,
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
