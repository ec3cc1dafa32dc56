//! Lookup statistics for the configuration store.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lookup counters tracked by the configuration store.
///
/// Uses atomics so lookups can record through `&self`.
#[derive(Debug, Default)]
pub struct PerformanceStats {
    /// Lookups that found an entry
    cache_hits: AtomicU64,

    /// Lookups that found nothing (including lookups outside `Ready`)
    cache_misses: AtomicU64,

    /// Total time spent in lookups, in nanoseconds
    total_query_time_nanos: AtomicU64,

    /// Total number of lookups
    query_count: AtomicU64,
}

impl PerformanceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one lookup.
    pub fn record(&self, hit: bool, elapsed: Duration) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
        self.total_query_time_nanos.fetch_add(
            u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            Ordering::Relaxed,
        );
        self.query_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }

    /// Average lookup time in milliseconds. Zero before the first lookup.
    pub fn avg_query_time_ms(&self) -> f64 {
        let count = self.query_count();
        if count == 0 {
            0.0
        } else {
            let total = self.total_query_time_nanos.load(Ordering::Relaxed);
            total as f64 / count as f64 / 1_000_000.0
        }
    }

    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.total_query_time_nanos.store(0, Ordering::Relaxed);
        self.query_count.store(0, Ordering::Relaxed);
    }

    /// Creates a snapshot for display.
    ///
    /// Fields are read individually, so a snapshot taken during concurrent
    /// lookups may be off by the in-flight ones.
    pub fn snapshot(&self) -> PerformanceSnapshot {
        PerformanceSnapshot {
            cache_hits: self.cache_hits(),
            cache_misses: self.cache_misses(),
            query_count: self.query_count(),
            avg_query_time_ms: self.avg_query_time_ms(),
        }
    }
}

/// Snapshot of lookup statistics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub query_count: u64,
    pub avg_query_time_ms: f64,
}

impl PerformanceSnapshot {
    /// Hit rate as a percentage (0-100). Zero before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for PerformanceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} queries={} hit_rate={:.1}% avg_query={:.4}ms",
            self.cache_hits,
            self.cache_misses,
            self.query_count,
            self.hit_rate(),
            self.avg_query_time_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_average() {
        let stats = PerformanceStats::new();
        assert_eq!(stats.avg_query_time_ms(), 0.0);

        stats.record(false, Duration::from_millis(2));
        stats.record(true, Duration::from_millis(4));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.query_count, 2);
        assert!((snapshot.avg_query_time_ms - 3.0).abs() < 1e-9);
        assert_eq!(snapshot.hit_rate(), 50.0);

        stats.reset();
        assert_eq!(stats.query_count(), 0);
    }
}
