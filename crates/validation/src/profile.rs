//! Validation latency profiling.

use std::fmt;
use std::time::{Duration, Instant};

use crate::{Validatable, ValidationEngine};

/// Expected upper bound for one uncached validation.
pub const UNCACHED_TARGET: Duration = Duration::from_millis(1);

/// Expected upper bound for one cache hit.
pub const CACHED_TARGET: Duration = Duration::from_micros(100);

/// Latency distribution over a set of samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LatencyProfile {
    pub samples: usize,
    pub min: Duration,
    pub avg: Duration,
    pub median: Duration,
    pub max: Duration,
}

impl LatencyProfile {
    /// Summarizes `samples`. An empty slice yields an all-zero profile.
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let total: Duration = sorted.iter().sum();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2
        } else {
            sorted[mid]
        };

        Self {
            samples: sorted.len(),
            min: sorted[0],
            avg: total / sorted.len() as u32,
            median,
            max: sorted[sorted.len() - 1],
        }
    }

    /// True when the average is within `target`.
    pub fn meets(&self, target: Duration) -> bool {
        self.avg <= target
    }
}

impl fmt::Display for LatencyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} min={:?} avg={:?} median={:?} max={:?}",
            self.samples, self.min, self.avg, self.median, self.max
        )
    }
}

/// Uncached and cached latency for one object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfileReport {
    pub uncached: LatencyProfile,
    pub cached: LatencyProfile,
}

impl ProfileReport {
    pub fn meets_targets(&self) -> bool {
        self.uncached.meets(UNCACHED_TARGET) && self.cached.meets(CACHED_TARGET)
    }
}

/// Validates `object` `iterations` times with the cache bypassed, then
/// primes the cache once and times `iterations` cache hits.
///
/// Uncached passes are real executions and are recorded in the engine's
/// metrics like any other validation.
pub fn profile_validation(
    engine: &ValidationEngine,
    object: &dyn Validatable,
    iterations: usize,
) -> ProfileReport {
    let mut uncached = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let started = Instant::now();
        let _ = engine.validate(object);
        uncached.push(started.elapsed());
    }

    let _ = engine.validate_with_cache(object, true);
    let mut cached = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let started = Instant::now();
        let _ = engine.validate_with_cache(object, false);
        cached.push(started.elapsed());
    }

    ProfileReport {
        uncached: LatencyProfile::from_samples(&uncached),
        cached: LatencyProfile::from_samples(&cached),
    }
}
