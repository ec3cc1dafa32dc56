//! Validation metrics aggregation.
//!
//! [`MetricsCollector`] is the single accumulation point the engine feeds after
//! every fresh validation. [`MetricsSnapshot`] is the canonical, serializable
//! view of it: the text report and every export format are rendered from a
//! snapshot and nothing else.

mod export;
mod report;

pub use export::ExportFormat;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RULE_SYSTEM, ValidationContext};

/// Maximum entries shown per section of the text report.
pub const REPORT_TOP_N: usize = 10;

/// Accumulated time and sample count for one rule or system.
///
/// Stored as totals rather than averages so a snapshot reloads without
/// precision drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingStat {
    pub total_nanos: u64,
    pub count: u64,
}

impl TimingStat {
    pub fn add(&mut self, elapsed: Duration) {
        self.total_nanos = self
            .total_nanos
            .saturating_add(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX));
        self.count += 1;
    }

    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total_nanos)
    }

    pub fn average(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_nanos / self.count)
        }
    }
}

/// Point-in-time copy of all validation metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub recorded_at: DateTime<Utc>,
    pub total_validations: u64,
    pub passed_validations: u64,
    pub failed_validations: u64,
    pub error_frequency: BTreeMap<String, u64>,
    pub rule_timings: BTreeMap<String, TimingStat>,
    pub system_timings: BTreeMap<String, TimingStat>,
}

impl MetricsSnapshot {
    /// Pass rate as a percentage (0-100). 100 when nothing was validated.
    pub fn pass_rate(&self) -> f64 {
        if self.total_validations == 0 {
            100.0
        } else {
            (self.passed_validations as f64 / self.total_validations as f64) * 100.0
        }
    }

    /// Error messages sorted by frequency descending, ties by message.
    pub fn top_errors(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut errors: Vec<_> = self
            .error_frequency
            .iter()
            .map(|(message, count)| (message.as_str(), *count))
            .collect();
        errors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        errors.truncate(limit);
        errors
    }

    /// Rules sorted by average time descending, ties by name.
    pub fn slowest_rules(&self, limit: usize) -> Vec<(&str, TimingStat)> {
        slowest(&self.rule_timings, limit)
    }

    /// Systems sorted by average time descending, ties by name.
    pub fn slowest_systems(&self, limit: usize) -> Vec<(&str, TimingStat)> {
        slowest(&self.system_timings, limit)
    }
}

fn slowest(timings: &BTreeMap<String, TimingStat>, limit: usize) -> Vec<(&str, TimingStat)> {
    let mut sorted: Vec<_> = timings
        .iter()
        .map(|(name, stat)| (name.as_str(), *stat))
        .collect();
    sorted.sort_by(|a, b| {
        b.1.average()
            .cmp(&a.1.average())
            .then_with(|| a.0.cmp(b.0))
    });
    sorted.truncate(limit);
    sorted
}

/// Session-wide validation counters and timing tables.
///
/// Monotonic until [`reset`](Self::reset). Resetting metrics never touches
/// the result cache.
#[derive(Clone, Debug, Default)]
pub struct MetricsCollector {
    total_validations: u64,
    passed_validations: u64,
    failed_validations: u64,
    error_frequency: BTreeMap<String, u64>,
    rule_timings: BTreeMap<String, TimingStat>,
    system_timings: BTreeMap<String, TimingStat>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collector from a persisted snapshot.
    pub fn from_snapshot(snapshot: MetricsSnapshot) -> Self {
        Self {
            total_validations: snapshot.total_validations,
            passed_validations: snapshot.passed_validations,
            failed_validations: snapshot.failed_validations,
            error_frequency: snapshot.error_frequency,
            rule_timings: snapshot.rule_timings,
            system_timings: snapshot.system_timings,
        }
    }

    /// Records one completed validation.
    ///
    /// `elapsed` is charged to the root context's system. Nested contexts are
    /// charged with their own measured durations: rule contexts by rule name,
    /// everything else by system name. Every blocking issue anywhere in the
    /// tree credits its message in the error frequency table.
    pub fn record(&mut self, context: &ValidationContext, elapsed: Duration) {
        self.total_validations += 1;
        if context.is_valid() {
            self.passed_validations += 1;
        } else {
            self.failed_validations += 1;
        }

        for issue in context.all_issues().filter(|issue| issue.is_blocking()) {
            *self
                .error_frequency
                .entry(issue.message().to_string())
                .or_default() += 1;
        }

        self.system_timings
            .entry(context.system_name().to_string())
            .or_default()
            .add(elapsed);

        for nested in context.walk().skip(1) {
            let (table, key) = if nested.system_name() == RULE_SYSTEM {
                (&mut self.rule_timings, nested.operation_name())
            } else {
                (&mut self.system_timings, nested.system_name())
            };
            table.entry(key.to_string()).or_default().add(nested.elapsed());
        }
    }

    /// Zeroes every counter and clears every table.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total_validations(&self) -> u64 {
        self.total_validations
    }

    pub fn passed_validations(&self) -> u64 {
        self.passed_validations
    }

    pub fn failed_validations(&self) -> u64 {
        self.failed_validations
    }

    pub fn error_count(&self, message: &str) -> u64 {
        self.error_frequency.get(message).copied().unwrap_or(0)
    }

    pub fn rule_timing(&self, rule: &str) -> Option<TimingStat> {
        self.rule_timings.get(rule).copied()
    }

    pub fn system_timing(&self, system: &str) -> Option<TimingStat> {
        self.system_timings.get(system).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            recorded_at: Utc::now(),
            total_validations: self.total_validations,
            passed_validations: self.passed_validations,
            failed_validations: self.failed_validations,
            error_frequency: self.error_frequency.clone(),
            rule_timings: self.rule_timings.clone(),
            system_timings: self.system_timings.clone(),
        }
    }

    /// Human-readable report of the current state.
    pub fn report(&self) -> String {
        self.snapshot().report()
    }
}
