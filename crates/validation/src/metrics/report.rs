//! Plain-text metrics report.

use std::fmt::Write;
use std::time::Duration;

use super::{MetricsSnapshot, REPORT_TOP_N, TimingStat};

fn micros(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000_000.0
}

fn write_timings(out: &mut String, title: &str, rows: &[(&str, TimingStat)]) {
    let _ = writeln!(out, "{title}:");
    if rows.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for (rank, (name, stat)) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<40} avg {:>10.2} us  total {:>10.2} us  count {}",
            rank + 1,
            name,
            micros(stat.average()),
            micros(stat.total()),
            stat.count
        );
    }
}

impl MetricsSnapshot {
    /// Renders the report: totals, then the top errors by frequency and the
    /// slowest rules and systems by average time, each capped at
    /// [`REPORT_TOP_N`] entries.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Validation Metrics ===");
        let _ = writeln!(out, "Recorded at:       {}", self.recorded_at.to_rfc3339());
        let _ = writeln!(out, "Total validations: {}", self.total_validations);
        let _ = writeln!(out, "Passed:            {}", self.passed_validations);
        let _ = writeln!(out, "Failed:            {}", self.failed_validations);
        let _ = writeln!(out, "Pass rate:         {:.1}%", self.pass_rate());
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "Top errors ({} distinct):",
            self.error_frequency.len()
        );
        let errors = self.top_errors(REPORT_TOP_N);
        if errors.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for (rank, (message, count)) in errors.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. [{count}x] {message}", rank + 1);
        }
        let _ = writeln!(out);

        write_timings(&mut out, "Slowest rules", &self.slowest_rules(REPORT_TOP_N));
        let _ = writeln!(out);
        write_timings(
            &mut out,
            "Slowest systems",
            &self.slowest_systems(REPORT_TOP_N),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::MetricsCollector;

    #[test]
    fn test_report_is_deterministic_and_capped() {
        let mut snapshot = MetricsCollector::new().snapshot();
        snapshot.total_validations = 4;
        snapshot.passed_validations = 3;
        snapshot.failed_validations = 1;
        for i in 0..15 {
            snapshot.error_frequency.insert(format!("error {i:02}"), i);
        }

        let report = snapshot.report();
        assert_eq!(report, snapshot.report());
        assert!(report.contains("Pass rate:         75.0%"));
        assert!(report.contains("[14x] error 14"));
        assert!(report.contains("10. [5x] error 05"));
        assert!(!report.contains("error 04"));
        assert!(report.contains("Slowest rules:\n  (none)"));
    }
}
