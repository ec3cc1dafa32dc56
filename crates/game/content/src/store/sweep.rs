//! Bulk validation over every stored entry.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use game_core::ConfigEntry;
use tracing::{info, warn};
use validation::{ObjectKey, Validatable, ValidationContext};

use super::{ConfigStore, StoreSettings};

/// System name of the sweep's root context.
pub const SWEEP_SYSTEM: &str = "ConfigStore";
/// System name of per-entry reference checks.
pub const REFERENCE_SYSTEM: &str = "ReferenceCheck";

/// Options for [`ConfigStore::validate_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepOptions {
    /// Bypass cached verdicts.
    pub force_revalidate: bool,
    /// Stop starting new entries once this much time has passed.
    pub deadline: Option<Duration>,
}

impl SweepOptions {
    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self {
            force_revalidate: false,
            deadline: settings.sweep_deadline(),
        }
    }
}

/// Result of a sweep.
#[derive(Clone, Debug)]
pub struct SweepReport {
    /// True if every checked entry passed.
    pub valid: bool,
    /// Human-readable summary naming every failing entry.
    pub report: String,
    /// Root context with one child per checked entry.
    pub context: ValidationContext,
    pub failing: Vec<ObjectKey>,
    pub checked: usize,
    /// Entries not started because the deadline passed.
    pub skipped: usize,
}

impl ConfigStore {
    /// Validates every entry in every table.
    ///
    /// Never stops at a failing entry. Each entry's context combines the
    /// engine verdict with a check that its references name existing
    /// records. Works in any state; an empty store trivially passes.
    pub fn validate_all(&self, options: SweepOptions) -> SweepReport {
        let started = Instant::now();
        let entries = self.entries();
        let total = entries.len();

        let mut root = ValidationContext::new(SWEEP_SYSTEM, "validate_all");
        root.set_metadata("entries", total.to_string());
        let mut failing = Vec::new();
        let mut checked = 0;
        let mut skipped = 0;

        for (index, entry) in entries.iter().enumerate() {
            if let Some(deadline) = options.deadline
                && started.elapsed() >= deadline
            {
                skipped = total - index;
                root.warning(format!(
                    "sweep deadline of {}ms reached; {skipped} entries not validated",
                    deadline.as_millis()
                ));
                break;
            }

            let entry_context = self.validate_entry(entry, options.force_revalidate);
            if !entry_context.is_valid() {
                failing.push(entry.as_validatable().object_key());
            }
            root.add_child_context(entry_context);
            checked += 1;
        }
        root.complete();

        let valid = root.is_valid();
        let elapsed = started.elapsed();
        let report = render_report(&root, &failing, checked, skipped, elapsed);

        if valid {
            info!(
                target: "content::store",
                checked,
                skipped,
                elapsed_ms = elapsed.as_millis() as u64,
                "Validation sweep passed"
            );
        } else {
            warn!(
                target: "content::store",
                checked,
                failing = failing.len(),
                skipped,
                "Validation sweep found invalid entries"
            );
        }

        SweepReport {
            valid,
            report,
            context: root,
            failing,
            checked,
            skipped,
        }
    }

    fn validate_entry(&self, entry: &ConfigEntry, force_revalidate: bool) -> ValidationContext {
        let outcome = self
            .engine
            .validate_with_cache(entry.as_validatable(), force_revalidate);
        let mut context = ValidationContext::clone(&outcome.context);

        let mut references = ValidationContext::new(REFERENCE_SYSTEM, entry.name());
        for (kind, name) in entry.references() {
            if !self.contains(kind, name) {
                references.error(format!("references unknown {kind} '{name}'"));
            }
        }
        references.complete();
        context.merge_context(references);
        context
    }
}

fn render_report(
    root: &ValidationContext,
    failing: &[ObjectKey],
    checked: usize,
    skipped: usize,
    elapsed: Duration,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Validated {checked} entries in {:.2}ms: {} failing, {skipped} skipped",
        elapsed.as_secs_f64() * 1000.0,
        failing.len()
    );
    for entry in root.children() {
        if entry.is_valid() {
            continue;
        }
        let _ = writeln!(
            out,
            "FAIL {}/{}",
            entry.system_name(),
            entry.operation_name()
        );
        for message in entry.blocking_messages() {
            let _ = writeln!(out, "  - {message}");
        }
    }
    for issue in root.issues() {
        let _ = writeln!(out, "{issue}");
    }
    out
}
