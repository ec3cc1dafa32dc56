//! Typed configuration store.
//!
//! [`ConfigStore`] owns one table per [`ConfigKind`], serves named lookups
//! with hit/miss/latency tracking, and drives bulk validation through a
//! shared [`ValidationEngine`].

mod error;
mod settings;
mod state;
mod stats;
mod sweep;

pub use error::{Result, StoreError};
pub use settings::StoreSettings;
pub use state::StoreState;
pub use stats::{PerformanceSnapshot, PerformanceStats};
pub use sweep::{SweepOptions, SweepReport};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use game_core::{ConfigEntry, ConfigKind, ConfigRecord};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};
use validation::{ObjectKey, Validatable, ValidationEngine, ValidationOutcome};

/// Named-record tables keyed by kind.
///
/// Entries are immutable once inserted. The only in-place change is
/// [`reload_entry`](Self::reload_entry), which swaps a whole record and
/// evicts its cached verdict.
pub struct ConfigStore {
    engine: Arc<ValidationEngine>,
    settings: StoreSettings,
    state: StoreState,
    tables: HashMap<ConfigKind, HashMap<String, ConfigEntry>>,
    stats: PerformanceStats,
    invalid_on_load: Vec<ObjectKey>,
}

impl ConfigStore {
    pub fn new(engine: Arc<ValidationEngine>, settings: StoreSettings) -> Self {
        Self {
            engine,
            settings,
            state: StoreState::Uninitialized,
            tables: HashMap::new(),
            stats: PerformanceStats::new(),
            invalid_on_load: Vec::new(),
        }
    }

    pub fn engine(&self) -> &Arc<ValidationEngine> {
        &self.engine
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    fn transition(&mut self, next: StoreState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        info!(
            target: "content::store",
            from = %self.state,
            to = %next,
            "Store state transition"
        );
        self.state = next;
        Ok(())
    }

    fn require_state(&self, expected: StoreState) -> Result<()> {
        if self.state != expected {
            return Err(StoreError::WrongState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    // ===== lifecycle =====

    /// `Uninitialized -> Loading`.
    pub fn begin_loading(&mut self) -> Result<()> {
        self.transition(StoreState::Loading)
    }

    /// Adds a record while `Loading`.
    ///
    /// With `validate_on_load`, the record is validated immediately. A failing
    /// record is still stored; its key is reported by
    /// [`invalid_on_load`](Self::invalid_on_load).
    pub fn insert(&mut self, entry: impl Into<ConfigEntry>) -> Result<()> {
        self.require_state(StoreState::Loading)?;
        let entry = entry.into();
        let kind = entry.kind();
        let table = self.tables.entry(kind).or_default();
        if table.contains_key(entry.name()) {
            return Err(StoreError::DuplicateEntry {
                kind,
                name: entry.name().to_string(),
            });
        }

        if self.settings.validate_on_load {
            let outcome = self
                .engine
                .validate_with_cache(entry.as_validatable(), false);
            if !outcome.valid {
                self.invalid_on_load
                    .push(entry.as_validatable().object_key());
            }
        }
        table.insert(entry.name().to_string(), entry);
        Ok(())
    }

    /// `Loading -> Ready`.
    pub fn finish_loading(&mut self) -> Result<()> {
        self.transition(StoreState::Ready)?;
        info!(
            target: "content::store",
            entries = self.len(),
            invalid = self.invalid_on_load.len(),
            "Configuration store ready"
        );
        Ok(())
    }

    /// Replaces an existing record while `Ready` and revalidates it.
    ///
    /// The previous verdict is evicted first, so the returned outcome is
    /// always a fresh execution.
    pub fn reload_entry(&mut self, entry: impl Into<ConfigEntry>) -> Result<ValidationOutcome> {
        self.require_state(StoreState::Ready)?;
        let entry = entry.into();
        let kind = entry.kind();
        let slot = self
            .tables
            .get_mut(&kind)
            .and_then(|table| table.get_mut(entry.name()))
            .ok_or_else(|| StoreError::UnknownEntry {
                kind,
                name: entry.name().to_string(),
            })?;

        let key = entry.as_validatable().object_key();
        *slot = entry;
        self.engine.invalidate_cache(&key);
        let outcome = self.engine.validate_with_cache(slot.as_validatable(), false);

        self.invalid_on_load.retain(|invalid| invalid != &key);
        if !outcome.valid {
            self.invalid_on_load.push(key.clone());
        }
        info!(
            target: "content::store",
            entry = %key,
            valid = outcome.valid,
            "Reloaded entry"
        );
        Ok(outcome)
    }

    /// `Loading | Ready -> ShuttingDown`. Clears every table and discards
    /// lookup statistics.
    pub fn shutdown(&mut self) -> Result<()> {
        self.transition(StoreState::ShuttingDown)?;
        self.tables.clear();
        self.invalid_on_load.clear();
        self.stats.reset();
        Ok(())
    }

    /// `ShuttingDown -> Uninitialized`.
    pub fn reset(&mut self) -> Result<()> {
        self.transition(StoreState::Uninitialized)
    }

    /// Loads every table from `factory`, taking the store from
    /// `Uninitialized` to `Ready`.
    ///
    /// On failure the partial load is discarded and the store returns to
    /// `Uninitialized`.
    #[cfg(feature = "loaders")]
    pub fn load_from(&mut self, factory: &crate::loaders::ContentFactory) -> Result<usize> {
        self.begin_loading()?;
        if let Err(err) = self.load_tables(factory) {
            warn!(
                target: "content::store",
                error = %err,
                "Content load failed, discarding partial tables"
            );
            self.shutdown()?;
            self.reset()?;
            return Err(err);
        }
        self.finish_loading()?;
        Ok(self.len())
    }

    #[cfg(feature = "loaders")]
    fn load_tables(&mut self, factory: &crate::loaders::ContentFactory) -> Result<()> {
        for kind in ConfigKind::iter() {
            let entries = factory.load_kind(kind).map_err(|e| StoreError::Load {
                table: kind.table_name(),
                message: format!("{e:#}"),
            })?;
            for entry in entries {
                self.insert(entry)?;
            }
        }
        Ok(())
    }

    // ===== lookups =====

    /// Looks up a record by name, recording a hit or miss.
    pub fn get<T: ConfigRecord>(&self, name: &str) -> Option<&T> {
        let started = Instant::now();
        let found = self.find(T::KIND, name).and_then(T::from_entry);
        self.record_lookup(T::KIND, name, found.is_some(), started.elapsed());
        found
    }

    /// Looks up a record of any kind by name, recording a hit or miss.
    pub fn get_dyn(&self, kind: ConfigKind, name: &str) -> Option<&ConfigEntry> {
        let started = Instant::now();
        let found = self.find(kind, name);
        self.record_lookup(kind, name, found.is_some(), started.elapsed());
        found
    }

    /// Untracked lookup. Only `Ready` stores serve entries.
    fn find(&self, kind: ConfigKind, name: &str) -> Option<&ConfigEntry> {
        if !self.state.serves_queries() {
            return None;
        }
        self.tables.get(&kind).and_then(|table| table.get(name))
    }

    fn record_lookup(&self, kind: ConfigKind, name: &str, hit: bool, elapsed: Duration) {
        self.stats.record(hit, elapsed);
        if hit {
            debug!(target: "content::store", %kind, name, "Config lookup hit");
        } else {
            warn!(
                target: "content::store",
                %kind,
                name,
                state = %self.state,
                "Config lookup miss"
            );
        }
    }

    /// Whether `kind/name` exists. Does not touch lookup statistics.
    pub fn contains(&self, kind: ConfigKind, name: &str) -> bool {
        self.tables
            .get(&kind)
            .is_some_and(|table| table.contains_key(name))
    }

    /// Entry names of one kind, sorted.
    pub fn names(&self, kind: ConfigKind) -> Vec<&str> {
        let mut names: Vec<_> = self
            .tables
            .get(&kind)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Every entry, ordered by kind then name.
    pub fn entries(&self) -> Vec<&ConfigEntry> {
        ConfigKind::iter()
            .flat_map(|kind| {
                self.names(kind)
                    .into_iter()
                    .filter_map(move |name| self.tables.get(&kind)?.get(name))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry count per kind, including empty kinds.
    pub fn counts(&self) -> BTreeMap<ConfigKind, usize> {
        ConfigKind::iter()
            .map(|kind| (kind, self.tables.get(&kind).map_or(0, HashMap::len)))
            .collect()
    }

    /// Keys of records that failed validation when inserted or reloaded.
    pub fn invalid_on_load(&self) -> &[ObjectKey] {
        &self.invalid_on_load
    }

    // ===== statistics =====

    /// Current lookup statistics.
    ///
    /// Logs a warning once the query count passes the configured threshold:
    /// a caller that keeps re-querying should hold on to the record instead.
    pub fn performance_snapshot(&self) -> PerformanceSnapshot {
        let snapshot = self.stats.snapshot();
        if snapshot.query_count > self.settings.query_warning_threshold {
            warn!(
                target: "content::store",
                queries = snapshot.query_count,
                threshold = self.settings.query_warning_threshold,
                "High config query count; callers should cache lookups"
            );
        }
        snapshot
    }

    pub fn reset_performance_stats(&self) {
        self.stats.reset();
    }
}
