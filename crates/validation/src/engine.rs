//! Validation engine: rule execution, verdict caching, and metrics.
//!
//! # Execution
//!
//! For an object of concrete type `T`, the engine asks the registry for every
//! rule registered on `T` or one of its ancestors, ordered by priority and
//! registration. Each rule writes into its own child context
//! (`system = "ValidationRule"`, `operation = rule name`), which is attached
//! to the root context whether the rule passed or not. Execution never stops
//! at the first failure, so one pass reports every defect.
//!
//! # Shared state
//!
//! The engine is `Send + Sync`. The registry is read-mostly behind an
//! `RwLock`; the result cache and the metrics collector are the only
//! structures written on the hot path, each behind its own lock.
//!
//! Every rule-set change bumps a generation counter while the registry write
//! lock is held. Cached verdicts are tagged with the generation observed
//! before their rules were read, so a validation that straddles a rule change
//! can store its verdict but never have it served.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use tracing::{debug, warn};

use crate::{
    CacheEntry, CacheStats, ExportFormat, MetricsCollector, MetricsError, MetricsSnapshot,
    ObjectKey, RULE_SYSTEM, Registration, RegistryError, ResultCache, RuleDefinition,
    RuleRegistry, TypeHierarchy, TypeTag, Validatable, ValidationContext, ValidationObserver,
    fingerprint,
};

/// Result of validating one object.
#[derive(Clone, Debug)]
pub struct ValidationOutcome {
    /// True if no blocking issue was found.
    pub valid: bool,
    /// Frozen report for this pass.
    pub context: Arc<ValidationContext>,
    /// True if the verdict was served from the result cache.
    pub cached: bool,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Executes registered rules against [`Validatable`] objects.
///
/// Construct one per session and share it by `Arc`:
///
/// ```ignore
/// let engine = Arc::new(ValidationEngine::new(hierarchy));
/// engine.register_rule(rule)?;
/// let outcome = engine.validate_with_cache(&record, false);
/// ```
pub struct ValidationEngine {
    registry: RwLock<RuleRegistry>,
    /// Bumped on every rule-set change.
    generation: AtomicU64,
    cache: ResultCache,
    metrics: Mutex<MetricsCollector>,
    observers: RwLock<Vec<Arc<dyn ValidationObserver>>>,
}

impl ValidationEngine {
    /// Creates an engine with an empty registry over `hierarchy`.
    pub fn new(hierarchy: TypeHierarchy) -> Self {
        Self::with_registry(RuleRegistry::new(hierarchy))
    }

    /// Creates an engine around a pre-populated registry.
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            generation: AtomicU64::new(0),
            cache: ResultCache::new(),
            metrics: Mutex::new(MetricsCollector::new()),
            observers: RwLock::new(Vec::new()),
        }
    }

    fn registry(&self) -> RwLockReadGuard<'_, RuleRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, RuleRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn metrics(&self) -> MutexGuard<'_, MetricsCollector> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observers(&self) -> Vec<Arc<dyn ValidationObserver>> {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ===== rules =====

    /// Registers a rule.
    ///
    /// Adding a rule clears the result cache: cached verdicts were produced
    /// by the previous rule set.
    pub fn register_rule(&self, rule: RuleDefinition) -> Result<Registration, RegistryError> {
        let outcome = {
            let mut registry = self.registry_mut();
            let outcome = registry.register(rule)?;
            if outcome == Registration::Added {
                self.generation.fetch_add(1, Ordering::SeqCst);
            }
            outcome
        };
        if outcome == Registration::Added {
            self.drop_stale_verdicts();
        }
        Ok(outcome)
    }

    /// Removes a rule. Clears the result cache if one was removed.
    pub fn unregister_rule(&self, name: &str, tag: TypeTag) -> bool {
        let removed = {
            let mut registry = self.registry_mut();
            let removed = registry.unregister(name, tag);
            if removed {
                self.generation.fetch_add(1, Ordering::SeqCst);
            }
            removed
        };
        if removed {
            self.drop_stale_verdicts();
        }
        removed
    }

    fn drop_stale_verdicts(&self) {
        let evicted = self.cache.clear();
        if evicted > 0 {
            debug!(
                target: "validation::engine",
                evicted,
                "Rule set changed, cleared cached verdicts"
            );
        }
    }

    /// Current rule-set generation. Changes whenever a rule is added or
    /// removed.
    pub fn rule_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Rules applicable to concrete type `tag`, in execution order.
    pub fn rules_for(&self, tag: TypeTag) -> Vec<RuleDefinition> {
        self.registry().rules_for(tag)
    }

    /// Every registered rule, in priority order across all types.
    pub fn all_rules(&self) -> Vec<RuleDefinition> {
        self.registry().all_rules()
    }

    pub fn registered_types(&self) -> Vec<TypeTag> {
        self.registry().registered_types()
    }

    /// All declared type tags, sorted by name.
    pub fn declared_types(&self) -> Vec<TypeTag> {
        self.registry().hierarchy().tags()
    }

    pub fn is_a(&self, tag: TypeTag, ancestor: TypeTag) -> bool {
        self.registry().hierarchy().is_a(tag, ancestor)
    }

    pub fn rule_count(&self) -> usize {
        self.registry().len()
    }

    pub fn add_observer(&self, observer: Arc<dyn ValidationObserver>) {
        debug!(
            target: "validation::engine",
            observer = observer.name(),
            "Added validation observer"
        );
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    // ===== validation =====

    /// Runs every applicable rule against `object` and records metrics.
    ///
    /// A type with no registered rules trivially passes. A rule that returns
    /// `false` without reporting a blocking issue gets one added on its
    /// behalf, so the verdict always agrees with the context.
    pub fn validate(&self, object: &dyn Validatable) -> ValidationOutcome {
        let key = object.object_key();
        let observers = self.observers();
        for observer in &observers {
            observer.before_validation(&key);
        }

        let started = Instant::now();
        let rules = self.rules_for(object.type_tag());
        let mut context = ValidationContext::new(object.type_tag().name(), object.object_name());
        context.set_metadata("rules", rules.len().to_string());

        if rules.is_empty() {
            context.info(format!(
                "no rules registered for type '{}'",
                object.type_tag()
            ));
        }

        for rule in &rules {
            let mut rule_context = ValidationContext::new(RULE_SYSTEM, rule.name());
            let passed = rule.run(object, &mut rule_context);
            if !passed && rule_context.is_valid() {
                rule_context.error(format!("rule '{}' failed", rule.name()));
            }
            rule_context.complete();
            context.add_child_context(rule_context);
        }

        context.complete();
        let elapsed = started.elapsed();
        let valid = context.is_valid();

        self.metrics().record(&context, elapsed);

        for issue in context.all_issues().filter(|issue| issue.is_blocking()) {
            for observer in &observers {
                observer.on_blocking_issue(&key, issue);
            }
        }
        for observer in &observers {
            observer.after_validation(&key, &context);
        }

        if valid {
            debug!(
                target: "validation::engine",
                object = %key,
                rules = rules.len(),
                elapsed_us = elapsed.as_micros() as u64,
                "Validation passed"
            );
        } else {
            warn!(
                target: "validation::engine",
                object = %key,
                errors = context.blocking_messages().len(),
                "Validation failed"
            );
        }

        ValidationOutcome {
            valid,
            context: Arc::new(context),
            cached: false,
        }
    }

    /// Validates `object`, serving a cached verdict when its fingerprint is
    /// unchanged.
    ///
    /// With `force_revalidate`, the cache is not consulted; the fresh verdict
    /// still replaces the cached one.
    pub fn validate_with_cache(
        &self,
        object: &dyn Validatable,
        force_revalidate: bool,
    ) -> ValidationOutcome {
        let key = object.object_key();
        let current = fingerprint(object);
        // Read before the rules are, so a concurrent change can only make the
        // stored verdict look older than it is.
        let generation = self.rule_generation();

        if !force_revalidate
            && let Some(context) = self.cache.lookup(&key, current, generation)
        {
            return ValidationOutcome {
                valid: context.is_valid(),
                context,
                cached: true,
            };
        }

        let outcome = self.validate(object);
        self.cache
            .store(key, current, generation, Arc::clone(&outcome.context));
        outcome
    }

    // ===== cache =====

    /// Evicts the cached verdict for `key`. Use when an object's content
    /// changed out-of-band.
    pub fn invalidate_cache(&self, key: &ObjectKey) -> bool {
        self.cache.invalidate(key)
    }

    /// Evicts every cached verdict. Returns how many were removed.
    pub fn clear_cache(&self) -> usize {
        let evicted = self.cache.clear();
        debug!(target: "validation::cache", evicted, "Cleared validation cache");
        evicted
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cached_entry(&self, key: &ObjectKey) -> Option<CacheEntry> {
        self.cache.peek(key)
    }

    // ===== metrics =====

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics().snapshot()
    }

    pub fn metrics_report(&self) -> String {
        self.metrics().report()
    }

    /// Zeroes metrics. Cached verdicts are kept.
    pub fn reset_metrics(&self) {
        self.metrics().reset();
    }

    /// Replaces the current metrics with a persisted snapshot.
    pub fn restore_metrics(&self, snapshot: MetricsSnapshot) {
        *self.metrics() = MetricsCollector::from_snapshot(snapshot);
    }

    /// Runs `f` against the live collector.
    pub fn with_metrics<R>(&self, f: impl FnOnce(&MetricsCollector) -> R) -> R {
        f(&self.metrics())
    }

    /// Writes a metrics snapshot to `path` in `format`.
    ///
    /// The snapshot is taken before any I/O starts, so the metrics lock is
    /// never held across the write.
    pub fn export_metrics(&self, format: ExportFormat, path: &Path) -> Result<(), MetricsError> {
        let snapshot = self.metrics_snapshot();
        snapshot.export(format, path)
    }
}
