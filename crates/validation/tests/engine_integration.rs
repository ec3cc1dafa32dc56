use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use validation::{
    FieldHasher, Issue, ObjectKey, RULE_SYSTEM, Registration, RuleDefinition, Severity,
    TypeHierarchy, TypeTag, Validatable, ValidationContext, ValidationEngine, ValidationObserver,
    validate_range,
};

const RECORD: TypeTag = TypeTag::new("record");
const GADGET: TypeTag = TypeTag::new("gadget");
const WIDGET: TypeTag = TypeTag::new("widget");

struct Gadget {
    name: String,
    power: i64,
    label: String,
}

impl Gadget {
    fn new(name: &str, power: i64) -> Self {
        Self {
            name: name.into(),
            power,
            label: String::new(),
        }
    }
}

impl Validatable for Gadget {
    fn type_tag(&self) -> TypeTag {
        GADGET
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn hash_fields(&self, hasher: &mut FieldHasher) {
        hasher.write_str(&self.name);
        hasher.write_i64(self.power);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Widget {
    name: String,
}

impl Validatable for Widget {
    fn type_tag(&self) -> TypeTag {
        WIDGET
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn hash_fields(&self, hasher: &mut FieldHasher) {
        hasher.write_str(&self.name);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn engine() -> ValidationEngine {
    let hierarchy = TypeHierarchy::new()
        .with(RECORD, None)
        .and_then(|h| h.with(GADGET, Some(RECORD)))
        .and_then(|h| h.with(WIDGET, Some(RECORD)))
        .unwrap();
    ValidationEngine::new(hierarchy)
}

fn power_rule(executions: Arc<AtomicUsize>) -> RuleDefinition {
    RuleDefinition::typed::<Gadget, _>(
        "gadget.power_range",
        GADGET,
        10,
        "power must be within [0, 100]",
        move |gadget, ctx| {
            executions.fetch_add(1, Ordering::SeqCst);
            validate_range(ctx, "power", gadget.power, 0, 100)
        },
    )
}

fn child_operations(context: &ValidationContext) -> Vec<&str> {
    context
        .children()
        .iter()
        .map(|child| child.operation_name())
        .collect()
}

#[test]
fn cached_validation_executes_once() {
    let engine = engine();
    let executions = Arc::new(AtomicUsize::new(0));
    engine.register_rule(power_rule(executions.clone())).unwrap();
    let gadget = Gadget::new("lamp", 50);

    let first = engine.validate_with_cache(&gadget, false);
    let second = engine.validate_with_cache(&gadget, false);

    assert!(first.valid && !first.cached);
    assert!(second.valid && second.cached);
    assert!(Arc::ptr_eq(&first.context, &second.context));
    assert_eq!(executions.load(Ordering::SeqCst), 1);

    let stats = engine.cache_stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    assert_eq!(engine.metrics_snapshot().total_validations, 1);
}

#[test]
fn fingerprint_change_forces_revalidation() {
    let engine = engine();
    let executions = Arc::new(AtomicUsize::new(0));
    engine.register_rule(power_rule(executions.clone())).unwrap();

    let mut gadget = Gadget::new("lamp", 50);
    assert!(engine.validate_with_cache(&gadget, false).valid);

    gadget.label = "not a validated field".into();
    assert!(engine.validate_with_cache(&gadget, false).cached);

    gadget.power = 500;
    let outcome = engine.validate_with_cache(&gadget, false);
    assert!(!outcome.valid);
    assert!(!outcome.cached);
    assert_eq!(executions.load(Ordering::SeqCst), 2);
    assert_eq!(
        outcome.context.blocking_messages(),
        vec!["power value 500 is outside range [0, 100]"]
    );
}

#[test]
fn force_revalidate_bypasses_and_refreshes_cache() {
    let engine = engine();
    let executions = Arc::new(AtomicUsize::new(0));
    engine.register_rule(power_rule(executions.clone())).unwrap();
    let gadget = Gadget::new("lamp", 50);

    engine.validate_with_cache(&gadget, false);
    let forced = engine.validate_with_cache(&gadget, true);
    assert!(!forced.cached);
    assert_eq!(executions.load(Ordering::SeqCst), 2);

    let cached = engine.validate_with_cache(&gadget, false);
    assert!(Arc::ptr_eq(&forced.context, &cached.context));
}

#[test]
fn rules_run_by_priority_then_registration_order() {
    let engine = engine();
    for (name, priority) in [("r1", 10), ("r2", 5), ("r3", 10)] {
        engine
            .register_rule(RuleDefinition::new(name, GADGET, priority, "", |_, _| true))
            .unwrap();
    }

    let outcome = engine.validate(&Gadget::new("lamp", 1));
    assert_eq!(child_operations(&outcome.context), vec!["r1", "r3", "r2"]);
    assert!(
        outcome
            .context
            .children()
            .iter()
            .all(|child| child.system_name() == RULE_SYSTEM && child.completed_at().is_some())
    );
}

#[test]
fn ancestor_rules_apply_and_failures_do_not_short_circuit() {
    let engine = engine();
    engine
        .register_rule(RuleDefinition::new(
            "record.name",
            RECORD,
            100,
            "name required",
            |object, ctx| validation::require_non_empty(ctx, "name", object.object_name()),
        ))
        .unwrap();
    engine.register_rule(power_rule(Arc::default())).unwrap();

    let outcome = engine.validate(&Gadget::new("", -1));
    assert!(!outcome.valid);
    assert_eq!(
        child_operations(&outcome.context),
        vec!["record.name", "gadget.power_range"]
    );
    assert_eq!(outcome.context.count(Severity::Critical), 1);
    assert_eq!(outcome.context.count(Severity::Error), 1);

    let widget = engine.validate(&Widget { name: "w".into() });
    assert!(widget.valid);
    assert_eq!(child_operations(&widget.context), vec!["record.name"]);
}

#[test]
fn silent_failure_gets_a_blocking_issue() {
    let engine = engine();
    engine
        .register_rule(RuleDefinition::new("quiet", GADGET, 0, "", |_, ctx| {
            ctx.warning("only a warning");
            false
        }))
        .unwrap();

    let outcome = engine.validate(&Gadget::new("lamp", 1));
    assert!(!outcome.valid);
    assert_eq!(outcome.context.blocking_messages(), vec!["rule 'quiet' failed"]);
}

#[test]
fn blocking_issue_fails_even_when_rule_reports_success() {
    let engine = engine();
    engine
        .register_rule(RuleDefinition::new("lenient", GADGET, 0, "", |_, ctx| {
            ctx.error("power source missing");
            true
        }))
        .unwrap();

    let outcome = engine.validate(&Gadget::new("lamp", 1));
    assert!(!outcome.valid);
    assert_eq!(outcome.valid, outcome.context.is_valid());
    assert_eq!(outcome.context.blocking_messages(), vec!["power source missing"]);
}

#[test]
fn type_without_rules_passes() {
    let engine = engine();
    let outcome = engine.validate(&Widget { name: "w".into() });

    assert!(outcome.valid);
    assert!(outcome.context.children().is_empty());
    assert_eq!(outcome.context.highest_severity(), Some(Severity::Info));
}

#[test]
fn registry_changes_clear_cache() {
    let engine = engine();
    engine.register_rule(power_rule(Arc::default())).unwrap();
    let gadget = Gadget::new("lamp", 50);
    engine.validate_with_cache(&gadget, false);
    assert_eq!(engine.cache_stats().entries, 1);

    assert_eq!(
        engine.register_rule(power_rule(Arc::default())).unwrap(),
        Registration::Duplicate
    );
    assert_eq!(engine.cache_stats().entries, 1);

    assert!(engine.unregister_rule("gadget.power_range", GADGET));
    assert_eq!(engine.cache_stats().entries, 0);
    assert!(!engine.unregister_rule("gadget.power_range", GADGET));
}

#[test]
fn rule_change_during_validation_is_not_served_from_cache() {
    let engine = engine();
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let pause_once = Arc::new(AtomicBool::new(true));
    {
        let (entered, release, pause_once) =
            (entered.clone(), release.clone(), pause_once.clone());
        engine
            .register_rule(RuleDefinition::new("gadget.slow", GADGET, 0, "", move |_, _| {
                if pause_once.swap(false, Ordering::SeqCst) {
                    entered.wait();
                    release.wait();
                }
                true
            }))
            .unwrap();
    }
    let gadget = Gadget::new("lamp", 1);

    thread::scope(|scope| {
        let in_flight = scope.spawn(|| engine.validate_with_cache(&gadget, false));
        entered.wait();
        engine
            .register_rule(RuleDefinition::new("gadget.never", GADGET, 5, "", |_, ctx| {
                ctx.error("never valid");
                false
            }))
            .unwrap();
        release.wait();
        assert!(in_flight.join().unwrap().valid);
    });

    let after = engine.validate_with_cache(&gadget, false);
    assert!(!after.cached);
    assert!(!after.valid);
    assert_eq!(after.context.blocking_messages(), vec!["never valid"]);

    let again = engine.validate_with_cache(&gadget, false);
    assert!(again.cached && !again.valid);
}

#[test]
fn invalidate_cache_evicts_one_entry() {
    let engine = engine();
    let lamp = Gadget::new("lamp", 1);
    let fan = Gadget::new("fan", 2);
    engine.validate_with_cache(&lamp, false);
    engine.validate_with_cache(&fan, false);

    assert!(engine.invalidate_cache(&lamp.object_key()));
    assert!(engine.cached_entry(&lamp.object_key()).is_none());
    assert!(engine.cached_entry(&fan.object_key()).is_some());
    assert_eq!(engine.clear_cache(), 1);
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ValidationObserver for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn before_validation(&self, key: &ObjectKey) {
        self.events.lock().unwrap().push(format!("before {key}"));
    }

    fn after_validation(&self, key: &ObjectKey, context: &ValidationContext) {
        self.events
            .lock()
            .unwrap()
            .push(format!("after {key} valid={}", context.is_valid()));
    }

    fn on_blocking_issue(&self, _key: &ObjectKey, issue: &Issue) {
        self.events.lock().unwrap().push(format!("issue {issue}"));
    }
}

#[test]
fn observers_see_fresh_validations_only() {
    let engine = engine();
    engine.register_rule(power_rule(Arc::default())).unwrap();
    let recorder = Arc::new(Recorder::default());
    engine.add_observer(recorder.clone());

    let gadget = Gadget::new("lamp", 101);
    engine.validate_with_cache(&gadget, false);
    engine.validate_with_cache(&gadget, false);

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "before gadget/lamp".to_string(),
            "issue [ERROR] power value 101 is outside range [0, 100]".to_string(),
            "after gadget/lamp valid=false".to_string(),
        ]
    );
}

#[test]
fn metrics_reflect_fresh_executions() {
    let engine = engine();
    engine.register_rule(power_rule(Arc::default())).unwrap();
    engine.validate(&Gadget::new("ok", 10));
    engine.validate(&Gadget::new("bad", -3));
    engine.validate(&Gadget::new("worse", -3));

    let snapshot = engine.metrics_snapshot();
    assert_eq!(snapshot.total_validations, 3);
    assert_eq!(snapshot.failed_validations, 2);
    assert_eq!(
        snapshot.error_frequency["power value -3 is outside range [0, 100]"],
        2
    );
    assert_eq!(snapshot.rule_timings["gadget.power_range"].count, 3);
    assert_eq!(snapshot.system_timings["gadget"].count, 3);
    assert!(engine.metrics_report().contains("Total validations: 3"));

    engine.reset_metrics();
    assert_eq!(engine.metrics_snapshot().total_validations, 0);

    engine.restore_metrics(snapshot.clone());
    assert_eq!(engine.metrics_snapshot().failed_validations, 2);
}

#[test]
fn concurrent_cached_validation_is_consistent() {
    let engine = engine();
    let executions = Arc::new(AtomicUsize::new(0));
    engine.register_rule(power_rule(executions.clone())).unwrap();
    let gadgets: Vec<_> = (0..16).map(|i| Gadget::new(&format!("g{i}"), i)).collect();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for gadget in &gadgets {
                    assert!(engine.validate_with_cache(gadget, false).valid);
                }
            });
        }
    });

    let stats = engine.cache_stats();
    let ran = executions.load(Ordering::SeqCst) as u64;
    assert_eq!(stats.entries, gadgets.len());
    assert_eq!(stats.hits + stats.misses, 8 * gadgets.len() as u64);
    assert_eq!(stats.misses, ran);
    assert_eq!(engine.metrics_snapshot().total_validations, ran);
}
