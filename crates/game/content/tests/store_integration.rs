use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use game_content::{
    ConfigStore, ContentFactory, StoreError, StoreSettings, StoreState, SweepOptions,
};
use game_core::{
    AbilityConfig, CharacterConfig, ConfigKind, MonsterConfig, UpgradeConfig, WeaponConfig,
    default_engine,
};
use validation::Severity;

fn bundled_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn empty_store() -> ConfigStore {
    ConfigStore::new(Arc::new(default_engine().unwrap()), StoreSettings::default())
}

/// Store with `count` weapons, where the indices in `broken` have negative damage.
fn weapon_store(count: usize, broken: &[usize]) -> ConfigStore {
    let mut store = empty_store();
    store.begin_loading().unwrap();
    for index in 0..count {
        let mut weapon = WeaponConfig::new(format!("weapon_{index:02}"));
        if broken.contains(&index) {
            weapon.damage = -1.0;
        }
        store.insert(weapon).unwrap();
    }
    store.finish_loading().unwrap();
    store
}

#[test]
fn bundled_content_loads_and_passes_sweep() {
    let factory = ContentFactory::new(bundled_data());
    let settings = factory.load_settings().unwrap();
    let mut store = ConfigStore::new(Arc::new(default_engine().unwrap()), settings);

    let loaded = store.load_from(&factory).unwrap();
    assert_eq!(store.state(), StoreState::Ready);
    assert_eq!(loaded, store.len());
    assert_eq!(store.counts()[&ConfigKind::Weapon], 4);
    assert!(store.invalid_on_load().is_empty());

    let sweep = store.validate_all(SweepOptions::default());
    assert!(sweep.valid, "{}", sweep.report);
    assert_eq!(sweep.checked, loaded);
    assert_eq!(sweep.skipped, 0);
    // brawler starts unarmed
    assert_eq!(sweep.context.count(Severity::Warning), 1);
}

#[test]
fn sweep_reports_every_failing_entry() {
    let store = weapon_store(10, &[0, 4, 9]);
    let sweep = store.validate_all(SweepOptions::default());

    assert!(!sweep.valid);
    assert_eq!(sweep.checked, 10);
    let failing: Vec<_> = sweep.failing.iter().map(|key| key.to_string()).collect();
    assert_eq!(
        failing,
        vec!["weapon/weapon_00", "weapon/weapon_04", "weapon/weapon_09"]
    );
    for name in ["weapon_00", "weapon_04", "weapon_09"] {
        assert!(sweep.report.contains(&format!("FAIL weapon/{name}")));
    }
    assert!(!sweep.report.contains("weapon_05"));
    assert!(sweep.report.contains("damage value -1 is outside range [0, 10000]"));
}

#[test]
fn sweep_without_failures_is_valid() {
    let sweep = weapon_store(5, &[]).validate_all(SweepOptions::default());
    assert!(sweep.valid);
    assert!(sweep.failing.is_empty());
}

#[test]
fn sweep_checks_references() {
    let mut store = empty_store();
    store.begin_loading().unwrap();
    let mut hero = CharacterConfig::new("hero");
    hero.starting_weapon = Some("excalibur".into());
    hero.abilities = vec!["dash".into()];
    store.insert(hero).unwrap();
    store.insert(AbilityConfig::new("dash")).unwrap();
    let mut imp = MonsterConfig::new("imp");
    imp.abilities = vec!["teleport".into()];
    store.insert(imp).unwrap();
    store.finish_loading().unwrap();

    let sweep = store.validate_all(SweepOptions::default());
    assert!(!sweep.valid);
    assert_eq!(sweep.failing.len(), 2);
    assert!(
        sweep
            .report
            .contains("references unknown weapon 'excalibur'")
    );
    assert!(sweep.report.contains("references unknown ability 'teleport'"));
}

#[test]
fn sweep_deadline_skips_remaining_entries() {
    let store = weapon_store(5, &[1]);
    let sweep = store.validate_all(SweepOptions {
        force_revalidate: false,
        deadline: Some(Duration::ZERO),
    });

    assert_eq!(sweep.checked, 0);
    assert_eq!(sweep.skipped, 5);
    assert!(sweep.valid);
    assert_eq!(sweep.context.count(Severity::Warning), 1);
}

#[test]
fn sweep_reuses_cached_verdicts() {
    let store = weapon_store(3, &[]);
    let engine = store.engine().clone();
    let executed = engine.metrics_snapshot().total_validations;

    store.validate_all(SweepOptions::default());
    assert_eq!(engine.metrics_snapshot().total_validations, executed);

    store.validate_all(SweepOptions {
        force_revalidate: true,
        deadline: None,
    });
    assert_eq!(engine.metrics_snapshot().total_validations, executed + 3);
}

#[test]
fn lookup_stats_count_hits_and_misses() {
    let store = weapon_store(2, &[]);
    for attempt in 0..3 {
        assert!(store.get::<WeaponConfig>(&format!("missing_{attempt}")).is_none());
    }
    assert!(store.get::<UpgradeConfig>("weapon_00").is_none());
    let weapon = store.get::<WeaponConfig>("weapon_01").unwrap();
    assert_eq!(weapon.name, "weapon_01");
    assert!(store.get_dyn(ConfigKind::Weapon, "weapon_00").is_some());

    let snapshot = store.performance_snapshot();
    assert_eq!(snapshot.cache_misses, 4);
    assert_eq!(snapshot.cache_hits, 2);
    assert_eq!(snapshot.query_count, 6);
    assert!(snapshot.avg_query_time_ms >= 0.0);

    store.reset_performance_stats();
    assert_eq!(store.performance_snapshot().query_count, 0);
}

#[test]
fn lookups_outside_ready_miss() {
    let mut store = empty_store();
    store.begin_loading().unwrap();
    store.insert(WeaponConfig::new("dagger")).unwrap();

    assert!(store.get::<WeaponConfig>("dagger").is_none());
    assert!(store.contains(ConfigKind::Weapon, "dagger"));
    assert_eq!(store.performance_snapshot().cache_misses, 1);

    store.finish_loading().unwrap();
    assert!(store.get::<WeaponConfig>("dagger").is_some());
}

#[test]
fn lifecycle_rejects_illegal_transitions() {
    let mut store = empty_store();
    assert_eq!(
        store.insert(WeaponConfig::new("dagger")),
        Err(StoreError::WrongState {
            expected: StoreState::Loading,
            actual: StoreState::Uninitialized,
        })
    );
    assert!(matches!(
        store.finish_loading(),
        Err(StoreError::InvalidTransition { .. })
    ));

    store.begin_loading().unwrap();
    store.insert(WeaponConfig::new("dagger")).unwrap();
    assert!(matches!(
        store.insert(WeaponConfig::new("dagger")),
        Err(StoreError::DuplicateEntry { .. })
    ));
    store.finish_loading().unwrap();
    assert_eq!(
        store.begin_loading(),
        Err(StoreError::InvalidTransition {
            from: StoreState::Ready,
            to: StoreState::Loading,
        })
    );

    store.get::<WeaponConfig>("dagger");
    store.shutdown().unwrap();
    assert!(store.is_empty());
    assert_eq!(store.performance_snapshot().query_count, 0);
    store.reset().unwrap();
    store.begin_loading().unwrap();
}

#[test]
fn reload_entry_revalidates() {
    let mut store = weapon_store(2, &[]);
    let engine = store.engine().clone();
    let before = engine.metrics_snapshot().total_validations;

    let mut broken = WeaponConfig::new("weapon_00");
    broken.crit_chance = 2.0;
    let outcome = store.reload_entry(broken).unwrap();
    assert!(!outcome.valid);
    assert!(!outcome.cached);
    assert_eq!(engine.metrics_snapshot().total_validations, before + 1);
    assert_eq!(store.invalid_on_load().len(), 1);
    assert_eq!(store.get::<WeaponConfig>("weapon_00").unwrap().crit_chance, 2.0);

    let fixed = store.reload_entry(WeaponConfig::new("weapon_00")).unwrap();
    assert!(fixed.valid);
    assert!(store.invalid_on_load().is_empty());

    assert!(matches!(
        store.reload_entry(WeaponConfig::new("unknown")),
        Err(StoreError::UnknownEntry { .. })
    ));
}

#[test]
fn failed_load_returns_to_uninitialized() {
    let dir = tempfile::tempdir().unwrap();
    for kind in ["characters", "abilities", "upgrades", "monsters"] {
        std::fs::write(dir.path().join(format!("{kind}.ron")), "[]").unwrap();
    }
    std::fs::write(dir.path().join("weapons.ron"), "[ (name: \"broken\" ").unwrap();

    let mut store = empty_store();
    let err = store.load_from(&ContentFactory::new(dir.path())).unwrap_err();
    assert!(matches!(err, StoreError::Load { table: "weapons", .. }));
    assert_eq!(store.state(), StoreState::Uninitialized);
    assert!(store.is_empty());
}

#[test]
fn invalid_records_still_load() {
    let dir = tempfile::tempdir().unwrap();
    for kind in ["characters", "weapons", "abilities", "monsters"] {
        std::fs::write(dir.path().join(format!("{kind}.ron")), "[]").unwrap();
    }
    std::fs::write(
        dir.path().join("upgrades.ron"),
        "[ (name: \"flat\", base_cost: 0, scaling_factor: 1.0, max_level: 3) ]",
    )
    .unwrap();

    let mut store = empty_store();
    assert_eq!(store.load_from(&ContentFactory::new(dir.path())).unwrap(), 1);
    assert_eq!(store.invalid_on_load().len(), 1);
    assert_eq!(store.names(ConfigKind::Upgrade), vec!["flat"]);
}
