use game_core::{
    CharacterConfig, ConfigKind, MonsterConfig, UpgradeConfig, WeaponConfig, record_hierarchy,
    register_default_rules,
};
use strum::IntoEnumIterator;
use validation::{ValidationEngine, fingerprint};

fn engine() -> ValidationEngine {
    let engine = ValidationEngine::new(record_hierarchy().unwrap());
    register_default_rules(&engine).unwrap();
    engine
}

#[test]
fn character_rules_interleave_ancestors_by_priority() {
    let engine = engine();
    let names: Vec<_> = engine
        .rules_for(ConfigKind::Character.type_tag())
        .iter()
        .map(|rule| rule.name().to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "record.name_required",
            "character.starting_weapon",
            "combatant.stat_ranges",
            "character.pickup_radius",
            "character.ability_slots",
        ]
    );
}

#[test]
fn every_kind_has_rules() {
    let engine = engine();
    for kind in ConfigKind::iter() {
        assert!(
            engine.rules_for(kind.type_tag()).len() > 1,
            "{kind} has no type-specific rules"
        );
    }
}

#[test]
fn defaults_pass_validation() {
    let engine = engine();
    let mut knight = CharacterConfig::new("knight");
    knight.starting_weapon = Some("longsword".into());

    assert!(engine.validate(&knight).valid);
    assert!(engine.validate(&WeaponConfig::new("longsword")).valid);
    assert!(engine.validate(&MonsterConfig::new("slime")).valid);
    assert!(engine.validate(&UpgradeConfig::new("armor_up")).valid);
}

#[test]
fn cached_verdict_follows_record_content() {
    let engine = engine();
    let mut weapon = WeaponConfig::new("longsword");
    let before = fingerprint(&weapon);
    assert!(!engine.validate_with_cache(&weapon, false).cached);
    assert!(engine.validate_with_cache(&weapon, false).cached);

    weapon.damage = -1.0;
    assert_ne!(fingerprint(&weapon), before);
    let outcome = engine.validate_with_cache(&weapon, false);
    assert!(!outcome.cached);
    assert!(!outcome.valid);
}
