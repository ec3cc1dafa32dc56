use std::collections::HashSet;

use validation::RuleDefinition;

use super::{PRIORITY_CONSISTENCY, PRIORITY_RANGE, PRIORITY_STRUCTURE, in_range};
use crate::RecordLimits;
use crate::records::{
    CHARACTER, COMBATANT, CharacterConfig, MONSTER, MonsterConfig, combatant_view,
};

pub(super) fn rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::new(
            "combatant.stat_ranges",
            COMBATANT,
            PRIORITY_RANGE,
            "Health, move speed, and armor within limits",
            |record, ctx| {
                let Some(combatant) = combatant_view(record) else {
                    ctx.critical(format!(
                        "'{}' is registered as a combatant but has no combatant stats",
                        record.type_tag()
                    ));
                    return false;
                };
                in_range(ctx, "max_health", combatant.max_health(), RecordLimits::MAX_HEALTH)
                    & in_range(ctx, "move_speed", combatant.move_speed(), RecordLimits::MOVE_SPEED)
                    & in_range(ctx, "armor", combatant.armor(), RecordLimits::ARMOR)
            },
        ),
        RuleDefinition::typed::<CharacterConfig, _>(
            "character.starting_weapon",
            CHARACTER,
            PRIORITY_STRUCTURE,
            "Starting weapon is optional but should be set",
            |character, ctx| match character.starting_weapon.as_deref() {
                None => {
                    ctx.warning("starting_weapon is not set");
                    true
                }
                Some(weapon) if weapon.trim().is_empty() => {
                    ctx.error("starting_weapon must not be empty when set");
                    false
                }
                Some(_) => true,
            },
        ),
        RuleDefinition::typed::<CharacterConfig, _>(
            "character.pickup_radius",
            CHARACTER,
            PRIORITY_RANGE,
            "Pickup radius within limits",
            |character, ctx| {
                in_range(
                    ctx,
                    "pickup_radius",
                    character.pickup_radius,
                    RecordLimits::PICKUP_RADIUS,
                )
            },
        ),
        RuleDefinition::typed::<CharacterConfig, _>(
            "character.ability_slots",
            CHARACTER,
            PRIORITY_CONSISTENCY,
            "At most MAX_ABILITY_SLOTS distinct starting abilities",
            |character, ctx| {
                let mut seen = HashSet::new();
                for ability in &character.abilities {
                    if !seen.insert(ability.as_str()) {
                        ctx.warning(format!("ability '{ability}' is listed more than once"));
                    }
                }
                let count = character.abilities.len();
                if count > RecordLimits::MAX_ABILITY_SLOTS {
                    ctx.error(format!(
                        "abilities has {count} entries, at most {} allowed",
                        RecordLimits::MAX_ABILITY_SLOTS
                    ));
                    return false;
                }
                true
            },
        ),
        RuleDefinition::typed::<MonsterConfig, _>(
            "monster.damage_range",
            MONSTER,
            PRIORITY_RANGE,
            "Contact damage within limits",
            |monster, ctx| in_range(ctx, "damage", monster.damage, RecordLimits::DAMAGE),
        ),
        RuleDefinition::typed::<MonsterConfig, _>(
            "monster.rewards",
            MONSTER,
            PRIORITY_RANGE,
            "Experience reward and spawn weight within limits",
            |monster, ctx| {
                let valid = in_range(
                    ctx,
                    "experience_reward",
                    monster.experience_reward,
                    RecordLimits::EXPERIENCE_REWARD,
                ) & in_range(
                    ctx,
                    "spawn_weight",
                    monster.spawn_weight,
                    RecordLimits::SPAWN_WEIGHT,
                );
                if valid && monster.spawn_weight == 0.0 {
                    ctx.info("spawn_weight is zero; monster never spawns");
                }
                valid
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::records::{CharacterConfig, MonsterConfig, record_hierarchy};
    use crate::rules::register_default_rules;
    use validation::{Severity, ValidationEngine};

    fn engine() -> ValidationEngine {
        let engine = ValidationEngine::new(record_hierarchy().unwrap());
        register_default_rules(&engine).unwrap();
        engine
    }

    #[test]
    fn test_missing_starting_weapon_is_a_warning() {
        let outcome = engine().validate(&CharacterConfig::new("rogue"));
        assert!(outcome.valid);
        assert_eq!(outcome.context.count(Severity::Warning), 1);
    }

    #[test]
    fn test_combatant_ranges_apply_to_monsters() {
        let mut monster = MonsterConfig::new("glass_slime");
        monster.max_health = 0.0;
        monster.armor = -5.0;

        let outcome = engine().validate(&monster);
        assert!(!outcome.valid);
        assert_eq!(
            outcome.context.blocking_messages(),
            vec![
                "max_health value 0 is outside range [1, 100000]",
                "armor value -5 is outside range [0, 1000]",
            ]
        );
    }

    #[test]
    fn test_too_many_abilities() {
        let mut character = CharacterConfig::new("mage");
        character.starting_weapon = Some("staff".into());
        character.abilities = ["a", "b", "c", "d", "a"].map(String::from).to_vec();

        let outcome = engine().validate(&character);
        assert!(!outcome.valid);
        assert_eq!(outcome.context.count(Severity::Warning), 1);
        assert_eq!(
            outcome.context.blocking_messages(),
            vec!["abilities has 5 entries, at most 4 allowed"]
        );
    }

    #[test]
    fn test_zero_spawn_weight_is_informational() {
        let mut monster = MonsterConfig::new("statue");
        monster.spawn_weight = 0.0;
        let outcome = engine().validate(&monster);
        assert!(outcome.valid);
        assert_eq!(outcome.context.count(Severity::Info), 1);
    }
}
