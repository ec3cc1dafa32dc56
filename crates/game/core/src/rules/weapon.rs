use validation::RuleDefinition;

use super::{PRIORITY_RANGE, in_range};
use crate::RecordLimits;
use crate::records::{WEAPON, WeaponConfig};

pub(super) fn rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::typed::<WeaponConfig, _>(
            "weapon.damage_range",
            WEAPON,
            PRIORITY_RANGE,
            "Damage within limits",
            |weapon, ctx| in_range(ctx, "damage", weapon.damage, RecordLimits::DAMAGE),
        ),
        RuleDefinition::typed::<WeaponConfig, _>(
            "weapon.attack_speed_range",
            WEAPON,
            PRIORITY_RANGE,
            "Attack speed within limits",
            |weapon, ctx| {
                in_range(
                    ctx,
                    "attack_speed",
                    weapon.attack_speed,
                    RecordLimits::ATTACK_SPEED,
                )
            },
        ),
        RuleDefinition::typed::<WeaponConfig, _>(
            "weapon.range_range",
            WEAPON,
            PRIORITY_RANGE,
            "Range within limits",
            |weapon, ctx| in_range(ctx, "range", weapon.range, RecordLimits::WEAPON_RANGE),
        ),
        RuleDefinition::typed::<WeaponConfig, _>(
            "weapon.crit",
            WEAPON,
            PRIORITY_RANGE,
            "Crit chance is a probability and the multiplier is at least 1",
            |weapon, ctx| {
                in_range(
                    ctx,
                    "crit_chance",
                    weapon.crit_chance,
                    RecordLimits::CRIT_CHANCE,
                ) & in_range(
                    ctx,
                    "crit_multiplier",
                    weapon.crit_multiplier,
                    RecordLimits::CRIT_MULTIPLIER,
                )
            },
        ),
        RuleDefinition::typed::<WeaponConfig, _>(
            "weapon.projectiles",
            WEAPON,
            PRIORITY_RANGE,
            "Projectile count within limits",
            |weapon, ctx| {
                in_range(
                    ctx,
                    "projectile_count",
                    weapon.projectile_count,
                    RecordLimits::PROJECTILES,
                )
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::records::{WeaponConfig, record_hierarchy};
    use crate::rules::register_default_rules;
    use validation::ValidationEngine;

    #[test]
    fn test_rules_report_every_bad_field() {
        let engine = ValidationEngine::new(record_hierarchy().unwrap());
        register_default_rules(&engine).unwrap();

        let mut weapon = WeaponConfig::new("");
        weapon.crit_chance = 1.5;
        weapon.projectile_count = 0;
        weapon.attack_speed = f64::NAN;

        let outcome = engine.validate(&weapon);
        assert!(!outcome.valid);
        assert_eq!(
            outcome.context.blocking_messages(),
            vec![
                "name must not be empty",
                "attack_speed value NaN is not a finite number",
                "crit_chance value 1.5 is outside range [0, 1]",
                "projectile_count value 0 is outside range [1, 32]",
            ]
        );
    }

    #[test]
    fn test_boundaries_pass() {
        let engine = ValidationEngine::new(record_hierarchy().unwrap());
        register_default_rules(&engine).unwrap();

        let mut weapon = WeaponConfig::new("edge");
        weapon.crit_chance = 1.0;
        weapon.damage = 10_000.0;
        weapon.attack_speed = 0.1;
        assert!(engine.validate(&weapon).valid);
    }
}
