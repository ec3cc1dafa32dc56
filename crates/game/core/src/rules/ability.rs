use validation::RuleDefinition;

use super::{PRIORITY_CONSISTENCY, PRIORITY_RANGE, in_range};
use crate::RecordLimits;
use crate::records::{ABILITY, AbilityConfig};

pub(super) fn rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::typed::<AbilityConfig, _>(
            "ability.timing",
            ABILITY,
            PRIORITY_RANGE,
            "Cooldown and duration within limits",
            |ability, ctx| {
                in_range(ctx, "cooldown", ability.cooldown, RecordLimits::COOLDOWN)
                    & in_range(ctx, "duration", ability.duration, RecordLimits::DURATION)
            },
        ),
        RuleDefinition::typed::<AbilityConfig, _>(
            "ability.cost_range",
            ABILITY,
            PRIORITY_RANGE,
            "Cost within limits",
            |ability, ctx| in_range(ctx, "cost", ability.cost, RecordLimits::ABILITY_COST),
        ),
        RuleDefinition::typed::<AbilityConfig, _>(
            "ability.radius_range",
            ABILITY,
            PRIORITY_RANGE,
            "Radius within limits",
            |ability, ctx| in_range(ctx, "radius", ability.radius, RecordLimits::RADIUS),
        ),
        RuleDefinition::typed::<AbilityConfig, _>(
            "ability.overlap",
            ABILITY,
            PRIORITY_CONSISTENCY,
            "Flags effects that outlast their cooldown",
            |ability, ctx| {
                if ability.duration > ability.cooldown {
                    ctx.warning(format!(
                        "duration {} exceeds cooldown {}; effects can stack",
                        ability.duration, ability.cooldown
                    ));
                }
                true
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::records::{AbilityConfig, record_hierarchy};
    use crate::rules::register_default_rules;
    use validation::{Severity, ValidationEngine};

    #[test]
    fn test_overlap_is_only_a_warning() {
        let engine = ValidationEngine::new(record_hierarchy().unwrap());
        register_default_rules(&engine).unwrap();

        let mut ability = AbilityConfig::new("aura");
        ability.cooldown = 2.0;
        ability.duration = 8.0;

        let outcome = engine.validate(&ability);
        assert!(outcome.valid);
        assert_eq!(outcome.context.count(Severity::Warning), 1);
    }
}
