//! Default rule set for configuration records.
//!
//! Rules are grouped by the record type they target. Structural checks
//! (missing names) run first, then per-field ranges, then cross-field
//! consistency checks.

mod ability;
mod combatant;
mod upgrade;
mod weapon;

use validation::{
    RangeValue, Registration, RegistryError, RuleDefinition, ValidationContext, ValidationEngine,
    require_non_empty, validate_range,
};

use crate::records::{CONFIG_RECORD, record_hierarchy};

pub const PRIORITY_STRUCTURE: i32 = 100;
pub const PRIORITY_RANGE: i32 = 50;
pub const PRIORITY_CONSISTENCY: i32 = 10;

/// Every default rule, in registration order.
pub fn default_rules() -> Vec<RuleDefinition> {
    let mut rules = vec![RuleDefinition::new(
        "record.name_required",
        CONFIG_RECORD,
        PRIORITY_STRUCTURE,
        "Every record needs a non-empty name",
        |record, ctx| require_non_empty(ctx, "name", record.object_name()),
    )];
    rules.extend(combatant::rules());
    rules.extend(weapon::rules());
    rules.extend(ability::rules());
    rules.extend(upgrade::rules());
    rules
}

/// Registers [`default_rules`] with `engine`. Returns how many were added.
pub fn register_default_rules(engine: &ValidationEngine) -> Result<usize, RegistryError> {
    let mut added = 0;
    for rule in default_rules() {
        if engine.register_rule(rule)? == Registration::Added {
            added += 1;
        }
    }
    Ok(added)
}

/// Builds an engine over the record hierarchy with every default rule.
pub fn default_engine() -> Result<ValidationEngine, RegistryError> {
    let engine = ValidationEngine::new(record_hierarchy()?);
    register_default_rules(&engine)?;
    Ok(engine)
}

/// [`validate_range`] over an inclusive `(min, max)` pair.
pub(crate) fn in_range<T: RangeValue>(
    ctx: &mut ValidationContext,
    field: &str,
    value: T,
    (min, max): (T, T),
) -> bool {
    validate_range(ctx, field, value, min, max)
}
