use validation::{RuleDefinition, require_positive};

use super::{PRIORITY_CONSISTENCY, PRIORITY_RANGE, in_range};
use crate::RecordLimits;
use crate::records::{UPGRADE, UpgradeConfig};

pub(super) fn rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::typed::<UpgradeConfig, _>(
            "upgrade.base_cost",
            UPGRADE,
            PRIORITY_RANGE,
            "Base cost is positive",
            |upgrade, ctx| require_positive(ctx, "base_cost", upgrade.base_cost),
        ),
        RuleDefinition::typed::<UpgradeConfig, _>(
            "upgrade.scaling_factor",
            UPGRADE,
            PRIORITY_RANGE,
            "Scaling factor grows the cost",
            |upgrade, ctx| {
                let factor = upgrade.scaling_factor;
                if !factor.is_finite() || factor <= 1.0 {
                    ctx.error(format!(
                        "scaling_factor value {factor} must be greater than 1"
                    ));
                    return false;
                }
                true
            },
        ),
        RuleDefinition::typed::<UpgradeConfig, _>(
            "upgrade.max_level",
            UPGRADE,
            PRIORITY_RANGE,
            "Max level within limits",
            |upgrade, ctx| in_range(ctx, "max_level", upgrade.max_level, RecordLimits::MAX_LEVEL),
        ),
        RuleDefinition::typed::<UpgradeConfig, _>(
            "upgrade.cost_curve",
            UPGRADE,
            PRIORITY_CONSISTENCY,
            "Cost strictly increases with level",
            |upgrade, ctx| {
                // Only meaningful once the inputs themselves are sane.
                let (_, level_cap) = RecordLimits::MAX_LEVEL;
                if upgrade.scaling_factor <= 1.0
                    || !upgrade.scaling_factor.is_finite()
                    || upgrade.max_level > level_cap
                {
                    return true;
                }
                let curve = upgrade.cost_curve();
                for (index, pair) in curve.windows(2).enumerate() {
                    if pair[1] <= pair[0] {
                        let level = index + 1;
                        ctx.error(format!(
                            "cost does not increase from level {level} ({}) to level {} ({})",
                            pair[0],
                            level + 1,
                            pair[1]
                        ));
                        return false;
                    }
                }
                ctx.set_metadata(
                    "max_cost",
                    curve.last().copied().unwrap_or_default().to_string(),
                );
                true
            },
        ),
    ]
}
