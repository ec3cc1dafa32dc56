use std::any::Any;

use validation::{FieldHasher, TypeTag, Validatable};

use super::UPGRADE;

/// Purchasable upgrade with an exponential cost curve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeConfig {
    pub name: String,
    pub base_cost: u64,
    /// Per-level cost multiplier. Must exceed 1 for the curve to grow.
    pub scaling_factor: f64,
    pub max_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl UpgradeConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_cost: 100,
            scaling_factor: 1.5,
            max_level: 10,
            description: String::new(),
        }
    }

    /// Cost of buying `level`.
    ///
    /// `round(base_cost * scaling_factor ^ clamp(level, 1, max_level))`,
    /// rounded half-up. Results beyond `u64::MAX` saturate and a non-finite
    /// product yields zero.
    pub fn cost(&self, level: u32) -> u64 {
        let level = level.clamp(1, self.max_level.max(1));
        let exponent = i32::try_from(level).unwrap_or(i32::MAX);
        let raw = self.base_cost as f64 * self.scaling_factor.powi(exponent);
        if raw.is_nan() {
            return 0;
        }
        // Float-to-int `as` saturates at both ends.
        (raw + 0.5).floor() as u64
    }

    /// Costs for levels `1..=max_level`.
    pub fn cost_curve(&self) -> Vec<u64> {
        (1..=self.max_level.max(1)).map(|level| self.cost(level)).collect()
    }
}

impl Validatable for UpgradeConfig {
    fn type_tag(&self) -> TypeTag {
        UPGRADE
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn hash_fields(&self, hasher: &mut FieldHasher) {
        hasher.write_str(&self.name);
        hasher.write_u64(self.base_cost);
        hasher.write_f64(self.scaling_factor);
        hasher.write_u32(self.max_level);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_formula_rounds_half_up() {
        let upgrade = UpgradeConfig::new("damage_up");
        assert_eq!(upgrade.cost(1), 150);
        assert_eq!(upgrade.cost(2), 225);
        assert_eq!(upgrade.cost(3), 338);
        assert_eq!(upgrade.cost(5), 759);
        assert_eq!(upgrade.cost(10), 5767);
    }

    #[test]
    fn test_cost_clamps_level() {
        let upgrade = UpgradeConfig::new("damage_up");
        assert_eq!(upgrade.cost(0), upgrade.cost(1));
        assert_eq!(upgrade.cost(99), upgrade.cost(10));
    }

    #[test]
    fn test_cost_curve_strictly_increasing() {
        let curve = UpgradeConfig::new("damage_up").cost_curve();
        assert_eq!(curve.len(), 10);
        assert!(curve.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_cost_saturates() {
        let mut upgrade = UpgradeConfig::new("absurd");
        upgrade.base_cost = u64::MAX;
        upgrade.scaling_factor = 10.0;
        assert_eq!(upgrade.cost(5), u64::MAX);

        upgrade.max_level = 0;
        assert_eq!(upgrade.cost(7), u64::MAX);
    }
}
