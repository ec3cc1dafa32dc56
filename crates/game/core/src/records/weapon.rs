use std::any::Any;

use validation::{FieldHasher, TypeTag, Validatable};

use super::WEAPON;

/// Weapon definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponConfig {
    pub name: String,
    pub damage: f64,
    /// Attacks per second.
    pub attack_speed: f64,
    pub range: f64,
    /// Probability in `[0, 1]`.
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub projectile_count: u32,
    /// Flavor text. Not validated.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl WeaponConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            damage: 10.0,
            attack_speed: 1.0,
            range: 100.0,
            crit_chance: 0.05,
            crit_multiplier: 2.0,
            projectile_count: 1,
            description: String::new(),
        }
    }

    /// Average damage per second including crits.
    pub fn expected_dps(&self) -> f64 {
        let crit_bonus = 1.0 + self.crit_chance * (self.crit_multiplier - 1.0);
        self.damage * self.attack_speed * f64::from(self.projectile_count) * crit_bonus
    }
}

impl Validatable for WeaponConfig {
    fn type_tag(&self) -> TypeTag {
        WEAPON
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn hash_fields(&self, hasher: &mut FieldHasher) {
        hasher.write_str(&self.name);
        hasher.write_f64(self.damage);
        hasher.write_f64(self.attack_speed);
        hasher.write_f64(self.range);
        hasher.write_f64(self.crit_chance);
        hasher.write_f64(self.crit_multiplier);
        hasher.write_u32(self.projectile_count);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
