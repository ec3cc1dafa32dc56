use std::any::Any;

use validation::{FieldHasher, TypeTag, Validatable};

use super::{Combatant, MONSTER};

/// Enemy definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterConfig {
    pub name: String,
    pub max_health: f64,
    pub move_speed: f64,
    pub armor: f64,
    /// Contact damage.
    pub damage: f64,
    pub experience_reward: u32,
    /// Relative spawn frequency. Zero disables spawning.
    pub spawn_weight: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
}

impl MonsterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_health: 20.0,
            move_speed: 150.0,
            armor: 0.0,
            damage: 5.0,
            experience_reward: 1,
            spawn_weight: 1.0,
            abilities: Vec::new(),
        }
    }
}

impl Combatant for MonsterConfig {
    fn max_health(&self) -> f64 {
        self.max_health
    }

    fn move_speed(&self) -> f64 {
        self.move_speed
    }

    fn armor(&self) -> f64 {
        self.armor
    }
}

impl Validatable for MonsterConfig {
    fn type_tag(&self) -> TypeTag {
        MONSTER
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn hash_fields(&self, hasher: &mut FieldHasher) {
        hasher.write_str(&self.name);
        hasher.write_f64(self.max_health);
        hasher.write_f64(self.move_speed);
        hasher.write_f64(self.armor);
        hasher.write_f64(self.damage);
        hasher.write_u32(self.experience_reward);
        hasher.write_f64(self.spawn_weight);
        hasher.write_strs(&self.abilities);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
