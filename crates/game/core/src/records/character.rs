use std::any::Any;

use validation::{FieldHasher, TypeTag, Validatable};

use super::{CHARACTER, Combatant};

/// Playable character definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterConfig {
    pub name: String,
    pub max_health: f64,
    pub move_speed: f64,
    pub armor: f64,
    /// Radius within which dropped items are collected.
    pub pickup_radius: f64,
    /// Weapon the character spawns with, by name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_weapon: Option<String>,
    /// Starting abilities, by name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl CharacterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_health: 100.0,
            move_speed: 300.0,
            armor: 0.0,
            pickup_radius: 50.0,
            starting_weapon: None,
            abilities: Vec::new(),
            description: String::new(),
        }
    }
}

impl Combatant for CharacterConfig {
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

impl Validatable for CharacterConfig {
    fn type_tag(&self) -> TypeTag {
        CHARACTER
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn hash_fields(&self, hasher: &mut FieldHasher) {
        hasher.write_str(&self.name);
        hasher.write_f64(self.max_health);
        hasher.write_f64(self.move_speed);
        hasher.write_f64(self.armor);
        hasher.write_f64(self.pickup_radius);
        hasher.write_opt_str(self.starting_weapon.as_deref());
        hasher.write_strs(&self.abilities);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
