use std::any::Any;

use validation::{FieldHasher, TypeTag, Validatable};

use super::ABILITY;

/// Active ability definition. Times are in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityConfig {
    pub name: String,
    pub cooldown: f64,
    /// Resource cost per cast.
    pub cost: f64,
    /// Zero for instant abilities.
    pub duration: f64,
    /// Area of effect. Zero for single-target abilities.
    pub radius: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl AbilityConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cooldown: 5.0,
            cost: 10.0,
            duration: 0.0,
            radius: 0.0,
            description: String::new(),
        }
    }
}

impl Validatable for AbilityConfig {
    fn type_tag(&self) -> TypeTag {
        ABILITY
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn hash_fields(&self, hasher: &mut FieldHasher) {
        hasher.write_str(&self.name);
        hasher.write_f64(self.cooldown);
        hasher.write_f64(self.cost);
        hasher.write_f64(self.duration);
        hasher.write_f64(self.radius);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
