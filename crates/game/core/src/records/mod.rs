//! Configuration records and their type hierarchy.
//!
//! Records are plain data: created once at load time and never mutated. Each
//! implements [`Validatable`] with an explicit list of fingerprinted fields.
//!
//! ```text
//! config_record
//! ├── combatant
//! │   ├── character
//! │   └── monster
//! ├── weapon
//! ├── ability
//! └── upgrade
//! ```

mod ability;
mod character;
mod monster;
mod upgrade;
mod weapon;

pub use ability::AbilityConfig;
pub use character::CharacterConfig;
pub use monster::MonsterConfig;
pub use upgrade::UpgradeConfig;
pub use weapon::WeaponConfig;

use validation::{RegistryError, TypeHierarchy, TypeTag, Validatable};

/// Root of every configuration record.
pub const CONFIG_RECORD: TypeTag = TypeTag::new("config_record");
/// Anything with health, speed, and armor.
pub const COMBATANT: TypeTag = TypeTag::new("combatant");
pub const CHARACTER: TypeTag = TypeTag::new("character");
pub const MONSTER: TypeTag = TypeTag::new("monster");
pub const WEAPON: TypeTag = TypeTag::new("weapon");
pub const ABILITY: TypeTag = TypeTag::new("ability");
pub const UPGRADE: TypeTag = TypeTag::new("upgrade");

/// Builds the supertype table for every record type.
pub fn record_hierarchy() -> Result<TypeHierarchy, RegistryError> {
    TypeHierarchy::new()
        .with(CONFIG_RECORD, None)?
        .with(COMBATANT, Some(CONFIG_RECORD))?
        .with(CHARACTER, Some(COMBATANT))?
        .with(MONSTER, Some(COMBATANT))?
        .with(WEAPON, Some(CONFIG_RECORD))?
        .with(ABILITY, Some(CONFIG_RECORD))?
        .with(UPGRADE, Some(CONFIG_RECORD))
}

/// Kind of configuration table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConfigKind {
    Character,
    Weapon,
    Ability,
    Upgrade,
    Monster,
}

impl ConfigKind {
    /// Concrete type tag of records in this table.
    pub const fn type_tag(self) -> TypeTag {
        match self {
            Self::Character => CHARACTER,
            Self::Weapon => WEAPON,
            Self::Ability => ABILITY,
            Self::Upgrade => UPGRADE,
            Self::Monster => MONSTER,
        }
    }

    /// Table name, also the catalog file stem.
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Weapon => "weapons",
            Self::Ability => "abilities",
            Self::Upgrade => "upgrades",
            Self::Monster => "monsters",
        }
    }
}

/// Shared view of characters and monsters.
pub trait Combatant {
    fn max_health(&self) -> f64;
    fn move_speed(&self) -> f64;
    fn armor(&self) -> f64;
}

/// Returns the combatant view of `object` if it is a character or monster.
pub fn combatant_view(object: &dyn Validatable) -> Option<&dyn Combatant> {
    let any = object.as_any();
    if let Some(character) = any.downcast_ref::<CharacterConfig>() {
        return Some(character);
    }
    any.downcast_ref::<MonsterConfig>()
        .map(|monster| monster as &dyn Combatant)
}

/// A record stored in a typed table.
pub trait ConfigRecord: Validatable + Clone {
    const KIND: ConfigKind;

    fn name(&self) -> &str;

    fn from_entry(entry: &ConfigEntry) -> Option<&Self>;

    fn into_entry(self) -> ConfigEntry;
}

/// Any configuration record.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigEntry {
    Character(CharacterConfig),
    Weapon(WeaponConfig),
    Ability(AbilityConfig),
    Upgrade(UpgradeConfig),
    Monster(MonsterConfig),
}

impl ConfigEntry {
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::Character(_) => ConfigKind::Character,
            Self::Weapon(_) => ConfigKind::Weapon,
            Self::Ability(_) => ConfigKind::Ability,
            Self::Upgrade(_) => ConfigKind::Upgrade,
            Self::Monster(_) => ConfigKind::Monster,
        }
    }

    pub fn name(&self) -> &str {
        self.as_validatable().object_name()
    }

    pub fn as_validatable(&self) -> &dyn Validatable {
        match self {
            Self::Character(record) => record,
            Self::Weapon(record) => record,
            Self::Ability(record) => record,
            Self::Upgrade(record) => record,
            Self::Monster(record) => record,
        }
    }

    /// Names of other records this one refers to.
    pub fn references(&self) -> Vec<(ConfigKind, &str)> {
        match self {
            Self::Character(character) => character
                .starting_weapon
                .iter()
                .map(|weapon| (ConfigKind::Weapon, weapon.as_str()))
                .chain(
                    character
                        .abilities
                        .iter()
                        .map(|ability| (ConfigKind::Ability, ability.as_str())),
                )
                .collect(),
            Self::Monster(monster) => monster
                .abilities
                .iter()
                .map(|ability| (ConfigKind::Ability, ability.as_str()))
                .collect(),
            Self::Weapon(_) | Self::Ability(_) | Self::Upgrade(_) => Vec::new(),
        }
    }
}

macro_rules! impl_config_record {
    ($record:ty, $kind:ident) => {
        impl ConfigRecord for $record {
            const KIND: ConfigKind = ConfigKind::$kind;

            fn name(&self) -> &str {
                &self.name
            }

            fn from_entry(entry: &ConfigEntry) -> Option<&Self> {
                match entry {
                    ConfigEntry::$kind(record) => Some(record),
                    _ => None,
                }
            }

            fn into_entry(self) -> ConfigEntry {
                ConfigEntry::$kind(self)
            }
        }

        impl From<$record> for ConfigEntry {
            fn from(record: $record) -> Self {
                record.into_entry()
            }
        }
    };
}

impl_config_record!(CharacterConfig, Character);
impl_config_record!(WeaponConfig, Weapon);
impl_config_record!(AbilityConfig, Ability);
impl_config_record!(UpgradeConfig, Upgrade);
impl_config_record!(MonsterConfig, Monster);
