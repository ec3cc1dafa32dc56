//! Configuration records and the rules that keep them sane.
//!
//! `game-core` defines the plain data shapes content authors write
//! (characters, weapons, abilities, upgrades, monsters), the type hierarchy the
//! validation engine dispatches over, and the default rule set. It performs no
//! I/O; loading lives in `game-content`.
pub mod config;
pub mod records;
pub mod rules;

pub use config::RecordLimits;
pub use records::{
    ABILITY, AbilityConfig, CHARACTER, COMBATANT, CONFIG_RECORD, CharacterConfig, Combatant,
    ConfigEntry, ConfigKind, ConfigRecord, MONSTER, MonsterConfig, UPGRADE, UpgradeConfig, WEAPON,
    WeaponConfig, combatant_view, record_hierarchy,
};
pub use rules::{default_engine, default_rules, register_default_rules};
