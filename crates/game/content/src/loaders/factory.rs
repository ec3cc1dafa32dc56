//! Content factory for loading every configuration table from a data directory.

use std::path::{Path, PathBuf};

use game_core::{
    AbilityConfig, CharacterConfig, ConfigEntry, ConfigKind, ConfigRecord, MonsterConfig,
    UpgradeConfig, WeaponConfig,
};
use serde::de::DeserializeOwned;
use strum::IntoEnumIterator;

use crate::loaders::{CatalogLoader, LoadResult, SettingsLoader};
use crate::store::StoreSettings;

/// Content factory that loads all configuration content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── store.toml
/// ├── characters.ron
/// ├── weapons.ron
/// ├── abilities.ron
/// ├── upgrades.ron
/// └── monsters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load store settings from `store.toml`. Missing file means defaults.
    pub fn load_settings(&self) -> LoadResult<StoreSettings> {
        SettingsLoader::load(&self.data_dir.join("store.toml"))
    }

    /// Load character catalog from `characters.ron`.
    pub fn load_characters(&self) -> LoadResult<Vec<CharacterConfig>> {
        self.load_table()
    }

    /// Load weapon catalog from `weapons.ron`.
    pub fn load_weapons(&self) -> LoadResult<Vec<WeaponConfig>> {
        self.load_table()
    }

    /// Load ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityConfig>> {
        self.load_table()
    }

    /// Load upgrade catalog from `upgrades.ron`.
    pub fn load_upgrades(&self) -> LoadResult<Vec<UpgradeConfig>> {
        self.load_table()
    }

    /// Load monster catalog from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<Vec<MonsterConfig>> {
        self.load_table()
    }

    /// Load every record of `kind` as store entries.
    pub fn load_kind(&self, kind: ConfigKind) -> LoadResult<Vec<ConfigEntry>> {
        fn entries<T: ConfigRecord>(records: Vec<T>) -> Vec<ConfigEntry> {
            records.into_iter().map(ConfigRecord::into_entry).collect()
        }
        Ok(match kind {
            ConfigKind::Character => entries(self.load_characters()?),
            ConfigKind::Weapon => entries(self.load_weapons()?),
            ConfigKind::Ability => entries(self.load_abilities()?),
            ConfigKind::Upgrade => entries(self.load_upgrades()?),
            ConfigKind::Monster => entries(self.load_monsters()?),
        })
    }

    /// Load every table. Tables are loaded in [`ConfigKind`] order.
    pub fn load_all(&self) -> LoadResult<Vec<ConfigEntry>> {
        let mut all = Vec::new();
        for kind in ConfigKind::iter() {
            all.extend(self.load_kind(kind)?);
        }
        Ok(all)
    }

    /// Path of the catalog file for `kind`.
    pub fn catalog_path(&self, kind: ConfigKind) -> PathBuf {
        self.data_dir.join(format!("{}.ron", kind.table_name()))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn load_table<T: ConfigRecord + DeserializeOwned>(&self) -> LoadResult<Vec<T>> {
        CatalogLoader::load(&self.catalog_path(T::KIND))
    }
}
