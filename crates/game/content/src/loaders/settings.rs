//! Store settings loader.

use std::path::Path;

use tracing::debug;

use crate::loaders::{LoadResult, read_file};
use crate::store::StoreSettings;

/// Loader for store settings from TOML files.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a TOML file, or defaults if the file does not exist.
    pub fn load(path: &Path) -> LoadResult<StoreSettings> {
        if !path.exists() {
            debug!(
                target: "content::loaders",
                path = %path.display(),
                "No store settings file, using defaults"
            );
            return Ok(StoreSettings::default());
        }
        let content = read_file(path)?;
        let settings: StoreSettings = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse settings TOML: {}", e))?;

        Ok(settings)
    }
}
