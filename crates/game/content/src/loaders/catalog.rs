//! Record catalog loader.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for record catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    ///
    /// RON format: `[ (name: "...", ...), ... ]`
    ///
    /// Records are returned in file order. Range problems are not checked
    /// here; a record that parses is loaded and left to validation.
    pub fn load<T: DeserializeOwned>(path: &Path) -> LoadResult<Vec<T>> {
        let content = read_file(path)?;
        let records: Vec<T> = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse catalog RON {}: {}", path.display(), e)
        })?;

        debug!(
            target: "content::loaders",
            path = %path.display(),
            count = records.len(),
            "Loaded catalog"
        );
        Ok(records)
    }
}
