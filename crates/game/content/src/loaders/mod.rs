//! Content loaders for reading configuration records from files.
//!
//! Catalogs are RON lists of records, one file per table. Store settings are
//! TOML. All loaders return [`LoadResult`] with the file path in the error.

pub mod catalog;
pub mod factory;
pub mod settings;

pub use catalog::CatalogLoader;
pub use factory::ContentFactory;
pub use settings::SettingsLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
