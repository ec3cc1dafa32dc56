//! Where the validator looks for content and writes logs.

use std::path::{Path, PathBuf};

/// Validator logs live under the platform cache dir, next to other dungeon
/// tooling logs: `<cache>/dungeon/logs/validation` (`/tmp/dungeon/...` when no
/// home directory can be resolved).
pub fn log_dir() -> PathBuf {
    let base_dir = directories::ProjectDirs::from("", "", "dungeon")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/dungeon"));

    base_dir.join("logs").join("validation")
}

/// Content directory used when `DUNGEON_DATA_DIR` is not set.
///
/// Prefers the sample data bundled with `game-content`, then `./data`.
pub fn default_data_dir() -> PathBuf {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("game")
        .join("content")
        .join("data");
    if bundled.is_dir() {
        bundled
    } else {
        PathBuf::from("./data")
    }
}
