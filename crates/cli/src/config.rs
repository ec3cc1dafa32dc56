//! CLI runtime configuration.
use std::env;
use std::path::PathBuf;

use crate::dirs;

/// Settings resolved from the environment, then overridden by flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub metrics_path: PathBuf,
    pub persist_metrics: bool,
    pub log_to_file: bool,
    pub log_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::default_data_dir(),
            metrics_path: PathBuf::from(Self::DEFAULT_METRICS_PATH),
            persist_metrics: true,
            log_to_file: false,
            log_dir: None,
        }
    }
}

impl CliConfig {
    pub const DEFAULT_METRICS_PATH: &str = "saved/validation/metrics.json";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUNGEON_DATA_DIR` - Content data directory (default: bundled sample data)
    /// - `VALIDATION_METRICS_PATH` - Metrics snapshot file (default: saved/validation/metrics.json)
    /// - `VALIDATION_PERSIST_METRICS` - Load/save metrics around each run (default: true)
    /// - `VALIDATION_LOG_TO_FILE` - Also write logs to a file (default: false)
    /// - `VALIDATION_LOG_DIR` - Log directory (default: platform cache dir)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = env::var_os("DUNGEON_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = env::var_os("VALIDATION_METRICS_PATH") {
            config.metrics_path = PathBuf::from(path);
        }
        if let Some(persist) = read_flag("VALIDATION_PERSIST_METRICS") {
            config.persist_metrics = persist;
        }
        if let Some(enable) = read_flag("VALIDATION_LOG_TO_FILE") {
            config.log_to_file = enable;
        }
        config.log_dir = env::var_os("VALIDATION_LOG_DIR").map(PathBuf::from);

        config
    }
}

fn read_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|value| parse_flag(&value))
}

/// An empty value counts as set.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
