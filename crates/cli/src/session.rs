//! One live validation session: engine, loaded store, and metrics persistence.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use game_content::{ConfigStore, ContentFactory};
use game_core::{ConfigEntry, ConfigKind};
use tracing::{info, warn};
use validation::{MetricsSnapshot, ValidationEngine};

use crate::config::CliConfig;

pub struct Session {
    config: CliConfig,
    engine: Arc<ValidationEngine>,
    store: ConfigStore,
}

impl Session {
    /// Builds the default engine, restores persisted metrics, and loads the
    /// store from the configured data directory.
    ///
    /// Metrics are restored before loading so load-time validations count
    /// toward the persisted totals.
    pub fn open(config: CliConfig) -> Result<Self> {
        let engine = Arc::new(
            game_core::default_engine().context("Failed to build default rule set")?,
        );

        if config.persist_metrics && config.metrics_path.exists() {
            match MetricsSnapshot::load(&config.metrics_path) {
                Ok(snapshot) => engine.restore_metrics(snapshot),
                Err(e) => warn!(
                    target: "cli::session",
                    path = %config.metrics_path.display(),
                    error = %e,
                    "Ignoring unreadable metrics snapshot"
                ),
            }
        }

        let factory = ContentFactory::new(&config.data_dir);
        let settings = factory.load_settings().with_context(|| {
            format!("Failed to load store settings from {}", config.data_dir.display())
        })?;

        let mut store = ConfigStore::new(engine.clone(), settings);
        let loaded = store.load_from(&factory).with_context(|| {
            format!("Failed to load content from {}", config.data_dir.display())
        })?;

        info!(
            target: "cli::session",
            data_dir = %config.data_dir.display(),
            entries = loaded,
            "Session opened"
        );

        Ok(Self {
            config,
            engine,
            store,
        })
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Looks up `kind/name` in the store.
    pub fn entry(&self, path: &RecordPath) -> Result<&ConfigEntry> {
        match self.store.get_dyn(path.kind, &path.name) {
            Some(entry) => Ok(entry),
            None => bail!(
                "no {} named '{}' in {}",
                path.kind,
                path.name,
                self.config.data_dir.display()
            ),
        }
    }

    /// Saves the metrics snapshot if persistence is enabled.
    pub fn close(&self) -> Result<()> {
        if !self.config.persist_metrics {
            return Ok(());
        }
        self.engine
            .metrics_snapshot()
            .save(&self.config.metrics_path)
            .with_context(|| {
                format!(
                    "Failed to save metrics snapshot to {}",
                    self.config.metrics_path.display()
                )
            })
    }
}

/// A record address of the form `<kind>/<name>`, e.g. `weapon/longsword`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordPath {
    pub kind: ConfigKind,
    pub name: String,
}

impl std::str::FromStr for RecordPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s
            .split_once('/')
            .ok_or_else(|| format!("expected <kind>/<name>, got '{s}'"))?;
        let kind = kind
            .parse::<ConfigKind>()
            .map_err(|_| format!("unknown record kind '{kind}'"))?;
        if name.trim().is_empty() {
            return Err(format!("missing record name in '{s}'"));
        }
        Ok(Self {
            kind,
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RecordPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}
