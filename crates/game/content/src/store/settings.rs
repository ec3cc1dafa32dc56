use std::time::Duration;

/// Tunables read from `store.toml`. Every field is optional.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StoreSettings {
    /// Validate each record as it is inserted.
    pub validate_on_load: bool,
    /// Query count above which a performance snapshot logs a warning.
    pub query_warning_threshold: u64,
    /// Default deadline for a full sweep.
    pub sweep_deadline_ms: Option<u64>,
}

impl StoreSettings {
    pub const DEFAULT_QUERY_WARNING_THRESHOLD: u64 = 10_000;

    pub fn sweep_deadline(&self) -> Option<Duration> {
        self.sweep_deadline_ms.map(Duration::from_millis)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            validate_on_load: true,
            query_warning_threshold: Self::DEFAULT_QUERY_WARNING_THRESHOLD,
            sweep_deadline_ms: None,
        }
    }
}
