//! Error types for registration and metrics persistence.
//!
//! Malformed *data* never surfaces here; it becomes an [`Issue`](crate::Issue)
//! inside a context. These errors cover programmer mistakes at the
//! registration boundary and I/O around the metrics snapshot.

use thiserror::Error;

use crate::TypeTag;

/// Refused registry or hierarchy operations. No partial state is left behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("rule name must not be empty")]
    EmptyRuleName,

    #[error("type tag must not be empty")]
    EmptyTypeTag,

    #[error("rule '{rule}' targets undeclared type '{tag}'")]
    UnknownType { rule: String, tag: TypeTag },

    #[error("type '{tag}' declares undeclared parent '{parent}'")]
    UnknownParent { tag: TypeTag, parent: TypeTag },

    #[error("type '{tag}' is already declared with parent {existing:?}, not {requested:?}")]
    ConflictingParent {
        tag: TypeTag,
        existing: Option<TypeTag>,
        requested: Option<TypeTag>,
    },
}

/// Failures while exporting, saving, or loading metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
}
