use game_core::ConfigKind;
use thiserror::Error;

use super::StoreState;

/// Errors from configuration store operations.
///
/// Lookup misses are not errors; they return `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid store transition from {from} to {to}")]
    InvalidTransition { from: StoreState, to: StoreState },

    #[error("operation requires state {expected}, store is {actual}")]
    WrongState {
        expected: StoreState,
        actual: StoreState,
    },

    #[error("duplicate {kind} entry '{name}'")]
    DuplicateEntry { kind: ConfigKind, name: String },

    #[error("unknown {kind} entry '{name}'")]
    UnknownEntry { kind: ConfigKind, name: String },

    #[error("failed to load {table}: {message}")]
    Load { table: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
