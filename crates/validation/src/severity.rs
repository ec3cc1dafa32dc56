//! Issue severity classification.

use serde::{Deserialize, Serialize};

/// Ordered classification of a validation issue.
///
/// Only [`Severity::Error`] and [`Severity::Critical`] make a context invalid:
/// - **Info**: diagnostic narration, never affects validity
/// - **Warning**: suspicious but usable (e.g. missing optional equipment)
/// - **Error**: out-of-range or structurally invalid value
/// - **Critical**: data unusable (e.g. a required reference is empty)
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Returns true if an issue of this severity invalidates its context.
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }

    /// Short uppercase label used in rendered reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}
