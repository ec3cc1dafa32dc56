//! Rule-based validation of configuration records.
//!
//! `validation` owns everything that turns a record into a verdict:
//! - [`context`] collects severity-classified [`Issue`]s into nestable
//!   [`ValidationContext`] trees
//! - [`types`] and [`registry`] map type tags (with an explicit supertype
//!   table) to priority-ordered [`RuleDefinition`]s
//! - [`engine`] executes the applicable rules, caches verdicts by content
//!   [`fingerprint`], and feeds every execution to the [`metrics`] collector
//! - [`profile`] measures validation latency against the documented targets
//!
//! The engine is an explicitly constructed service: build one
//! [`ValidationEngine`], share it by `Arc`, and hand it to whatever needs it.
pub mod cache;
pub mod context;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod issue;
pub mod metrics;
pub mod observer;
pub mod profile;
pub mod range;
pub mod registry;
pub mod rule;
pub mod severity;
pub mod types;

pub use cache::{CacheEntry, CacheStats, ResultCache};
pub use context::ValidationContext;
pub use engine::{ValidationEngine, ValidationOutcome};
pub use error::{MetricsError, RegistryError};
pub use fingerprint::{FieldHasher, fingerprint};
pub use issue::Issue;
pub use metrics::{ExportFormat, MetricsCollector, MetricsSnapshot, TimingStat};
pub use observer::ValidationObserver;
pub use profile::{CACHED_TARGET, LatencyProfile, ProfileReport, UNCACHED_TARGET, profile_validation};
pub use range::{RangeValue, require_non_empty, require_positive, validate_range};
pub use registry::{Registration, RuleRegistry};
pub use rule::{RULE_SYSTEM, RuleDefinition, RuleFn};
pub use severity::Severity;
pub use types::{ObjectKey, TypeHierarchy, TypeTag, Validatable};
