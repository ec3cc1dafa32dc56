//! Validation notifications.

use crate::{Issue, ObjectKey, ValidationContext};

/// Receives notifications around each fresh validation.
///
/// Observers run synchronously on the validating thread, in registration
/// order, and must not call back into the engine. Cache hits do not notify:
/// no rule ran.
pub trait ValidationObserver: Send + Sync {
    /// Returns a human-readable name for this observer (used in logging).
    fn name(&self) -> &'static str;

    /// Called before any rule runs for `key`.
    fn before_validation(&self, _key: &ObjectKey) {}

    /// Called once the context for `key` is complete.
    fn after_validation(&self, _key: &ObjectKey, _context: &ValidationContext) {}

    /// Called once per `Error` or `Critical` issue, after validation completes.
    fn on_blocking_issue(&self, _key: &ObjectKey, _issue: &Issue) {}
}
