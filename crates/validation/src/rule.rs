//! Rule definitions.
//!
//! A rule is a pure predicate over a validated object that appends issues to
//! the context it is handed. Rules never mutate the object. Every
//! [`RuleDefinition`] holds a callable, so there is no "unbound" state to
//! check at execution time.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::{TypeTag, Validatable, ValidationContext};

/// System name given to the per-rule child contexts created by the engine.
pub const RULE_SYSTEM: &str = "ValidationRule";

/// Shared rule body. Returns whether the object passed this rule.
pub type RuleFn = Arc<dyn Fn(&dyn Validatable, &mut ValidationContext) -> bool + Send + Sync>;

/// A named, prioritized rule bound to a target type.
///
/// Execution order is descending priority, then registration order. The
/// registry assigns the sequence number that breaks ties.
#[derive(Clone)]
pub struct RuleDefinition {
    name: String,
    target: TypeTag,
    priority: i32,
    description: String,
    rule: RuleFn,
    sequence: u64,
}

impl RuleDefinition {
    /// Creates a rule over any [`Validatable`] whose tag is-a `target`.
    pub fn new<F>(
        name: impl Into<String>,
        target: TypeTag,
        priority: i32,
        description: impl Into<String>,
        rule: F,
    ) -> Self
    where
        F: Fn(&dyn Validatable, &mut ValidationContext) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            target,
            priority,
            description: description.into(),
            rule: Arc::new(rule),
            sequence: 0,
        }
    }

    /// Creates a rule over the concrete record type `T`.
    ///
    /// If the engine hands the rule an object that is not a `T`, the rule
    /// fails with a `Critical` issue instead of panicking.
    pub fn typed<T, F>(
        name: impl Into<String>,
        target: TypeTag,
        priority: i32,
        description: impl Into<String>,
        rule: F,
    ) -> Self
    where
        T: Validatable,
        F: Fn(&T, &mut ValidationContext) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let rule_name = name.clone();
        Self::new(name, target, priority, description, move |object, ctx| {
            match object.as_any().downcast_ref::<T>() {
                Some(record) => rule(record, ctx),
                None => {
                    ctx.critical(format!(
                        "rule '{}' expects {} but received '{}'",
                        rule_name,
                        type_name::<T>(),
                        object.type_tag()
                    ));
                    false
                }
            }
        })
    }

    /// Runs the rule body against `object`.
    pub fn run(&self, object: &dyn Validatable, ctx: &mut ValidationContext) -> bool {
        (self.rule)(object, ctx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> TypeTag {
        self.target
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registry-wide registration order. Zero until registered.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub(crate) fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Sort key: priority descending, then registration order ascending.
    pub(crate) fn order_key(&self) -> (core::cmp::Reverse<i32>, u64) {
        (core::cmp::Reverse(self.priority), self.sequence)
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("priority", &self.priority)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
