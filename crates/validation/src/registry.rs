//! Rule registry keyed by type tag with inheritance-aware lookup.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::{RegistryError, RuleDefinition, TypeHierarchy, TypeTag};

/// Outcome of a successful [`RuleRegistry::register`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Registration {
    /// The rule was appended to its target type's list.
    Added,
    /// A rule with the same name already exists for the target type; nothing changed.
    Duplicate,
}

/// Maps each type tag to its priority-ordered rules.
///
/// # Architecture
///
/// ```text
/// RuleRegistry
/// ├── hierarchy: TypeHierarchy                      (explicit supertype table)
/// ├── rules: HashMap<TypeTag, Vec<RuleDefinition>>  (sorted per type)
/// └── next_sequence: u64                            (registry-wide tie breaker)
/// ```
///
/// Lists are kept sorted on insert. Lookups for a concrete type merge the
/// lists of the type and all its ancestors and sort again, because
/// independently sorted lists must be interleaved by priority.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    hierarchy: TypeHierarchy,
    rules: HashMap<TypeTag, Vec<RuleDefinition>>,
    next_sequence: u64,
}

impl RuleRegistry {
    /// Creates an empty registry over `hierarchy`.
    pub fn new(hierarchy: TypeHierarchy) -> Self {
        Self {
            hierarchy,
            rules: HashMap::new(),
            next_sequence: 0,
        }
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Registers `rule` for its target type.
    ///
    /// Refuses empty names and undeclared target types with a logged error.
    /// A duplicate name within the same target type is a logged no-op.
    pub fn register(&mut self, mut rule: RuleDefinition) -> Result<Registration, RegistryError> {
        let tag = rule.target();

        if rule.name().is_empty() {
            error!(
                target: "validation::registry",
                type_tag = %tag,
                "Refusing rule with empty name"
            );
            return Err(RegistryError::EmptyRuleName);
        }
        if tag.name().is_empty() {
            error!(
                target: "validation::registry",
                rule = rule.name(),
                "Refusing rule with empty target type"
            );
            return Err(RegistryError::EmptyTypeTag);
        }
        if !self.hierarchy.contains(tag) {
            error!(
                target: "validation::registry",
                rule = rule.name(),
                type_tag = %tag,
                "Refusing rule for undeclared type"
            );
            return Err(RegistryError::UnknownType {
                rule: rule.name().to_string(),
                tag,
            });
        }

        let list = self.rules.entry(tag).or_default();
        if list.iter().any(|existing| existing.name() == rule.name()) {
            warn!(
                target: "validation::registry",
                rule = rule.name(),
                type_tag = %tag,
                "Rule already registered, ignoring duplicate"
            );
            return Ok(Registration::Duplicate);
        }

        self.next_sequence += 1;
        rule.set_sequence(self.next_sequence);
        debug!(
            target: "validation::registry",
            rule = rule.name(),
            type_tag = %tag,
            priority = rule.priority(),
            "Registered rule"
        );
        list.push(rule);
        list.sort_by_key(RuleDefinition::order_key);

        Ok(Registration::Added)
    }

    /// Removes the rule called `name` from `tag`'s list.
    ///
    /// Returns true if a rule was removed. A list left empty is dropped along
    /// with its type entry.
    pub fn unregister(&mut self, name: &str, tag: TypeTag) -> bool {
        let Some(list) = self.rules.get_mut(&tag) else {
            return false;
        };
        let before = list.len();
        list.retain(|rule| rule.name() != name);
        let removed = list.len() != before;
        if list.is_empty() {
            self.rules.remove(&tag);
        }
        if removed {
            debug!(
                target: "validation::registry",
                rule = name,
                type_tag = %tag,
                "Unregistered rule"
            );
        }
        removed
    }

    /// All rules that apply to an object of concrete type `tag`: those
    /// registered for `tag` and for each of its ancestors, merged in
    /// execution order.
    pub fn rules_for(&self, tag: TypeTag) -> Vec<RuleDefinition> {
        let mut applicable: Vec<RuleDefinition> = self
            .hierarchy
            .ancestors(tag)
            .filter_map(|ancestor| self.rules.get(&ancestor))
            .flatten()
            .cloned()
            .collect();
        applicable.sort_by_key(RuleDefinition::order_key);
        applicable
    }

    /// Rules registered directly for `tag`, without ancestors.
    pub fn rules_registered_for(&self, tag: TypeTag) -> &[RuleDefinition] {
        self.rules.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str, target: TypeTag) -> bool {
        self.rules_registered_for(target)
            .iter()
            .any(|rule| rule.name() == name)
    }

    /// Types with at least one registered rule, sorted by name.
    pub fn registered_types(&self) -> Vec<TypeTag> {
        let mut tags: Vec<_> = self.rules.keys().copied().collect();
        tags.sort();
        tags
    }

    /// Every registered rule across all types, priority descending, then
    /// registration order.
    pub fn all_rules(&self) -> Vec<RuleDefinition> {
        let mut rules: Vec<RuleDefinition> = self.rules.values().flatten().cloned().collect();
        rules.sort_by_key(RuleDefinition::order_key);
        rules
    }

    /// Total number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
