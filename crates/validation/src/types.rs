//! Type identifiers, the explicit supertype table, and the validatable
//! capability.
//!
//! Rule dispatch never relies on runtime reflection. Every record type names
//! itself with a [`TypeTag`], and a programmer-maintained [`TypeHierarchy`]
//! says which tags are subtypes of which. A rule registered for a tag applies
//! to every object whose tag `is_a` that tag.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::{FieldHasher, RegistryError};

/// Stable identifier for a validated type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeTag(&'static str);

impl TypeTag {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Identity of a validated object: its type tag plus its stable name.
///
/// Cache entries are keyed by identity, not by value. Two distinct objects
/// with equal field values still get separate entries.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub type_tag: TypeTag,
    pub name: String,
}

impl ObjectKey {
    pub fn new(type_tag: TypeTag, name: impl Into<String>) -> Self {
        Self {
            type_tag,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_tag, self.name)
    }
}

/// Capability implemented by every record the engine can validate.
pub trait Validatable: Send + Sync + 'static {
    /// Concrete type tag used for rule lookup.
    fn type_tag(&self) -> TypeTag;

    /// Stable name of this object within its type.
    fn object_name(&self) -> &str;

    /// Feeds the declared validated fields into `hasher`.
    ///
    /// Only fields that rules inspect belong here. The fingerprint must be a
    /// pure function of them.
    fn hash_fields(&self, hasher: &mut FieldHasher);

    /// Downcast support for typed rules.
    fn as_any(&self) -> &dyn Any;

    fn object_key(&self) -> ObjectKey {
        ObjectKey::new(self.type_tag(), self.object_name())
    }
}

/// Explicit single-parent supertype table.
///
/// Parents must be declared before their children, so the table can never
/// contain a cycle.
#[derive(Clone, Debug, Default)]
pub struct TypeHierarchy {
    parents: HashMap<TypeTag, Option<TypeTag>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `tag` with an optional parent.
    ///
    /// Re-declaring a tag with the same parent is a no-op.
    pub fn declare(&mut self, tag: TypeTag, parent: Option<TypeTag>) -> Result<(), RegistryError> {
        if tag.name().is_empty() {
            return Err(RegistryError::EmptyTypeTag);
        }
        if let Some(parent) = parent
            && !self.contains(parent)
        {
            return Err(RegistryError::UnknownParent { tag, parent });
        }
        match self.parents.get(&tag) {
            Some(existing) if *existing != parent => Err(RegistryError::ConflictingParent {
                tag,
                existing: *existing,
                requested: parent,
            }),
            Some(_) => Ok(()),
            None => {
                self.parents.insert(tag, parent);
                Ok(())
            }
        }
    }

    /// Builder-style [`declare`](Self::declare).
    pub fn with(mut self, tag: TypeTag, parent: Option<TypeTag>) -> Result<Self, RegistryError> {
        self.declare(tag, parent)?;
        Ok(self)
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.parents.contains_key(&tag)
    }

    pub fn parent(&self, tag: TypeTag) -> Option<TypeTag> {
        self.parents.get(&tag).copied().flatten()
    }

    /// True if `tag` is `ancestor` or one of its descendants.
    pub fn is_a(&self, tag: TypeTag, ancestor: TypeTag) -> bool {
        self.ancestors(tag).any(|t| t == ancestor)
    }

    /// Yields `tag` followed by its parents up to the root.
    ///
    /// An undeclared tag yields only itself.
    pub fn ancestors(&self, tag: TypeTag) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            next: Some(tag),
        }
    }

    /// All declared tags, sorted by name.
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<_> = self.parents.keys().copied().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Iterator returned by [`TypeHierarchy::ancestors`].
pub struct Ancestors<'a> {
    hierarchy: &'a TypeHierarchy,
    next: Option<TypeTag>,
}

impl Iterator for Ancestors<'_> {
    type Item = TypeTag;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: TypeTag = TypeTag::new("root");
    const MID: TypeTag = TypeTag::new("mid");
    const LEAF: TypeTag = TypeTag::new("leaf");
    const OTHER: TypeTag = TypeTag::new("other");

    fn hierarchy() -> TypeHierarchy {
        TypeHierarchy::new()
            .with(ROOT, None)
            .and_then(|h| h.with(MID, Some(ROOT)))
            .and_then(|h| h.with(LEAF, Some(MID)))
            .and_then(|h| h.with(OTHER, Some(ROOT)))
            .unwrap()
    }

    #[test]
    fn test_is_a_is_reflexive_and_transitive() {
        let h = hierarchy();
        assert!(h.is_a(LEAF, LEAF));
        assert!(h.is_a(LEAF, MID));
        assert!(h.is_a(LEAF, ROOT));
        assert!(!h.is_a(LEAF, OTHER));
        assert!(!h.is_a(ROOT, LEAF));
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let h = hierarchy();
        let chain: Vec<_> = h.ancestors(LEAF).collect();
        assert_eq!(chain, vec![LEAF, MID, ROOT]);
    }

    #[test]
    fn test_parent_must_be_declared_first() {
        let mut h = TypeHierarchy::new();
        let err = h.declare(LEAF, Some(MID)).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownParent { .. }));
        assert!(h.is_empty());
    }

    #[test]
    fn test_conflicting_redeclaration_is_rejected() {
        let mut h = hierarchy();
        assert!(h.declare(LEAF, Some(MID)).is_ok());
        let err = h.declare(LEAF, Some(OTHER)).unwrap_err();
        assert!(matches!(err, RegistryError::ConflictingParent { .. }));
        assert_eq!(h.parent(LEAF), Some(MID));
    }

    #[test]
    fn test_empty_tag_rejected() {
        let mut h = TypeHierarchy::new();
        assert!(matches!(
            h.declare(TypeTag::new(""), None),
            Err(RegistryError::EmptyTypeTag)
        ));
    }
}
