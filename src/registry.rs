//! Display-name registry for user-defined types.
//!
//! The registry is the central place where cross-references between
//! generated units get their names. It is an explicit, caller-owned
//! configuration object: populate it fully before handing it to the
//! builder, then treat it as read-only for the rest of the run.
//!
//! Lookups are name-stable even for unregistered types — the fallback is
//! the declaration's intrinsic name (with the `Serializer` suffix stripped
//! for serializer references).

use std::collections::HashMap;

use crate::schema::{RefKind, TypeRef, strip_serializer_suffix};

/// Maps a user-defined type name to its preferred generated display name.
///
/// # Example
///
/// ```
/// use tsgen::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register("Child", "FoobarChild");
///
/// assert_eq!(registry.resolve("Child"), "FoobarChild");
/// assert_eq!(registry.resolve("Parent"), "Parent");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    names: HashMap<String, String>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display name for a declared type.
    ///
    /// If a name is already registered for this type, it is replaced.
    pub fn register(&mut self, name: impl Into<String>, display: impl Into<String>) {
        self.names.insert(name.into(), display.into());
    }

    /// Whether a display name override is registered for this type.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Resolve a declared type name to its display name, falling back to
    /// the intrinsic name when unregistered.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.names.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Resolve a reference's display name: registered override first, then
    /// the serializer prefix convention, then the intrinsic name.
    pub fn display_name(&self, reference: &TypeRef) -> String {
        if let Some(display) = self.names.get(&reference.name) {
            return display.clone();
        }
        match reference.kind {
            RefKind::Serializer => strip_serializer_suffix(&reference.name).to_string(),
            RefKind::Record | RefKind::Enum => reference.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_to_intrinsic_name() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.resolve("User"), "User");
        assert!(!registry.contains("User"));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = TypeRegistry::new();
        registry.register("User", "Account");
        registry.register("User", "Member");
        assert_eq!(registry.resolve("User"), "Member");
    }

    #[test]
    fn test_display_name_strips_serializer_suffix() {
        let registry = TypeRegistry::new();
        let reference = TypeRef::new("ParentSerializer", RefKind::Serializer);
        assert_eq!(registry.display_name(&reference), "Parent");
    }

    #[test]
    fn test_display_name_override_beats_convention() {
        let mut registry = TypeRegistry::new();
        registry.register("ParentSerializer", "FoobarParent");
        let reference = TypeRef::new("ParentSerializer", RefKind::Serializer);
        assert_eq!(registry.display_name(&reference), "FoobarParent");
    }

    #[test]
    fn test_display_name_for_record_and_enum() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.display_name(&TypeRef::new("User", RefKind::Record)),
            "User"
        );
        assert_eq!(
            registry.display_name(&TypeRef::new("ButtonType", RefKind::Enum)),
            "ButtonType"
        );
    }
}
