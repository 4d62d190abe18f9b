//! Keyed collection of sibling namespaces.

use indexmap::IndexMap;

use crate::error::Result;
use crate::namespace::Namespace;

/// Child namespaces of one namespace, in definition order.
///
/// # Examples
///
/// ```
/// use ns_options_core::{NamespaceSet, OptionType, Rules};
///
/// let mut children = NamespaceSet::new();
/// children
///     .add_with("db", |db| {
///         db.add_option("url", OptionType::String, Rules::new().mark_required())?;
///         Ok(())
///     })
///     .unwrap();
///
/// assert!(children.contains("db"));
/// assert!(!children.required_set().unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NamespaceSet {
    namespaces: IndexMap<String, Namespace>,
}

impl NamespaceSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Returns `true` if no namespaces are defined.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Iterates over namespaces in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    /// Iterates mutably over namespaces in definition order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Namespace> {
        self.namespaces.values_mut()
    }

    /// Namespace names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Creates an empty namespace, replacing any namespace with the same name.
    pub fn add(&mut self, name: impl Into<String>) -> &mut Namespace {
        let name = name.into();
        let (index, _) = self
            .namespaces
            .insert_full(name.clone(), Namespace::new(name));
        &mut self.namespaces[index]
    }

    /// Creates a namespace and runs `define` against it.
    ///
    /// # Errors
    ///
    /// Returns whatever `define` fails with. The namespace stays in the set,
    /// holding whatever `define` managed to add.
    pub fn add_with<F>(&mut self, name: impl Into<String>, define: F) -> Result<&mut Namespace>
    where
        F: FnOnce(&mut Namespace) -> Result<()>,
    {
        self.add(name).define(define)
    }

    /// Removes a namespace and its subtree, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Namespace> {
        self.namespaces.shift_remove(name)
    }

    /// Returns `true` if a namespace with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Looks up a namespace.
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Looks up a namespace mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Namespace> {
        self.namespaces.get_mut(name)
    }

    /// Returns `true` if every namespace in the set, recursively, has all of
    /// its required options set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`](crate::Error::Coerce) if reading a lazy value
    /// fails.
    pub fn required_set(&self) -> Result<bool> {
        for namespace in self.iter() {
            if !namespace.required_set()? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
