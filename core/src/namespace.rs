//! Namespaces: tree nodes holding options and child namespaces.
//!
//! A [`Namespace`] owns an [`OptionSet`] and a [`NamespaceSet`]. Within one
//! namespace a name refers to either an option or a child namespace, never
//! both: adding one kind removes the other, subtree included.
//!
//! Bulk access goes through plain maps. [`Namespace::to_hash`] exports
//! every option value (fully evaluated, copied) and every child namespace as
//! a nested map; [`Namespace::apply`] is the reverse and defines options on
//! the fly for names it does not know.
//!
//! # Example
//!
//! ```
//! use ns_options_core::{Namespace, OptionType, Rules, Value, value_map};
//!
//! let mut settings = Namespace::build("settings", |ns| {
//!     ns.add_option("a", OptionType::Integer, Rules::new())?;
//!     ns.add_option("b", OptionType::Integer, Rules::new())?;
//!     ns.add_namespace_with("child", |child| {
//!         child.add_option("c", OptionType::Integer, Rules::new())?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! settings
//!     .apply(&value_map([
//!         ("a", Value::from(1)),
//!         ("child", Value::map([("c", Value::from(2))])),
//!         ("b", Value::from(3)),
//!     ]))
//!     .unwrap();
//!
//! let expected = value_map([
//!     ("a", Value::from(1)),
//!     ("b", Value::from(3)),
//!     ("child", Value::map([("c", Value::from(2))])),
//! ]);
//! assert_eq!(settings.to_hash().unwrap(), expected);
//! ```

use tracing::debug;

use crate::definition::Definition;
use crate::error::{Error, Result};
use crate::namespace_set::NamespaceSet;
use crate::option::ConfigOption;
use crate::option_set::OptionSet;
use crate::rules::Rules;
use crate::types::OptionType;
use crate::value::{Value, ValueMap};

/// A named node in a configuration tree.
///
/// The name is for diagnostics; lookups go through the parent's sets.
/// Equality compares the [`to_hash`](Namespace::to_hash) exports only.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    name: String,
    options: OptionSet,
    namespaces: NamespaceSet,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: OptionSet::new(),
            namespaces: NamespaceSet::new(),
        }
    }

    /// Creates a namespace and runs `define` against it.
    ///
    /// # Errors
    ///
    /// Returns whatever `define` fails with.
    pub fn build<F>(name: impl Into<String>, define: F) -> Result<Self>
    where
        F: FnOnce(&mut Namespace) -> Result<()>,
    {
        let mut namespace = Self::new(name);
        namespace.define(define)?;
        Ok(namespace)
    }

    /// Creates a namespace whose options are defined by `values`.
    ///
    /// Every entry becomes an option typed after its value; nested maps
    /// become map-typed options, not namespaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if a value cannot be stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ns_options_core::{Namespace, OptionType, Value, value_map};
    ///
    /// let point = Namespace::from_map("point", &value_map([
    ///     ("x", Value::from(1)),
    ///     ("label", Value::from("origin")),
    /// ]))
    /// .unwrap();
    /// assert_eq!(point.get_option("x").unwrap().option_type(), &OptionType::Integer);
    /// assert_eq!(point.option_value("label").unwrap(), Value::from("origin"));
    /// ```
    pub fn from_map(name: impl Into<String>, values: &ValueMap) -> Result<Self> {
        let mut namespace = Self::new(name);
        namespace.apply(values)?;
        Ok(namespace)
    }

    /// Name of the namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options defined directly on this namespace.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Child namespaces.
    pub fn namespaces(&self) -> &NamespaceSet {
        &self.namespaces
    }

    /// Runs `define` with this namespace as its argument.
    ///
    /// # Errors
    ///
    /// Returns whatever `define` fails with.
    pub fn define<F>(&mut self, define: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Namespace) -> Result<()>,
    {
        define(&mut *self)?;
        Ok(self)
    }

    /// Applies a declarative body to this namespace.
    ///
    /// # Errors
    ///
    /// Returns the first error from adding an option.
    pub fn define_body(&mut self, body: &Definition) -> Result<&mut Self> {
        body.apply_to(self)?;
        Ok(self)
    }

    /// Defines an option, replacing any option or namespace with this name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if the default cannot be coerced.
    pub fn add_option(
        &mut self,
        name: impl Into<String>,
        option_type: OptionType,
        rules: Rules,
    ) -> Result<&mut ConfigOption> {
        let name = name.into();
        if self.namespaces.remove(&name).is_some() {
            debug!(namespace = %self.name, name = %name, "option replaces namespace");
        }
        Ok(self.options.add(name, option_type, rules)?)
    }

    /// Creates an empty child namespace, replacing any option or namespace
    /// with this name.
    pub fn add_namespace(&mut self, name: impl Into<String>) -> &mut Namespace {
        let name = name.into();
        if self.options.remove(&name).is_some() {
            debug!(namespace = %self.name, name = %name, "namespace replaces option");
        }
        self.namespaces.add(name)
    }

    /// Creates a child namespace and runs `define` against it.
    ///
    /// # Errors
    ///
    /// Returns whatever `define` fails with.
    pub fn add_namespace_with<F>(
        &mut self,
        name: impl Into<String>,
        define: F,
    ) -> Result<&mut Namespace>
    where
        F: FnOnce(&mut Namespace) -> Result<()>,
    {
        self.add_namespace(name).define(define)
    }

    /// Removes an option, returning it if it existed.
    pub fn remove_option(&mut self, name: &str) -> Option<ConfigOption> {
        self.options.remove(name)
    }

    /// Removes a child namespace and its subtree, returning it if it existed.
    pub fn remove_namespace(&mut self, name: &str) -> Option<Namespace> {
        self.namespaces.remove(name)
    }

    /// Returns `true` if this namespace defines an option with this name.
    ///
    /// Ancestors are not searched.
    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains(name)
    }

    /// Returns `true` if this namespace has a child namespace with this name.
    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespaces.contains(name)
    }

    /// Looks up an option.
    pub fn get_option(&self, name: &str) -> Option<&ConfigOption> {
        self.options.get(name)
    }

    /// Looks up an option mutably.
    pub fn get_option_mut(&mut self, name: &str) -> Option<&mut ConfigOption> {
        self.options.get_mut(name)
    }

    /// Looks up a child namespace.
    pub fn get_namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Looks up a child namespace mutably.
    pub fn get_namespace_mut(&mut self, name: &str) -> Option<&mut Namespace> {
        self.namespaces.get_mut(name)
    }

    /// Looks up a child namespace, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamespace`] if there is no such namespace.
    pub fn namespace(&self, name: &str) -> Result<&Namespace> {
        self.get_namespace(name)
            .ok_or_else(|| Error::UnknownNamespace(name.to_string()))
    }

    /// Looks up a child namespace mutably, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamespace`] if there is no such namespace.
    pub fn namespace_mut(&mut self, name: &str) -> Result<&mut Namespace> {
        self.get_namespace_mut(name)
            .ok_or_else(|| Error::UnknownNamespace(name.to_string()))
    }

    /// Reads an option's value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOption`] if no option has this name, or
    /// [`Error::Coerce`] if a lazy value fails to coerce.
    pub fn option_value(&self, name: &str) -> Result<Value> {
        self.options.value(name)
    }

    /// Writes an option's value.
    ///
    /// Unknown names are an error here; only [`apply`](Namespace::apply)
    /// defines options on the fly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOption`] if no option has this name, or
    /// [`Error::Coerce`] if the value cannot be coerced.
    pub fn set_option(&mut self, name: &str, new_value: impl Into<Value>) -> Result<&ConfigOption> {
        self.options.set(name, new_value)
    }

    /// Returns `true` if every required option in the subtree is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if reading a lazy value fails.
    pub fn required_set(&self) -> Result<bool> {
        Ok(self.options.required_set()? && self.namespaces.required_set()?)
    }

    /// Exports the subtree as a nested map.
    ///
    /// Options come first, in definition order, followed by child
    /// namespaces. Values are evaluated and copied, so the map shares no
    /// state with the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if reading a lazy value fails.
    pub fn to_hash(&self) -> Result<ValueMap> {
        let mut hash = ValueMap::with_capacity(self.options.len() + self.namespaces.len());
        for option in self.options.iter() {
            hash.insert(option.name().to_string(), option.value()?);
        }
        for namespace in self.namespaces.iter() {
            hash.insert(namespace.name().to_string(), Value::Map(namespace.to_hash()?));
        }
        Ok(hash)
    }

    /// Iterates over the `(name, value)` pairs of the [`to_hash`](Namespace::to_hash)
    /// export.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if reading a lazy value fails.
    pub fn entries(&self) -> Result<indexmap::map::IntoIter<String, Value>> {
        Ok(self.to_hash()?.into_iter())
    }

    /// Writes a nested map of values into the subtree.
    ///
    /// - A map value aimed at a child namespace is applied to that namespace.
    /// - Any other value aimed at a child namespace is ignored.
    /// - Every other entry is written to the option of that name, which is
    ///   defined first (typed after the value) if it does not exist yet.
    ///
    /// Values are copied before being stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if a value cannot be coerced to an existing
    /// option's type. Entries before the failing one stay applied.
    pub fn apply(&mut self, values: &ValueMap) -> Result<()> {
        for (name, value) in values {
            if let Some(child) = self.namespaces.get_mut(name) {
                match value {
                    Value::Map(nested) => child.apply(nested)?,
                    other => debug!(
                        namespace = %self.name,
                        name = %name,
                        kind = other.kind_name(),
                        "ignoring non-map value for namespace"
                    ),
                }
                continue;
            }

            if !self.options.contains(name) {
                debug!(namespace = %self.name, option = %name, "defining option from applied value");
                self.add_option(name.as_str(), value.runtime_type(), Rules::new())?;
            }
            self.options.set(name, value.clone())?;
        }
        Ok(())
    }

    /// Copies the shape of `other` into this namespace.
    ///
    /// Option definitions (name, type, rules) are copied and start out at
    /// their defaults; current values are not copied. Child namespaces are
    /// rebuilt recursively the same way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if a default cannot be coerced.
    pub fn build_from(&mut self, other: &Namespace) -> Result<()> {
        for option in other.options.iter() {
            self.add_option(option.name(), option.option_type().clone(), option.rules().clone())?;
        }
        for namespace in other.namespaces.iter() {
            self.add_namespace(namespace.name()).build_from(namespace)?;
        }
        Ok(())
    }

    /// Creates a fresh namespace with this namespace's name and shape.
    ///
    /// This is how a per-instance tree is derived from a shared prototype:
    /// the two never share option storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if a default cannot be coerced.
    pub fn instantiate(&self) -> Result<Namespace> {
        let mut instance = Namespace::new(self.name.clone());
        instance.build_from(self)?;
        Ok(instance)
    }

    /// Resets every option in the subtree to its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`] if a default cannot be coerced.
    pub fn reset(&mut self) -> Result<()> {
        self.options.reset()?;
        for namespace in self.namespaces.iter_mut() {
            namespace.reset()?;
        }
        Ok(())
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.to_hash(), other.to_hash()), (Ok(a), Ok(b)) if a == b)
    }
}
