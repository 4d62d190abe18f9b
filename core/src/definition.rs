//! Declarative namespace bodies.
//!
//! A [`Definition`] lists options and child namespaces without naming the
//! namespace they end up in. Applying it runs every entry against the target
//! namespace in order, as if the body had been written inside that namespace.
//! The same definition can shape any number of namespaces.

use crate::error::Result;
use crate::namespace::Namespace;
use crate::rules::Rules;
use crate::types::OptionType;

/// A reusable namespace body.
///
/// # Examples
///
/// ```
/// use ns_options_core::{Definition, Namespace, OptionType, Rules, Value};
///
/// let body = Definition::new()
///     .option("host", OptionType::String, Rules::new().with_default("localhost"))
///     .namespace(
///         "pool",
///         Definition::new().option("size", OptionType::Integer, Rules::new().with_default(5)),
///     );
///
/// let mut db = Namespace::new("db");
/// db.define_body(&body).unwrap();
///
/// assert_eq!(db.option_value("host").unwrap(), Value::from("localhost"));
/// assert!(db.get_namespace("pool").unwrap().has_option("size"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Definition {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
enum Entry {
    Option {
        name: String,
        option_type: OptionType,
        rules: Rules,
    },
    Namespace {
        name: String,
        body: Definition,
    },
}

impl Definition {
    /// Creates an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an option entry.
    pub fn option(mut self, name: impl Into<String>, option_type: OptionType, rules: Rules) -> Self {
        self.entries.push(Entry::Option {
            name: name.into(),
            option_type,
            rules,
        });
        self
    }

    /// Appends a child namespace entry with its own body.
    pub fn namespace(mut self, name: impl Into<String>, body: Definition) -> Self {
        self.entries.push(Entry::Namespace {
            name: name.into(),
            body,
        });
        self
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the body has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every entry against `namespace`, in order.
    ///
    /// Entries follow the namespace's replacement policy, so a later entry
    /// with the same name replaces an earlier one of either kind.
    ///
    /// # Errors
    ///
    /// Returns the first error from adding an option.
    pub fn apply_to(&self, namespace: &mut Namespace) -> Result<()> {
        for entry in &self.entries {
            match entry {
                Entry::Option {
                    name,
                    option_type,
                    rules,
                } => {
                    namespace.add_option(name.as_str(), option_type.clone(), rules.clone())?;
                }
                Entry::Namespace { name, body } => {
                    namespace.add_namespace(name.as_str()).define_body(body)?;
                }
            }
        }
        Ok(())
    }
}
