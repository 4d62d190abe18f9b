//! Ordered collection of options keyed by name.

use indexmap::IndexMap;

use crate::error::{CoerceError, Error, Result};
use crate::option::ConfigOption;
use crate::rules::Rules;
use crate::types::OptionType;
use crate::value::Value;

/// Options of one namespace, in definition order.
///
/// # Examples
///
/// ```
/// use ns_options_core::{OptionSet, OptionType, Rules, Value};
///
/// let mut options = OptionSet::new();
/// options.add("host", OptionType::String, Rules::new().with_default("localhost")).unwrap();
/// options.add("port", OptionType::Integer, Rules::new().mark_required()).unwrap();
/// assert!(!options.required_set().unwrap());
///
/// options.set("port", Value::from("5432")).unwrap();
/// assert_eq!(options.value("port").unwrap(), Value::Integer(5432));
/// assert!(options.required_set().unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    options: IndexMap<String, ConfigOption>,
}

impl OptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if no options are defined.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over options in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.values()
    }

    /// Option names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Defines an option, replacing any option with the same name.
    ///
    /// A replaced option keeps its position in the definition order.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if the default cannot be coerced.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        option_type: OptionType,
        rules: Rules,
    ) -> std::result::Result<&mut ConfigOption, CoerceError> {
        let option = ConfigOption::new(name, option_type, rules)?;
        let (index, _) = self.options.insert_full(option.name().to_string(), option);
        Ok(&mut self.options[index])
    }

    /// Removes an option, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<ConfigOption> {
        self.options.shift_remove(name)
    }

    /// Returns `true` if an option with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Looks up an option.
    pub fn get(&self, name: &str) -> Option<&ConfigOption> {
        self.options.get(name)
    }

    /// Looks up an option mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ConfigOption> {
        self.options.get_mut(name)
    }

    /// Reads an option's value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOption`] if no option has this name, or
    /// [`Error::Coerce`] if a lazy value fails to coerce.
    pub fn value(&self, name: &str) -> Result<Value> {
        let option = self
            .get(name)
            .ok_or_else(|| Error::UnknownOption(name.to_string()))?;
        Ok(option.value()?)
    }

    /// Writes an option's value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOption`] if no option has this name, or
    /// [`Error::Coerce`] if the value cannot be coerced.
    pub fn set(&mut self, name: &str, new_value: impl Into<Value>) -> Result<&ConfigOption> {
        let option = self
            .get_mut(name)
            .ok_or_else(|| Error::UnknownOption(name.to_string()))?;
        option.set_value(new_value)?;
        Ok(option)
    }

    /// Returns `true` if every required option is set.
    ///
    /// Vacuously `true` when nothing is required.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if reading a lazy value fails.
    pub fn required_set(&self) -> std::result::Result<bool, CoerceError> {
        for option in self.iter().filter(|option| option.is_required()) {
            if !option.is_set()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Resets every option to its default.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if a default cannot be coerced.
    pub fn reset(&mut self) -> std::result::Result<(), CoerceError> {
        for option in self.options.values_mut() {
            option.reset()?;
        }
        Ok(())
    }
}
