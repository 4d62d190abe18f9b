//! A single named, typed configuration value.

use tracing::trace;

use crate::error::CoerceError;
use crate::rules::Rules;
use crate::types::OptionType;
use crate::value::Value;

/// A named, typed, coercible configuration value.
///
/// The option starts out holding its default (coerced like any other write).
/// Writes go through [`OptionType::coerce`], except lazy values, which are
/// stored as-is and evaluated on every read unless the option is declared
/// [`OptionType::Lazy`].
///
/// # Examples
///
/// ```
/// use ns_options_core::{ConfigOption, OptionType, Rules, Value};
///
/// let mut stage = ConfigOption::new(
///     "stage",
///     OptionType::String,
///     Rules::new().with_default("dev"),
/// )
/// .unwrap();
/// assert_eq!(stage.value().unwrap(), Value::from("dev"));
///
/// stage.set_value(Value::symbol("prod")).unwrap();
/// assert_eq!(stage.value().unwrap(), Value::from("prod"));
///
/// stage.reset().unwrap();
/// assert_eq!(stage.value().unwrap(), Value::from("dev"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigOption {
    name: String,
    option_type: OptionType,
    rules: Rules,
    raw: Value,
}

impl ConfigOption {
    /// Creates an option and initializes it from `rules.default`.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if the default cannot be coerced to
    /// `option_type`.
    pub fn new(
        name: impl Into<String>,
        option_type: OptionType,
        rules: Rules,
    ) -> Result<Self, CoerceError> {
        let mut option = Self {
            name: name.into(),
            option_type,
            rules,
            raw: Value::Nil,
        };
        option.reset()?;
        Ok(option)
    }

    /// Name of the option.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn option_type(&self) -> &OptionType {
        &self.option_type
    }

    /// Rules the option was defined with.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Stored value, before lazy evaluation or unwrapping.
    pub fn raw_value(&self) -> &Value {
        &self.raw
    }

    /// Reads the current value.
    ///
    /// A stored lazy value is called and its result coerced on every read;
    /// that result is returned as is. A stored custom value with a
    /// [`returned_value`](crate::CustomValue::returned_value) hook yields
    /// that value. Anything else is returned as stored.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if a lazy value's result cannot be coerced.
    pub fn value(&self) -> Result<Value, CoerceError> {
        match &self.raw {
            Value::Lazy(lazy) if !self.option_type.is_lazy() => {
                trace!(option = %self.name, "evaluating lazy value");
                self.option_type.coerce(lazy.call(), &self.rules.args)
            }
            Value::Custom(custom) => Ok(custom
                .returned_value()
                .unwrap_or_else(|| self.raw.clone())),
            stored => Ok(stored.clone()),
        }
    }

    /// Writes a new value.
    ///
    /// Lazy values are stored unevaluated; everything else is coerced now.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if the value cannot be coerced. The stored
    /// value is left unchanged in that case.
    pub fn set_value(&mut self, new_value: impl Into<Value>) -> Result<(), CoerceError> {
        let new_value = new_value.into();
        self.raw = if new_value.is_lazy() {
            new_value
        } else {
            self.option_type.coerce(new_value, &self.rules.args)?
        };
        Ok(())
    }

    /// Writes the default value back.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if the default cannot be coerced.
    pub fn reset(&mut self) -> Result<(), CoerceError> {
        self.set_value(self.rules.default.clone())
    }

    /// Returns `true` if the value a read returns is meaningful.
    ///
    /// A read value that is still a custom value answers through its
    /// [`is_set`](crate::CustomValue::is_set) hook when it has one; otherwise
    /// any non-nil read value counts as set.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if reading a lazy value fails.
    pub fn is_set(&self) -> Result<bool, CoerceError> {
        let value = self.value()?;
        Ok(value
            .as_custom()
            .and_then(|custom| custom.is_set())
            .unwrap_or(!value.is_nil()))
    }

    /// Returns `true` if the option must be set.
    pub fn is_required(&self) -> bool {
        self.rules.required
    }
}

impl PartialEq for ConfigOption {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.option_type == other.option_type
            && self.rules == other.rules
            && matches!((self.value(), other.value()), (Ok(a), Ok(b)) if a == b)
    }
}
