//! Option rules: default value, required flag and constructor args.

use crate::value::{Value, ValueMap};

/// Rules attached to an option.
///
/// `args` is always a normalized list, whatever shape it was given in.
///
/// # Examples
///
/// ```
/// use ns_options_core::{Rules, Value};
///
/// let rules = Rules::new()
///     .with_default("dev")
///     .mark_required()
///     .with_args(Value::from(","));
/// assert_eq!(rules.default, Value::from("dev"));
/// assert!(rules.required);
/// assert_eq!(rules.args, vec![Value::from(",")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    /// Value the option starts with and returns to on reset.
    pub default: Value,
    /// Whether the option must be set for its namespace to validate.
    pub required: bool,
    /// Extra constructor arguments passed during coercion.
    pub args: Vec<Value>,
    /// Rule keys with no built-in meaning, kept for the caller.
    pub extra: ValueMap,
}

impl Rules {
    /// Creates empty rules: nil default, not required, no args.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Marks the option as required.
    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the constructor args, normalizing a scalar into a one-item list.
    pub fn with_args(mut self, args: impl Into<Value>) -> Self {
        self.args = normalize_args(args.into());
        self
    }

    /// Builds rules from a plain map.
    ///
    /// Recognizes `default`, `required` (or the legacy `require`) and `args`.
    /// Every other key is kept in [`extra`](Rules::extra).
    ///
    /// # Examples
    ///
    /// ```
    /// use ns_options_core::{Rules, Value, value_map};
    ///
    /// let rules = Rules::from_map(value_map([
    ///     ("default", Value::from(10)),
    ///     ("require", Value::from(true)),
    ///     ("args", Value::from("x")),
    ///     ("doc", Value::from("retry count")),
    /// ]));
    /// assert_eq!(rules.default, Value::from(10));
    /// assert!(rules.required);
    /// assert_eq!(rules.args, vec![Value::from("x")]);
    /// assert_eq!(rules.extra.get("doc"), Some(&Value::from("retry count")));
    /// ```
    pub fn from_map(mut map: ValueMap) -> Self {
        let default = map.shift_remove("default").unwrap_or_default();
        let required = map.shift_remove("required").is_some_and(|v| is_truthy(&v));
        let require = map.shift_remove("require").is_some_and(|v| is_truthy(&v));
        let args = normalize_args(map.shift_remove("args").unwrap_or_default());

        Self {
            default,
            required: required || require,
            args,
            extra: map,
        }
    }
}

fn normalize_args(args: Value) -> Vec<Value> {
    match args {
        Value::Nil => Vec::new(),
        Value::Array(items) => items,
        scalar => vec![scalar],
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Nil | Value::Bool(false))
}
