//! Dynamic values stored in options.
//!
//! Options are declared with a type descriptor but hold a [`Value`], a small
//! dynamic model covering the scalar kinds (nil, booleans, numbers, strings,
//! symbols), the two containers (arrays and ordered maps), deferred
//! computations ([`LazyValue`]) and caller-defined values ([`CustomValue`]).
//!
//! Cloning a `Value` copies all owned data, so a clone never aliases the
//! original: mutating an exported array leaves the stored option untouched.
//! Lazy values are the one exception; their closures are shared because they
//! are immutable.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Ordered string-keyed map used for bulk import and export.
pub type ValueMap = IndexMap<String, Value>;

/// A configuration value.
///
/// # Examples
///
/// ```
/// use ns_options_core::Value;
///
/// assert_eq!(Value::from(3), Value::Integer(3));
/// assert_eq!(Value::from("dev").as_str(), Some("dev"));
/// assert!(Value::Nil.is_nil());
/// assert_eq!(Value::symbol("prod").to_string(), ":prod");
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Nil,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Interned-style identifier, printed as `:name`.
    Symbol(String),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Ordered map of values.
    Map(ValueMap),
    /// Deferred computation, evaluated on every read.
    Lazy(LazyValue),
    /// Value of a caller-defined type.
    Custom(Box<dyn CustomValue>),
}

impl Value {
    /// Creates a symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Creates a lazy value from a zero-argument closure.
    ///
    /// # Examples
    ///
    /// ```
    /// use ns_options_core::Value;
    ///
    /// let lazy = Value::lazy(|| Value::from(42));
    /// assert!(lazy.is_lazy());
    /// ```
    pub fn lazy(f: impl Fn() -> Value + 'static) -> Self {
        Self::Lazy(LazyValue::new(f))
    }

    /// Creates a map value from key/value pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(value_map(entries))
    }

    /// Returns `true` for [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns `true` for [`Value::Lazy`].
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`Value::Integer`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number as `f64` for integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text of a string or symbol.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements, if this is a [`Value::Array`].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the elements mutably, if this is a [`Value::Array`].
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the map, if this is a [`Value::Map`].
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the custom value, if this is a [`Value::Custom`].
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(custom) => Some(custom.as_ref()),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Nil => "Nil",
            Self::Bool(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
            Self::Symbol(_) => "Symbol",
            Self::Array(_) => "Array",
            Self::Map(_) => "Map",
            Self::Lazy(_) => "Lazy",
            Self::Custom(custom) => custom.type_name(),
        }
    }

    /// Plain text form used by string coercion.
    ///
    /// Strings and symbols yield their bare text; every other kind yields its
    /// printable form.
    ///
    /// # Examples
    ///
    /// ```
    /// use ns_options_core::Value;
    ///
    /// assert_eq!(Value::symbol("prod").to_plain_string(), "prod");
    /// assert_eq!(Value::from(1.0).to_plain_string(), "1.0");
    /// assert_eq!(Value::from("a").to_plain_string(), "a");
    /// ```
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Nil => String::new(),
            Self::String(s) | Self::Symbol(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Builds a [`ValueMap`] from key/value pairs.
///
/// # Examples
///
/// ```
/// use ns_options_core::{Value, value_map};
///
/// let map = value_map([("a", Value::from(1)), ("b", Value::from(2))]);
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
pub fn value_map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> ValueMap {
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Lazy(a), Self::Lazy(b)) => a.ptr_eq(b),
            (Self::Custom(a), Self::Custom(b)) => a.eq_value(b.as_ref()),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => write!(f, ":{s}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Lazy(_) => f.write_str("<lazy>"),
            Self::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

/// A zero-argument deferred computation.
///
/// Reading an option that stores a lazy value calls the closure every time;
/// the result is never cached. Lazy values are single-threaded (`Rc`).
#[derive(Clone)]
pub struct LazyValue(Rc<dyn Fn() -> Value>);

impl LazyValue {
    /// Wraps a closure.
    pub fn new(f: impl Fn() -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the closure.
    pub fn call(&self) -> Value {
        (self.0)()
    }

    /// Returns `true` if both handles share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyValue(..)")
    }
}

/// A value of a caller-defined type.
///
/// Custom values are produced by [`TypeClass::construct`](crate::TypeClass::construct)
/// when coercing to a [`OptionType::Custom`](crate::OptionType::Custom).
/// Two optional hooks shape how an option exposes them:
///
/// - [`returned_value`](CustomValue::returned_value): when it returns
///   `Some`, reading the option yields that value instead of the wrapper.
/// - [`is_set`](CustomValue::is_set): when a read yields the custom value
///   itself and this returns `Some`, it decides whether the option counts
///   as set for required-option validation.
pub trait CustomValue: fmt::Debug + fmt::Display {
    /// Name of the type, matching the [`TypeClass`](crate::TypeClass) name.
    fn type_name(&self) -> &str;

    /// Clones into a new box.
    fn clone_box(&self) -> Box<dyn CustomValue>;

    /// Structural equality with another custom value.
    fn eq_value(&self, other: &dyn CustomValue) -> bool;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Value to hand out instead of the wrapper itself.
    fn returned_value(&self) -> Option<Value> {
        None
    }

    /// Type-specific answer to "is this meaningfully set".
    fn is_set(&self) -> Option<bool> {
        None
    }

    /// Plain JSON form, if the type has one.
    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }
}

impl Clone for Box<dyn CustomValue> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_clone_does_not_alias_arrays() {
        let original = Value::from(vec![Value::from(1), Value::from(2)]);
        let mut copy = original.clone();
        copy.as_array_mut().unwrap().push(Value::from(3));

        assert_eq!(original.as_array().unwrap().len(), 2);
        assert_eq!(copy.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_lazy_clone_shares_closure() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lazy = LazyValue::new(move || {
            counter.set(counter.get() + 1);
            Value::Nil
        });
        let copy = lazy.clone();

        assert!(lazy.ptr_eq(&copy));
        copy.call();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_display_forms() {
        let map = Value::map([
            ("a", Value::from(1)),
            ("b", Value::from(vec![Value::from("x"), Value::Nil])),
        ]);
        assert_eq!(map.to_string(), "{a: 1, b: [\"x\", nil]}");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::lazy(|| Value::Nil).to_string(), "<lazy>");
    }

    #[test]
    fn test_option_converts_to_nil() {
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_integer_and_float_are_distinct() {
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_eq!(Value::from(1).as_f64(), Some(1.0));
    }
}
