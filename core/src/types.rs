//! Option type descriptors and value coercion.
//!
//! Every option carries an [`OptionType`]. Writing a value to the option runs
//! it through [`OptionType::coerce`]:
//!
//! 1. `nil` and values that already are instances of the type pass through.
//! 2. `Integer`, `Float` and `String` use the native scalar conversions.
//! 3. `Symbol` converts strings; anything else has no symbol form.
//! 4. `Map` only accepts maps.
//! 5. `Boolean`, `Array` and [`Custom`](OptionType::Custom) types build a new
//!    instance from the value plus the option's extra constructor args.
//!
//! Any failure is reported as a [`CoerceError`] naming the target type and
//! the offending value.
//!
//! # Examples
//!
//! ```
//! use ns_options_core::{OptionType, Value};
//!
//! let port = OptionType::Integer.coerce(Value::from("8080"), &[]).unwrap();
//! assert_eq!(port, Value::Integer(8080));
//!
//! let ratio = OptionType::Float.coerce(Value::from(1), &[]).unwrap();
//! assert_eq!(ratio, Value::Float(1.0));
//!
//! assert!(OptionType::Integer.coerce(Value::from("8080.5"), &[]).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, CoerceError, ConversionError};
use crate::value::Value;

/// A caller-defined option type.
///
/// Coercing to [`OptionType::Custom`] calls [`construct`](TypeClass::construct)
/// with the written value followed by the option's `args` rule, unless
/// [`is_instance`](TypeClass::is_instance) says the value already belongs to
/// the type.
pub trait TypeClass: fmt::Debug + Send + Sync {
    /// Type name used in diagnostics and equality.
    fn name(&self) -> &str;

    /// Returns `true` if `value` is already an instance of this type.
    ///
    /// The default accepts custom values whose type name matches.
    fn is_instance(&self, value: &Value) -> bool {
        value
            .as_custom()
            .is_some_and(|custom| custom.type_name() == self.name())
    }

    /// Builds an instance from `value` and the extra constructor `args`.
    ///
    /// # Errors
    ///
    /// Returns any error that prevents building the instance; it becomes the
    /// source of the resulting [`CoerceError`].
    fn construct(&self, value: Value, args: &[Value]) -> Result<Value, BoxError>;
}

/// Declared type of an option.
///
/// # Examples
///
/// ```
/// use ns_options_core::{OptionType, Value};
///
/// assert_eq!(OptionType::default(), OptionType::Any);
/// assert!(OptionType::Any.is_instance(&Value::from("anything")));
/// assert!(OptionType::Lazy.is_lazy());
/// ```
#[derive(Debug, Clone, Default)]
pub enum OptionType {
    /// Accepts any value without coercion (the default).
    #[default]
    Any,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// String.
    String,
    /// Symbol.
    Symbol,
    /// Boolean with lenient truthiness rules.
    Boolean,
    /// Array.
    Array,
    /// Map.
    Map,
    /// Deferred computation stored verbatim instead of being evaluated.
    Lazy,
    /// Caller-defined type.
    Custom(Arc<dyn TypeClass>),
}

impl OptionType {
    /// Wraps a caller-defined type.
    pub fn custom(type_class: impl TypeClass + 'static) -> Self {
        Self::Custom(Arc::new(type_class))
    }

    /// Name of the type.
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "Any",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Symbol => "Symbol",
            Self::Boolean => "Boolean",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::Lazy => "Lazy",
            Self::Custom(type_class) => type_class.name(),
        }
    }

    /// Returns `true` if this type stores deferred computations verbatim.
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy)
    }

    /// Returns `true` if `value` already is an instance of this type.
    pub fn is_instance(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Integer => matches!(value, Value::Integer(_)),
            Self::Float => matches!(value, Value::Float(_)),
            Self::String => matches!(value, Value::String(_)),
            Self::Symbol => matches!(value, Value::Symbol(_)),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::Array => matches!(value, Value::Array(_)),
            Self::Map => matches!(value, Value::Map(_)),
            Self::Lazy => matches!(value, Value::Lazy(_)),
            Self::Custom(type_class) => type_class.is_instance(value),
        }
    }

    /// Converts `value` to this type.
    ///
    /// `nil` and values that already are instances pass through untouched.
    /// `args` are the extra constructor arguments from the option's rules.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] if the conversion fails.
    pub fn coerce(&self, value: Value, args: &[Value]) -> Result<Value, CoerceError> {
        if value.is_nil() || self.is_instance(&value) {
            return Ok(value);
        }

        let printable = value.to_string();
        self.convert(value, args)
            .map_err(|source| CoerceError::new(self.name(), printable, source))
    }

    fn convert(&self, value: Value, args: &[Value]) -> Result<Value, BoxError> {
        match self {
            Self::Any => Ok(value),
            Self::Integer => to_integer(&value).map(Value::Integer),
            Self::Float => to_float(&value).map(Value::Float),
            Self::String => Ok(Value::String(value.to_plain_string())),
            Self::Symbol => match value {
                Value::String(s) => Ok(Value::Symbol(s)),
                other => Err(ConversionError::boxed(format!(
                    "undefined method `to_sym' for {other}"
                ))),
            },
            Self::Boolean => Ok(Value::Bool(truthy(&value))),
            Self::Array => to_array(value, args).map(Value::Array),
            Self::Map => Err(ConversionError::boxed(format!(
                "no implicit conversion of {} into Map",
                value.kind_name()
            ))),
            Self::Lazy => Err(ConversionError::boxed(format!(
                "can't build a lazy value from {}",
                value.kind_name()
            ))),
            Self::Custom(type_class) => type_class.construct(value, args),
        }
    }
}

impl PartialEq for OptionType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => a.name() == b.name(),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Type used when an option is created on the fly for this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ns_options_core::{OptionType, Value};
    ///
    /// assert_eq!(Value::from(true).runtime_type(), OptionType::Boolean);
    /// assert_eq!(Value::from("x").runtime_type(), OptionType::String);
    /// assert_eq!(Value::Nil.runtime_type(), OptionType::Any);
    /// ```
    pub fn runtime_type(&self) -> OptionType {
        match self {
            Self::Nil | Self::Custom(_) => OptionType::Any,
            Self::Bool(_) => OptionType::Boolean,
            Self::Integer(_) => OptionType::Integer,
            Self::Float(_) => OptionType::Float,
            Self::String(_) => OptionType::String,
            Self::Symbol(_) => OptionType::Symbol,
            Self::Array(_) => OptionType::Array,
            Self::Map(_) => OptionType::Map,
            Self::Lazy(_) => OptionType::Lazy,
        }
    }
}

fn to_integer(value: &Value) -> Result<i64, BoxError> {
    match value {
        Value::Float(x) => {
            // i64::MAX is not representable as f64, so the upper bound is exclusive.
            if !x.is_finite() || *x < i64::MIN as f64 || *x >= i64::MAX as f64 {
                return Err(ConversionError::boxed(format!("{x:?} out of range of Integer")));
            }
            Ok(x.trunc() as i64)
        }
        Value::String(s) => parse_integer(s),
        other => Err(ConversionError::boxed(format!(
            "can't convert {} into Integer",
            other.kind_name()
        ))),
    }
}

fn parse_integer(text: &str) -> Result<i64, BoxError> {
    let invalid = || ConversionError::boxed(format!("invalid value for Integer(): {text:?}"));

    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(hex) = lower.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (2, bin)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (8, oct)
    } else if let Some(dec) = lower.strip_prefix("0d") {
        (10, dec)
    } else if lower.len() > 1 && lower.starts_with('0') {
        // Leading zero means octal, as in "010" == 8.
        (8, lower[1..].strip_prefix('_').unwrap_or(&lower[1..]))
    } else {
        (10, lower.as_str())
    };

    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        || !underscores_between_digits(digits)
    {
        return Err(invalid());
    }

    let cleaned = digits.replace('_', "");
    let signed = if negative {
        format!("-{cleaned}")
    } else {
        cleaned
    };
    i64::from_str_radix(&signed, radix).map_err(|_| invalid())
}

fn to_float(value: &Value) -> Result<f64, BoxError> {
    match value {
        Value::Integer(i) => Ok(*i as f64),
        Value::String(s) => parse_float(s),
        other => Err(ConversionError::boxed(format!(
            "can't convert {} into Float",
            other.kind_name()
        ))),
    }
}

fn parse_float(text: &str) -> Result<f64, BoxError> {
    let invalid = || ConversionError::boxed(format!("invalid value for Float(): {text:?}"));

    let trimmed = text.trim();
    // Only digits, signs, the decimal point and an exponent; no "inf" or "NaN".
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'_' | b'.' | b'+' | b'-' | b'e' | b'E'))
        || !underscores_between_digits(trimmed)
    {
        return Err(invalid());
    }
    let parsed: f64 = trimmed.replace('_', "").parse().map_err(|_| invalid())?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ConversionError::boxed(format!("{text:?} out of range of Float")))
    }
}

/// Underscores may only separate two digits.
fn underscores_between_digits(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && i + 1 < bytes.len()
                && bytes[i - 1].is_ascii_alphanumeric()
                && bytes[i + 1].is_ascii_alphanumeric())
    })
}

/// Boolean conversion: `0`, `0.0`, `"0"`, `"false"`, `"f"` and `"F"` are
/// false, everything else is true.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::Float(x) => *x != 0.0,
        Value::String(s) => !matches!(s.as_str(), "0" | "false" | "f" | "F"),
        _ => true,
    }
}

fn to_array(value: Value, args: &[Value]) -> Result<Vec<Value>, BoxError> {
    match value {
        Value::Integer(len) => {
            let len = usize::try_from(len)
                .map_err(|_| ConversionError::boxed(format!("negative array size: {len}")))?;
            let mut items = Vec::new();
            items
                .try_reserve_exact(len)
                .map_err(|_| ConversionError::boxed(format!("array size too big: {len}")))?;
            items.resize(len, args.first().cloned().unwrap_or_default());
            Ok(items)
        }
        other => Err(ConversionError::boxed(format!(
            "no implicit conversion of {} into Array",
            other.kind_name()
        ))),
    }
}
