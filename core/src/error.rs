//! Error types for namespace and option operations.
//!
//! Coercion failures are reported as [`CoerceError`], which keeps the
//! underlying conversion failure as its [`source`](std::error::Error::source)
//! so callers see where the conversion actually broke. Everything a namespace
//! operation can fail with is collected in [`Error`].

use thiserror::Error;

/// Boxed error returned by conversions and [`TypeClass`](crate::TypeClass)
/// constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A value could not be converted to an option's declared type.
///
/// # Examples
///
/// ```
/// use ns_options_core::{ConfigOption, OptionType, Rules, Value};
///
/// let mut port = ConfigOption::new("port", OptionType::Integer, Rules::default()).unwrap();
/// let err = port.set_value(Value::from("eighty")).unwrap_err();
/// assert_eq!(err.type_name, "Integer");
/// assert!(err.to_string().starts_with("can't coerce `\"eighty\"' to `Integer'"));
/// ```
#[derive(Debug, Error)]
#[error("can't coerce `{value}' to `{type_name}': {message}")]
pub struct CoerceError {
    /// Name of the target type.
    pub type_name: String,
    /// Printable form of the value that failed to convert.
    pub value: String,
    /// Message of the underlying failure.
    pub message: String,
    #[source]
    source: BoxError,
}

impl CoerceError {
    /// Wraps a conversion failure for `value` aimed at `type_name`.
    pub fn new(type_name: impl Into<String>, value: impl Into<String>, source: BoxError) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
            message: source.to_string(),
            source,
        }
    }
}

/// A conversion failure without a more specific error type behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl ConversionError {
    /// Boxes a message as a [`BoxError`].
    pub fn boxed(message: impl Into<String>) -> BoxError {
        Box::new(Self(message.into()))
    }
}

/// Errors that can occur while reading or writing a namespace.
#[derive(Debug, Error)]
pub enum Error {
    /// A value could not be coerced to the declared option type.
    #[error(transparent)]
    Coerce(#[from] CoerceError),

    /// Write to a name that has no option defined.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Lookup of a name that has no child namespace defined.
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
