//! JSON interop for values and namespaces.
//!
//! [`Value`] serializes with [`serde`], so any exported tree can be handed
//! to a serde format. Lazy values have no serialized form and fail; export
//! through [`Namespace::to_hash`] first, which evaluates them.
//!
//! # Examples
//!
//! ```
//! use ns_options_core::{Namespace, OptionType, Rules};
//! use serde_json::json;
//!
//! let mut ns = Namespace::new("server");
//! ns.add_option("port", OptionType::Integer, Rules::new().with_default(8080)).unwrap();
//!
//! ns.apply_json(json!({ "port": "9090", "tls": true }).as_object().unwrap()).unwrap();
//! assert_eq!(ns.to_json().unwrap(), json!({ "port": 9090, "tls": true }));
//! ```

use serde::ser::{Error as _, Serialize, Serializer};

use crate::error::Result;
use crate::namespace::Namespace;
use crate::value::{Value, ValueMap};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::String(s) | Self::Symbol(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Map(map) => serializer.collect_map(map),
            Self::Lazy(_) => Err(S::Error::custom(
                "lazy values must be evaluated before serializing",
            )),
            Self::Custom(custom) => match (custom.to_json(), custom.returned_value()) {
                (Some(json), _) => json.serialize(serializer),
                (None, Some(value)) => value.serialize(serializer),
                (None, None) => Err(S::Error::custom(format!(
                    "{} has no serialized form",
                    custom.type_name()
                ))),
            },
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Nil,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map_or(Self::Nil, Self::Float),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(object) => Self::Map(map_from_json(object)),
        }
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> std::result::Result<Self, Self::Error> {
        serde_json::to_value(value)
    }
}

fn map_from_json(object: serde_json::Map<String, serde_json::Value>) -> ValueMap {
    object
        .into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect()
}

impl Namespace {
    /// Exports the subtree as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`](crate::Error::Coerce) if a lazy value fails
    /// to coerce, or [`Error::Json`](crate::Error::Json) if a custom value
    /// has no serialized form.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(Value::Map(self.to_hash()?))?)
    }

    /// Applies a JSON object, exactly like [`apply`](Namespace::apply).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coerce`](crate::Error::Coerce) if a value cannot be
    /// coerced to an existing option's type.
    pub fn apply_json(&mut self, object: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
        self.apply(&map_from_json(object.clone()))
    }
}
