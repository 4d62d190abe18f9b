//! Hierarchical, typed configuration namespaces.
//!
//! This crate lets a host declare a tree of named configuration values:
//!
//! - [`ConfigOption`]: a named value with a declared [`OptionType`], a
//!   default and a required flag ([`Rules`]). Writes are coerced to the
//!   declared type; lazy values are evaluated on every read.
//! - [`OptionSet`]: the options of one namespace, in definition order.
//! - [`Namespace`]: a tree node owning an option set and child namespaces.
//!   A name is either an option or a namespace, never both.
//! - [`NamespaceSet`]: the child namespaces of a namespace.
//!
//! Trees are exported to nested maps with [`Namespace::to_hash`] and filled
//! from them with [`Namespace::apply`]. [`Namespace::build_from`] copies
//! another tree's shape (definitions, not values), which is how per-instance
//! trees are derived from a shared prototype without sharing state.
//!
//! # Example
//!
//! ```
//! use ns_options_core::*;
//!
//! let mut app = Namespace::build("app", |app| {
//!     app.add_option("stage", OptionType::String, Rules::new().with_default("dev"))?;
//!     app.add_namespace_with("db", |db| {
//!         db.add_option("url", OptionType::String, Rules::new().mark_required())?;
//!         db.add_option("pool", OptionType::Integer, Rules::new().with_default(5))?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert!(!app.required_set().unwrap());
//!
//! app.apply(&value_map([
//!     ("stage", Value::symbol("prod")),
//!     ("db", Value::map([("url", Value::from("postgres://db")), ("pool", Value::from("10"))])),
//! ]))
//! .unwrap();
//!
//! assert!(app.required_set().unwrap());
//! assert_eq!(app.option_value("stage").unwrap(), Value::from("prod"));
//! assert_eq!(app.namespace("db").unwrap().option_value("pool").unwrap(), Value::Integer(10));
//!
//! // A per-request copy with the same shape, starting from defaults.
//! let request = app.instantiate().unwrap();
//! assert_eq!(request.option_value("stage").unwrap(), Value::from("dev"));
//! ```

mod advisor;
mod definition;
mod error;
mod json;
mod namespace;
mod namespace_set;
mod option;
mod option_set;
mod rules;
mod types;
mod value;

pub use advisor::{
    NAMESPACE_OPERATIONS, NameAdvice, NameKind, RESERVED_NAMES, advise_namespace_name,
    advise_option_name, advise_root_name, is_reserved,
};
pub use definition::Definition;
pub use error::{BoxError, CoerceError, ConversionError, Error, Result};
pub use namespace::Namespace;
pub use namespace_set::NamespaceSet;
pub use option::ConfigOption;
pub use option_set::OptionSet;
pub use rules::Rules;
pub use types::{OptionType, TypeClass};
pub use value::{CustomValue, LazyValue, Value, ValueMap, value_map};
