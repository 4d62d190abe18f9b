//! Name advice for options and namespaces.
//!
//! Layers that expose options as named properties (field-style accessors,
//! generated methods, template variables) can collide with the namespace's
//! own operations. The advisor flags such names before they are defined:
//!
//! - [`NameAdvice::Reserved`]: the name is one the property layer itself
//!   relies on and must not be used.
//! - [`NameAdvice::Duplicate`]: the name is already defined in the parent and
//!   defining it again will replace the existing entry.
//! - [`NameAdvice::NotRecommended`]: the name shadows another namespace
//!   operation.
//!
//! The namespace core never consults the advisor; callers decide what to do
//! with the advice. Every finding is also logged as a warning.
//!
//! # Examples
//!
//! ```
//! use ns_options_core::{Namespace, NameAdvice, advise_option_name};
//!
//! let ns = Namespace::new("settings");
//! assert!(matches!(
//!     advise_option_name(&ns, "define"),
//!     Some(NameAdvice::Reserved { .. })
//! ));
//! assert!(matches!(
//!     advise_option_name(&ns, "reset"),
//!     Some(NameAdvice::NotRecommended { .. })
//! ));
//! assert_eq!(advise_option_name(&ns, "host"), None);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use thiserror::Error;
use tracing::warn;

use crate::namespace::Namespace;

/// Names the property layer depends on; never valid for options or namespaces.
pub const RESERVED_NAMES: &[&str] = &["option", "namespace", "define", "options"];

/// Public operations of [`Namespace`] that a same-named property would shadow.
pub const NAMESPACE_OPERATIONS: &[&str] = &[
    "name",
    "namespaces",
    "build",
    "from_map",
    "define_body",
    "add_option",
    "add_namespace",
    "add_namespace_with",
    "remove_option",
    "remove_namespace",
    "has_option",
    "has_namespace",
    "get_option",
    "get_option_mut",
    "get_namespace",
    "get_namespace_mut",
    "namespace_mut",
    "option_value",
    "set_option",
    "required_set",
    "to_hash",
    "entries",
    "apply",
    "build_from",
    "instantiate",
    "reset",
    "to_json",
    "apply_json",
];

static NOT_RECOMMENDED: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NAMESPACE_OPERATIONS.iter().copied().collect());

/// What kind of entry a name is being checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A top-level namespace.
    Namespace,
    /// A namespace nested in another namespace.
    SubNamespace,
    /// An option.
    Option,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Namespace => "namespace",
            Self::SubNamespace => "sub-namespace",
            Self::Option => "option",
        })
    }
}

/// A problem with a proposed option or namespace name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameAdvice {
    /// The name is reserved and must not be used.
    #[error(
        "the {kind} '{name}' overwrites a namespace method the property layer depends on; \
         please choose a different name for your {kind}"
    )]
    Reserved {
        /// Kind of entry being named.
        kind: NameKind,
        /// The offending name.
        name: String,
    },
    /// The name is already defined and will be replaced.
    #[error("'{name}' has already been defined and will be overwritten")]
    Duplicate {
        /// Kind of entry being named.
        kind: NameKind,
        /// The offending name.
        name: String,
    },
    /// The name shadows a namespace operation.
    #[error(
        "the {kind} '{name}' shadows a namespace method; \
         this will limit some of the functionality of the namespace"
    )]
    NotRecommended {
        /// Kind of entry being named.
        kind: NameKind,
        /// The offending name.
        name: String,
    },
}

impl NameAdvice {
    /// Returns `true` for advice that should stop the definition.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Reserved { .. })
    }
}

/// Returns `true` if `name` may never be used for an option or namespace.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Checks the name of a top-level namespace.
///
/// Only `options` is flagged: it is what hosts conventionally expose the root
/// namespace through.
pub fn advise_root_name(name: &str) -> Option<NameAdvice> {
    let advice = (name == "options").then(|| NameAdvice::NotRecommended {
        kind: NameKind::Namespace,
        name: name.to_string(),
    });
    log_advice(advice)
}

/// Checks the name of a namespace about to be added to `parent`.
pub fn advise_namespace_name(parent: &Namespace, name: &str) -> Option<NameAdvice> {
    log_advice(advise(NameKind::SubNamespace, parent, name))
}

/// Checks the name of an option about to be added to `parent`.
pub fn advise_option_name(parent: &Namespace, name: &str) -> Option<NameAdvice> {
    log_advice(advise(NameKind::Option, parent, name))
}

fn advise(kind: NameKind, parent: &Namespace, name: &str) -> Option<NameAdvice> {
    let name_owned = || name.to_string();

    if is_reserved(name) {
        Some(NameAdvice::Reserved {
            kind,
            name: name_owned(),
        })
    } else if parent.has_option(name) || parent.has_namespace(name) {
        Some(NameAdvice::Duplicate {
            kind,
            name: name_owned(),
        })
    } else if NOT_RECOMMENDED.contains(name) {
        Some(NameAdvice::NotRecommended {
            kind,
            name: name_owned(),
        })
    } else {
        None
    }
}

fn log_advice(advice: Option<NameAdvice>) -> Option<NameAdvice> {
    if let Some(advice) = &advice {
        warn!(%advice, "name advice");
    }
    advice
}
