//! The uniform value type for parsed command arguments.
//!
//! Parsers produce [`ArgValue`]s so the command tree can store parameter
//! nodes of mixed types behind one interface. Embedder-specific types
//! travel as [`ArgValue::Other`] with a named [`ArgType::Custom`]
//! descriptor.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A parsed command argument.
///
/// Values are immutable and cheaply cloneable.
#[derive(Clone)]
pub enum ArgValue {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value (also the result of enum and greedy parsers).
    String(Arc<str>),
    /// An embedder-defined value behind its registered type name.
    Other {
        /// The registered type name, matching [`ArgType::Custom`].
        type_name: Arc<str>,
        /// The erased value.
        value: Arc<dyn Any + Send + Sync>,
    },
}

impl ArgValue {
    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::String(s.into())
    }

    /// Wraps an embedder-defined value under the given type name.
    #[must_use]
    pub fn other<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, value: T) -> Self {
        Self::Other {
            type_name: type_name.into(),
            value: Arc::new(value),
        }
    }

    /// Returns the type descriptor of this value.
    #[must_use]
    pub fn arg_type(&self) -> ArgType {
        match self {
            Self::Bool(_) => ArgType::Bool,
            Self::Int(_) => ArgType::Int,
            Self::Float(_) => ArgType::Float,
            Self::String(_) => ArgType::String,
            Self::Other { type_name, .. } => ArgType::Custom(Arc::clone(type_name)),
        }
    }

    /// Attempts to extract a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    ///
    /// Note: Converting large i64 values to f64 may lose precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to downcast an embedder-defined value.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Other { value, .. } => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Other { type_name, .. } => write!(f, "<{type_name}>"),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Other { type_name, .. } => write!(f, "<{type_name}>"),
        }
    }
}

impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Other { value: a, .. }, Self::Other { value: b, .. }) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Type descriptor for a declared parameter.
///
/// Registries resolve parsers, suggestion providers, and validators by
/// matching on this descriptor together with the parameter's annotations.
#[derive(Clone, PartialEq, Eq)]
pub enum ArgType {
    /// Boolean parameter (`true` / `false`).
    Bool,
    /// Integer parameter.
    Int,
    /// Floating-point parameter.
    Float,
    /// Single-token (or quoted) string parameter.
    String,
    /// String parameter consuming all remaining input; final position only.
    GreedyString,
    /// Closed set of named variants.
    Enum(Arc<EnumType>),
    /// An embedder-defined type, resolved by a registered factory.
    Custom(Arc<str>),
}

impl ArgType {
    /// Creates an enum type from a name and its variants.
    #[must_use]
    pub fn enumeration(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Enum(Arc::new(EnumType {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }))
    }

    /// Creates a custom type descriptor from a registered type name.
    #[must_use]
    pub fn custom(name: impl Into<Arc<str>>) -> Self {
        Self::Custom(name.into())
    }
}

impl fmt::Debug for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::GreedyString => write!(f, "string..."),
            Self::Enum(e) => write!(f, "{}", e.name),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A closed set of named variants for an enum parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    /// The enum's display name.
    pub name: String,
    /// Variant names in declaration order.
    pub variants: Vec<String>,
}

impl EnumType {
    /// Finds the canonical variant matching a token, case-insensitively.
    #[must_use]
    pub fn matching_variant(&self, token: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.eq_ignore_ascii_case(token))
            .map(String::as_str)
    }
}
