//! Core types, values, and input handling for Herald.
//!
//! This crate provides:
//! - [`StringStream`] / [`StreamView`] - Cursor-tracked readers over raw input
//! - [`ArgValue`] - The uniform value type for parsed command arguments
//! - [`ArgType`] - Type descriptors used to key parser registries
//! - [`AnnotationList`] - Ordered, de-duplicated metadata attached to
//!   commands and parameters
//! - [`Error`] - The structured error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod annotation;
pub mod error;
pub mod stream;
pub mod value;

// Re-export primary types at crate root for convenience
pub use annotation::{AnnotationEntry, AnnotationList, AnnotationReplacers, ReplaceTarget};
pub use error::{Error, ErrorKind};
pub use stream::{StreamView, StringStream};
pub use value::{ArgType, ArgValue, EnumType};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
