//! Built-in annotation kinds.
//!
//! These are ordinary values stored in an
//! [`AnnotationList`](herald_foundation::AnnotationList); embedders define
//! further kinds the same way and resolve them through factories or
//! replacers.

use std::time::Duration;

use crate::suggestion::SuggestionProviderRef;
use crate::Actor;

/// Human-readable description of a command, surfaced by help introspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description(pub String);

impl Description {
    /// Creates a description annotation.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

/// Puts the command on a per-actor cooldown after each successful
/// execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown(pub Duration);

impl Cooldown {
    /// Creates a cooldown annotation from a duration.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// Creates a cooldown annotation from whole seconds.
    #[must_use]
    pub const fn seconds(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }
}

/// Numeric range constraint, enforced by the built-in validator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    /// Inclusive lower bound, if any.
    pub min: Option<f64>,
    /// Inclusive upper bound, if any.
    pub max: Option<f64>,
}

impl Range {
    /// Constrains a parameter to `min..=max`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Constrains a parameter to at least `min`.
    #[must_use]
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Constrains a parameter to at most `max`.
    #[must_use]
    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Returns true if the value satisfies both bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Overrides the suggestion provider for one parameter.
///
/// Wins over the suggestion registry and over the parser's default
/// suggestions.
#[derive(Clone)]
pub struct SuggestWith<A: Actor>(pub SuggestionProviderRef<A>);

impl<A: Actor> SuggestWith<A> {
    /// Wraps a provider as a parameter annotation.
    #[must_use]
    pub fn new(provider: SuggestionProviderRef<A>) -> Self {
        Self(provider)
    }
}

/// Marks a declaration whose path is supplied at registration time.
///
/// Attached internally by [`CommandGroup::orphan`]; substituted with the
/// runtime-provided paths by `register_orphan`. Registering a declaration
/// that still carries this placeholder is a build-time error.
///
/// [`CommandGroup::orphan`]: crate::declaration::CommandGroup::orphan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrphanPlaceholder;
