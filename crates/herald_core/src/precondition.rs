//! Preconditions around execution: permissions, conditions, validators.
//!
//! All three run after a candidate is selected and before its handler is
//! invoked, in the order: conditions, permission, per-argument validators.

use std::sync::Arc;

use herald_foundation::{AnnotationList, ArgType, ArgValue, Error, Result};

use crate::actor::Actor;
use crate::annotations::Range;
use crate::context::ExecutionContext;

/// Shared reference to a command permission.
pub type PermissionRef<A> = Arc<dyn CommandPermission<A>>;

/// Gate deciding whether an actor may run a command at all.
pub trait CommandPermission<A: Actor>: Send + Sync {
    /// Returns true if the actor holds this permission.
    fn allows(&self, actor: &A) -> bool;

    /// Human-readable description, reported in `NoPermission` errors.
    fn describe(&self) -> String;
}

/// Permission backed by a predicate and a description.
pub struct PredicatePermission<A> {
    description: String,
    predicate: Box<dyn Fn(&A) -> bool + Send + Sync>,
}

impl<A: Actor> PredicatePermission<A> {
    /// Wraps a predicate as a permission.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        predicate: impl Fn(&A) -> bool + Send + Sync + 'static,
    ) -> PermissionRef<A> {
        Arc::new(Self {
            description: description.into(),
            predicate: Box::new(predicate),
        })
    }
}

impl<A: Actor> CommandPermission<A> for PredicatePermission<A> {
    fn allows(&self, actor: &A) -> bool {
        (self.predicate)(actor)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Produces a permission from a command's annotations, or passes.
pub trait PermissionFactory<A: Actor>: Send + Sync {
    /// Returns a permission if this factory handles the annotations.
    fn create(&self, annotations: &AnnotationList) -> Option<PermissionRef<A>>;
}

impl<A: Actor, F> PermissionFactory<A> for F
where
    F: Fn(&AnnotationList) -> Option<PermissionRef<A>> + Send + Sync,
{
    fn create(&self, annotations: &AnnotationList) -> Option<PermissionRef<A>> {
        self(annotations)
    }
}

/// Shared reference to a command condition.
pub type ConditionRef<A> = Arc<dyn CommandCondition<A>>;

/// Arbitrary precondition evaluated before permission and validators.
///
/// Conditions abort the dispatch by returning an error, typically a
/// `CommandError` with a message for the actor.
pub trait CommandCondition<A: Actor>: Send + Sync {
    /// Checks the condition against the pending execution.
    ///
    /// # Errors
    ///
    /// Returns the error that aborts the dispatch.
    fn test(&self, ctx: &ExecutionContext<A>) -> Result<()>;
}

impl<A: Actor, F> CommandCondition<A> for F
where
    F: Fn(&ExecutionContext<A>) -> Result<()> + Send + Sync,
{
    fn test(&self, ctx: &ExecutionContext<A>) -> Result<()> {
        self(ctx)
    }
}

/// Shared reference to a parameter validator.
pub type ValidatorRef<A> = Arc<dyn ParameterValidator<A>>;

/// Post-parse check on a single argument value.
pub trait ParameterValidator<A: Actor>: Send + Sync {
    /// Validates a parsed argument.
    ///
    /// # Errors
    ///
    /// Returns the error that aborts the dispatch, typically
    /// `InvalidValue` with the parameter name.
    fn validate(&self, name: &str, value: &ArgValue, ctx: &ExecutionContext<A>) -> Result<()>;
}

impl<A: Actor, F> ParameterValidator<A> for F
where
    F: Fn(&str, &ArgValue, &ExecutionContext<A>) -> Result<()> + Send + Sync,
{
    fn validate(&self, name: &str, value: &ArgValue, ctx: &ExecutionContext<A>) -> Result<()> {
        self(name, value, ctx)
    }
}

/// Produces validators for a declared parameter.
///
/// Unlike parser resolution, every matching factory contributes: the
/// validators chain in registration order.
pub trait ValidatorFactory<A: Actor>: Send + Sync {
    /// Returns a validator if this factory applies to `(ty, annotations)`.
    fn create(&self, ty: &ArgType, annotations: &AnnotationList) -> Option<ValidatorRef<A>>;
}

impl<A: Actor, F> ValidatorFactory<A> for F
where
    F: Fn(&ArgType, &AnnotationList) -> Option<ValidatorRef<A>> + Send + Sync,
{
    fn create(&self, ty: &ArgType, annotations: &AnnotationList) -> Option<ValidatorRef<A>> {
        self(ty, annotations)
    }
}

/// The built-in validator factory: enforces [`Range`] annotations on
/// numeric parameters.
#[derive(Debug, Default)]
pub struct RangeValidatorFactory;

impl<A: Actor> ValidatorFactory<A> for RangeValidatorFactory {
    fn create(&self, ty: &ArgType, annotations: &AnnotationList) -> Option<ValidatorRef<A>> {
        if !matches!(ty, ArgType::Int | ArgType::Float) {
            return None;
        }
        let range = *annotations.get::<Range>()?;
        Some(Arc::new(RangeValidator { range }))
    }
}

struct RangeValidator {
    range: Range,
}

impl<A: Actor> ParameterValidator<A> for RangeValidator {
    fn validate(&self, name: &str, value: &ArgValue, _ctx: &ExecutionContext<A>) -> Result<()> {
        let Some(number) = value.as_number() else {
            return Ok(());
        };
        if self.range.contains(number) {
            Ok(())
        } else {
            Err(Error::invalid_value(
                name,
                value.to_string(),
                range_description(&self.range),
            ))
        }
    }
}

fn range_description(range: &Range) -> String {
    match (range.min, range.max) {
        (Some(min), Some(max)) => format!("must be between {min} and {max}"),
        (Some(min), None) => format!("must be at least {min}"),
        (None, Some(max)) => format!("must be at most {max}"),
        (None, None) => "unconstrained".to_string(),
    }
}
