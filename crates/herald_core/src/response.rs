//! Post-execution handling: responses, exceptions, and failures.
//!
//! A response handler consumes what the handler returned. The exception
//! chain receives errors raised after a candidate was selected. The
//! failure handler receives the ranked branch failures when no candidate
//! completed at all.

use std::sync::Arc;

use herald_foundation::{AnnotationList, Error};

use crate::actor::Actor;
use crate::context::{CommandOutput, ExecutionContext};
use crate::dispatch::DispatchFailure;

/// Shared reference to a response handler.
pub type ResponseHandlerRef<A> = Arc<dyn ResponseHandler<A>>;

/// Consumes a handler's return value.
pub trait ResponseHandler<A: Actor>: Send + Sync {
    /// Processes the output of a successful execution.
    ///
    /// # Errors
    ///
    /// Errors route into the exception chain; a second failure there is
    /// logged and dropped.
    fn respond(&self, output: CommandOutput, ctx: &ExecutionContext<A>)
        -> herald_foundation::Result<()>;
}

impl<A: Actor, F> ResponseHandler<A> for F
where
    F: Fn(CommandOutput, &ExecutionContext<A>) -> herald_foundation::Result<()> + Send + Sync,
{
    fn respond(
        &self,
        output: CommandOutput,
        ctx: &ExecutionContext<A>,
    ) -> herald_foundation::Result<()> {
        self(output, ctx)
    }
}

/// Produces a response handler from a command's annotations, or passes.
pub trait ResponseHandlerFactory<A: Actor>: Send + Sync {
    /// Returns a handler if this factory applies to the annotations.
    fn create(&self, annotations: &AnnotationList) -> Option<ResponseHandlerRef<A>>;
}

impl<A: Actor, F> ResponseHandlerFactory<A> for F
where
    F: Fn(&AnnotationList) -> Option<ResponseHandlerRef<A>> + Send + Sync,
{
    fn create(&self, annotations: &AnnotationList) -> Option<ResponseHandlerRef<A>> {
        self(annotations)
    }
}

/// The default response handler: text replies go to the actor, values are
/// displayed, `None` is silent.
pub struct DefaultResponseHandler;

impl DefaultResponseHandler {
    /// Returns the default handler behind a shared reference.
    #[must_use]
    pub fn shared<A: Actor>() -> ResponseHandlerRef<A> {
        Arc::new(Self)
    }
}

impl<A: Actor> ResponseHandler<A> for DefaultResponseHandler {
    fn respond(
        &self,
        output: CommandOutput,
        ctx: &ExecutionContext<A>,
    ) -> herald_foundation::Result<()> {
        match output {
            CommandOutput::None => {}
            CommandOutput::Text(text) => ctx.reply(&text),
            CommandOutput::Value(value) => ctx.reply(&value.to_string()),
        }
        Ok(())
    }
}

/// Shared reference to an exception handler.
pub type ExceptionHandlerRef<A> = Arc<dyn ExceptionHandler<A>>;

/// One link of the exception chain.
///
/// Handlers match on the error kind; returning `true` stops the chain.
/// When no link handles the error, the default renders it through
/// `Actor::error`.
pub trait ExceptionHandler<A: Actor>: Send + Sync {
    /// Attempts to handle the error; returns true if consumed.
    fn handle(&self, error: &Error, ctx: &ExecutionContext<A>) -> bool;
}

impl<A: Actor, F> ExceptionHandler<A> for F
where
    F: Fn(&Error, &ExecutionContext<A>) -> bool + Send + Sync,
{
    fn handle(&self, error: &Error, ctx: &ExecutionContext<A>) -> bool {
        self(error, ctx)
    }
}

/// Shared reference to a failure handler.
pub type FailureHandlerRef<A> = Arc<dyn FailureHandler<A>>;

/// Receives the ranked branch failures when no candidate completed.
pub trait FailureHandler<A: Actor>: Send + Sync {
    /// Reports the failures; `failures` is sorted best-first and never
    /// empty.
    fn handle(&self, actor: &A, input: &str, failures: &[DispatchFailure]);
}

impl<A: Actor, F> FailureHandler<A> for F
where
    F: Fn(&A, &str, &[DispatchFailure]) + Send + Sync,
{
    fn handle(&self, actor: &A, input: &str, failures: &[DispatchFailure]) {
        self(actor, input, failures)
    }
}

/// The default failure handler: reports the highest-ranked failure's
/// message through `Actor::error`.
pub struct DefaultFailureHandler;

impl DefaultFailureHandler {
    /// Returns the default handler behind a shared reference.
    #[must_use]
    pub fn shared<A: Actor>() -> FailureHandlerRef<A> {
        Arc::new(Self)
    }
}

impl<A: Actor> FailureHandler<A> for DefaultFailureHandler {
    fn handle(&self, actor: &A, _input: &str, failures: &[DispatchFailure]) {
        if let Some(best) = failures.first() {
            actor.error(&best.error.to_string());
        }
    }
}
