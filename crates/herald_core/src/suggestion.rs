//! Suggestion providers for partial arguments.
//!
//! Providers receive an immutable [`StreamView`] positioned at the partial
//! token, so they can inspect the input without disturbing the engine's
//! walk. An empty return means no completions.

use std::sync::Arc;

use herald_foundation::{AnnotationList, ArgType, StreamView};

use crate::actor::Actor;
use crate::context::ExecutionContext;

/// Shared reference to a suggestion provider.
pub type SuggestionProviderRef<A> = Arc<dyn SuggestionProvider<A>>;

/// Strategy producing completion strings for one parameter.
pub trait SuggestionProvider<A: Actor>: Send + Sync {
    /// Candidate completions for the partial token at the view's cursor.
    ///
    /// The engine filters by the partial prefix and de-duplicates, so
    /// providers may return their full candidate set.
    fn suggestions(&self, view: &StreamView, ctx: &ExecutionContext<A>) -> Vec<String>;
}

impl<A: Actor, F> SuggestionProvider<A> for F
where
    F: Fn(&StreamView, &ExecutionContext<A>) -> Vec<String> + Send + Sync,
{
    fn suggestions(&self, view: &StreamView, ctx: &ExecutionContext<A>) -> Vec<String> {
        self(view, ctx)
    }
}

/// A fixed list of completions.
#[derive(Clone, Debug)]
pub struct StaticSuggestions {
    candidates: Vec<String>,
}

impl StaticSuggestions {
    /// Creates a provider over a fixed candidate list.
    #[must_use]
    pub fn new(candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a shared provider over a fixed candidate list.
    #[must_use]
    pub fn shared<A, I, S>(candidates: I) -> SuggestionProviderRef<A>
    where
        A: Actor,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self::new(candidates))
    }
}

impl<A: Actor> SuggestionProvider<A> for StaticSuggestions {
    fn suggestions(&self, _view: &StreamView, _ctx: &ExecutionContext<A>) -> Vec<String> {
        self.candidates.clone()
    }
}

/// Produces a suggestion provider for a declared parameter, or passes.
///
/// Consulted after an explicit `SuggestWith` annotation and before the
/// parser's own default suggestions.
pub trait SuggestionProviderFactory<A: Actor>: Send + Sync {
    /// Returns a provider if this factory handles `(ty, annotations)`.
    fn create(&self, ty: &ArgType, annotations: &AnnotationList)
        -> Option<SuggestionProviderRef<A>>;
}

impl<A: Actor, F> SuggestionProviderFactory<A> for F
where
    F: Fn(&ArgType, &AnnotationList) -> Option<SuggestionProviderRef<A>> + Send + Sync,
{
    fn create(
        &self,
        ty: &ArgType,
        annotations: &AnnotationList,
    ) -> Option<SuggestionProviderRef<A>> {
        self(ty, annotations)
    }
}
