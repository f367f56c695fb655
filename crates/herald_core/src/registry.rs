//! Ordered factory registries with first/last precedence.
//!
//! Each registry stores factory entries in two priority classes: `add`
//! inserts into the high class, `add_last` into the low class. Resolution
//! walks high-first then low-first, in insertion order within each class,
//! and takes the first non-`None` result; a terminal sentinel supplies the
//! framework defaults. Registries are frozen when the builder builds, so
//! reads are lock-free.

use std::sync::Arc;

use herald_foundation::{AnnotationList, ArgType, Error, Result};

use crate::actor::Actor;
use crate::annotations::SuggestWith;
use crate::declaration::Param;
use crate::parameter::{
    ContextParameterFactory, ContextResolverRef, DefaultParameterFactory, ParameterTypeFactory,
    ParameterTypeRef,
};
use crate::precondition::{
    ConditionRef, PermissionFactory, PermissionRef, RangeValidatorFactory, ValidatorFactory,
    ValidatorRef,
};
use crate::response::{
    DefaultFailureHandler, DefaultResponseHandler, ExceptionHandlerRef, FailureHandlerRef,
    ResponseHandlerFactory, ResponseHandlerRef,
};
use crate::suggestion::{SuggestionProviderFactory, SuggestionProviderRef};

/// An ordered collection of factories with two insertion classes.
pub struct FactoryRegistry<F> {
    high: Vec<F>,
    low: Vec<F>,
}

impl<F> FactoryRegistry<F> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            high: Vec::new(),
            low: Vec::new(),
        }
    }

    /// Inserts a factory into the high class (consulted first).
    pub fn add(&mut self, factory: F) {
        self.high.push(factory);
    }

    /// Inserts a factory into the low class (consulted after every high
    /// entry, before the sentinel).
    pub fn add_last(&mut self, factory: F) {
        self.low.push(factory);
    }

    /// Walks the factories in precedence order, returning the first
    /// non-`None` result.
    pub fn resolve<R>(&self, mut produce: impl FnMut(&F) -> Option<R>) -> Option<R> {
        self.iter().find_map(|f| produce(f))
    }

    /// Collects the results of every factory, in precedence order.
    pub fn resolve_all<R>(&self, mut produce: impl FnMut(&F) -> Option<R>) -> Vec<R> {
        self.iter().filter_map(|f| produce(f)).collect()
    }

    fn iter(&self) -> impl Iterator<Item = &F> {
        self.high.iter().chain(self.low.iter())
    }
}

impl<F> Default for FactoryRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every registry the dispatch core consults, frozen after build.
pub struct Registries<A: Actor> {
    /// Context-parameter factories, consulted before parser resolution.
    pub context_parameters: FactoryRegistry<Arc<dyn ContextParameterFactory<A>>>,
    /// Parameter-type factories; the sentinel resolves built-in types.
    pub parameter_types: FactoryRegistry<Arc<dyn ParameterTypeFactory<A>>>,
    /// Suggestion-provider factories keyed by type and annotations.
    pub suggestion_providers: FactoryRegistry<Arc<dyn SuggestionProviderFactory<A>>>,
    /// Permission factories keyed by annotations.
    pub permission_factories: FactoryRegistry<Arc<dyn PermissionFactory<A>>>,
    /// Validator factories; every match contributes to the chain.
    pub validator_factories: FactoryRegistry<Arc<dyn ValidatorFactory<A>>>,
    /// Response-handler factories keyed by annotations.
    pub response_handlers: FactoryRegistry<Arc<dyn ResponseHandlerFactory<A>>>,
    /// Conditions applied to every command, in registration order.
    pub conditions: Vec<ConditionRef<A>>,
    /// Exception chain for errors after candidate selection.
    pub exception_handlers: Vec<ExceptionHandlerRef<A>>,
    /// Receiver of ranked failures when no candidate completed.
    pub failure_handler: FailureHandlerRef<A>,

    sentinel_parameters: DefaultParameterFactory<A>,
    sentinel_validators: RangeValidatorFactory,
    sentinel_response: ResponseHandlerRef<A>,
}

impl<A: Actor> Registries<A> {
    /// Creates the registry bundle with only the framework defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            context_parameters: FactoryRegistry::new(),
            parameter_types: FactoryRegistry::new(),
            suggestion_providers: FactoryRegistry::new(),
            permission_factories: FactoryRegistry::new(),
            validator_factories: FactoryRegistry::new(),
            response_handlers: FactoryRegistry::new(),
            conditions: Vec::new(),
            exception_handlers: Vec::new(),
            failure_handler: DefaultFailureHandler::shared(),
            sentinel_parameters: DefaultParameterFactory::new(),
            sentinel_validators: RangeValidatorFactory,
            sentinel_response: DefaultResponseHandler::shared(),
        }
    }

    /// Resolves a context-parameter declaration, if any factory claims it.
    #[must_use]
    pub fn resolve_context(&self, param: &Param) -> Option<ContextResolverRef<A>> {
        self.context_parameters
            .resolve(|f| f.create(&param.ty, &param.annotations))
    }

    /// Resolves the parser for a declared parameter.
    ///
    /// # Errors
    ///
    /// Fails with `UnresolvedParameterType` when no factory (including the
    /// sentinel) handles the parameter.
    pub fn resolve_parser(&self, param: &Param) -> Result<ParameterTypeRef<A>> {
        self.parameter_types
            .resolve(|f| f.create(&param.ty, &param.annotations))
            .or_else(|| {
                self.sentinel_parameters
                    .create(&param.ty, &param.annotations)
            })
            .ok_or_else(|| {
                Error::new(herald_foundation::ErrorKind::UnresolvedParameterType {
                    parameter: param.name.clone(),
                    type_name: param.ty.to_string(),
                })
            })
    }

    /// Resolves the suggestion provider for a parameter node.
    ///
    /// Precedence: explicit `SuggestWith` annotation, then the registry,
    /// then the parser's default suggestions, else none.
    #[must_use]
    pub fn resolve_suggestions(
        &self,
        param: &Param,
        parser: &ParameterTypeRef<A>,
    ) -> Option<SuggestionProviderRef<A>> {
        if let Some(explicit) = param.annotations.get::<SuggestWith<A>>() {
            return Some(Arc::clone(&explicit.0));
        }
        self.suggestion_providers
            .resolve(|f| f.create(&param.ty, &param.annotations))
            .or_else(|| parser.default_suggestions())
    }

    /// Resolves the permission for a command from its annotations.
    #[must_use]
    pub fn resolve_permission(&self, annotations: &AnnotationList) -> Option<PermissionRef<A>> {
        self.permission_factories.resolve(|f| f.create(annotations))
    }

    /// Collects the validator chain for a parameter.
    #[must_use]
    pub fn resolve_validators(&self, ty: &ArgType, annotations: &AnnotationList) -> Vec<ValidatorRef<A>> {
        let mut chain = self
            .validator_factories
            .resolve_all(|f| f.create(ty, annotations));
        if let Some(range) =
            ValidatorFactory::<A>::create(&self.sentinel_validators, ty, annotations)
        {
            chain.push(range);
        }
        chain
    }

    /// Resolves the response handler for a command from its annotations.
    #[must_use]
    pub fn resolve_response(&self, annotations: &AnnotationList) -> ResponseHandlerRef<A> {
        self.response_handlers
            .resolve(|f| f.create(annotations))
            .unwrap_or_else(|| Arc::clone(&self.sentinel_response))
    }
}

impl<A: Actor> Default for Registries<A> {
    fn default() -> Self {
        Self::new()
    }
}
