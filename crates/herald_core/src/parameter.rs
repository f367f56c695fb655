//! Parameter parsers and their factories.
//!
//! A [`ParameterType`] turns the next portion of the input stream into an
//! [`ArgValue`]. Factories resolve a parser from a parameter's declared
//! type and annotations; the terminal sentinel factory supplies the
//! built-in parsers for bool/int/float/string/greedy/enum parameters.

use std::fmt;
use std::sync::Arc;

use herald_foundation::{AnnotationList, ArgType, ArgValue, EnumType, Error, Result, StringStream};

use crate::actor::Actor;
use crate::context::ExecutionContext;
use crate::suggestion::{StaticSuggestions, SuggestionProviderRef};

/// Preference class of a parser when ranking overloads on the same input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParsePriority {
    /// Tried last; loses ties (greedy strings).
    Lowest,
    /// The normal class.
    Default,
    /// Wins ties (closed sets like enums).
    Highest,
}

impl ParsePriority {
    /// Numeric score summed across a candidate's parameters when ranking.
    ///
    /// Centered on zero so that overloads of different arity whose
    /// parameters are all in the default class compare equal.
    #[must_use]
    pub const fn score(self) -> i32 {
        match self {
            Self::Lowest => -1,
            Self::Default => 0,
            Self::Highest => 1,
        }
    }
}

/// Shared reference to a parameter parser.
pub type ParameterTypeRef<A> = Arc<dyn ParameterType<A>>;

/// Strategy for parsing one argument from the token stream.
pub trait ParameterType<A: Actor>: Send + Sync {
    /// Parses the next argument at the stream cursor.
    ///
    /// On success the cursor sits past the consumed text. On failure the
    /// dispatcher discards the forked stream, so parsers need not rewind.
    ///
    /// # Errors
    ///
    /// Returns the typed parse failure for the rejected input.
    fn parse(&self, stream: &mut StringStream, ctx: &ExecutionContext<A>) -> Result<ArgValue>;

    /// This parser's priority class for overload ranking.
    fn priority(&self) -> ParsePriority {
        ParsePriority::Default
    }

    /// Suggestions used when nothing more specific is registered.
    fn default_suggestions(&self) -> Option<SuggestionProviderRef<A>> {
        None
    }
}

/// Shared reference to a context-parameter resolver.
pub type ContextResolverRef<A> = Arc<dyn ContextResolver<A>>;

/// Produces a value derived from the execution context rather than from
/// input. Context parameters do not occupy input positions; they are
/// resolved when the handler is invoked.
pub trait ContextResolver<A: Actor>: Send + Sync {
    /// Resolves the value for the pending execution.
    ///
    /// # Errors
    ///
    /// An error aborts the dispatch before the handler runs.
    fn resolve(&self, ctx: &ExecutionContext<A>) -> Result<ArgValue>;
}

impl<A: Actor, F> ContextResolver<A> for F
where
    F: Fn(&ExecutionContext<A>) -> Result<ArgValue> + Send + Sync,
{
    fn resolve(&self, ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        self(ctx)
    }
}

/// Declares a parameter type as context-derived, or passes.
///
/// Consulted before parser resolution: a parameter this registry claims
/// never reads input.
pub trait ContextParameterFactory<A: Actor>: Send + Sync {
    /// Returns a resolver if this factory handles `(ty, annotations)`.
    fn create(&self, ty: &ArgType, annotations: &AnnotationList) -> Option<ContextResolverRef<A>>;
}

impl<A: Actor, F> ContextParameterFactory<A> for F
where
    F: Fn(&ArgType, &AnnotationList) -> Option<ContextResolverRef<A>> + Send + Sync,
{
    fn create(&self, ty: &ArgType, annotations: &AnnotationList) -> Option<ContextResolverRef<A>> {
        self(ty, annotations)
    }
}

/// Produces a parser for a declared parameter, or passes.
pub trait ParameterTypeFactory<A: Actor>: Send + Sync {
    /// Returns a parser if this factory handles `(ty, annotations)`.
    fn create(&self, ty: &ArgType, annotations: &AnnotationList) -> Option<ParameterTypeRef<A>>;
}

impl<A: Actor, F> ParameterTypeFactory<A> for F
where
    F: Fn(&ArgType, &AnnotationList) -> Option<ParameterTypeRef<A>> + Send + Sync,
{
    fn create(&self, ty: &ArgType, annotations: &AnnotationList) -> Option<ParameterTypeRef<A>> {
        self(ty, annotations)
    }
}

/// Wraps a closure as a parameter parser with the given priority.
pub fn from_fn<A, F>(priority: ParsePriority, parse: F) -> ParameterTypeRef<A>
where
    A: Actor,
    F: Fn(&mut StringStream, &ExecutionContext<A>) -> Result<ArgValue> + Send + Sync + 'static,
{
    Arc::new(FnParameterType { parse, priority })
}

struct FnParameterType<F> {
    parse: F,
    priority: ParsePriority,
}

impl<A, F> ParameterType<A> for FnParameterType<F>
where
    A: Actor,
    F: Fn(&mut StringStream, &ExecutionContext<A>) -> Result<ArgValue> + Send + Sync,
{
    fn parse(&self, stream: &mut StringStream, ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        (self.parse)(stream, ctx)
    }

    fn priority(&self) -> ParsePriority {
        self.priority
    }
}

// ---------------------------------------------------------------------------
// Built-in parsers

struct BoolParameter;

impl<A: Actor> ParameterType<A> for BoolParameter {
    fn parse(&self, stream: &mut StringStream, _ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        stream.read_boolean().map(ArgValue::Bool)
    }

    fn default_suggestions(&self) -> Option<SuggestionProviderRef<A>> {
        Some(StaticSuggestions::shared(["true", "false"]))
    }
}

struct IntParameter;

impl<A: Actor> ParameterType<A> for IntParameter {
    fn parse(&self, stream: &mut StringStream, _ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        stream.read_int().map(ArgValue::Int)
    }
}

struct FloatParameter;

impl<A: Actor> ParameterType<A> for FloatParameter {
    fn parse(&self, stream: &mut StringStream, _ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        stream.read_float().map(ArgValue::Float)
    }
}

struct StringParameter;

impl<A: Actor> ParameterType<A> for StringParameter {
    fn parse(&self, stream: &mut StringStream, _ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        stream.read_string().map(ArgValue::string)
    }
}

struct GreedyStringParameter;

impl<A: Actor> ParameterType<A> for GreedyStringParameter {
    fn parse(&self, stream: &mut StringStream, _ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        let rest = stream.read_remaining();
        if rest.is_empty() {
            return Err(Error::expected_input().with_position(stream.position()));
        }
        Ok(ArgValue::string(rest))
    }

    fn priority(&self) -> ParsePriority {
        ParsePriority::Lowest
    }
}

struct EnumParameter {
    variants: Arc<EnumType>,
}

impl<A: Actor> ParameterType<A> for EnumParameter {
    fn parse(&self, stream: &mut StringStream, _ctx: &ExecutionContext<A>) -> Result<ArgValue> {
        let start = stream.position();
        let token = stream.read_unquoted_string()?;
        match self.variants.matching_variant(&token) {
            Some(canonical) => Ok(ArgValue::string(canonical)),
            None => Err(Error::invalid_enum(token, self.variants.variants.clone())
                .with_position(start)),
        }
    }

    fn priority(&self) -> ParsePriority {
        ParsePriority::Highest
    }

    fn default_suggestions(&self) -> Option<SuggestionProviderRef<A>> {
        Some(StaticSuggestions::shared(self.variants.variants.clone()))
    }
}

/// The terminal sentinel factory: resolves the built-in parameter types
/// and passes on embedder-defined ones.
///
/// Built-in parsers are shared singletons, so parameter nodes of the same
/// built-in type merge in the tree.
pub struct DefaultParameterFactory<A: Actor> {
    bool_parser: ParameterTypeRef<A>,
    int_parser: ParameterTypeRef<A>,
    float_parser: ParameterTypeRef<A>,
    string_parser: ParameterTypeRef<A>,
    greedy_parser: ParameterTypeRef<A>,
}

impl<A: Actor> DefaultParameterFactory<A> {
    /// Creates the sentinel factory with its parser singletons.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bool_parser: Arc::new(BoolParameter),
            int_parser: Arc::new(IntParameter),
            float_parser: Arc::new(FloatParameter),
            string_parser: Arc::new(StringParameter),
            greedy_parser: Arc::new(GreedyStringParameter),
        }
    }
}

impl<A: Actor> Default for DefaultParameterFactory<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Actor> ParameterTypeFactory<A> for DefaultParameterFactory<A> {
    fn create(&self, ty: &ArgType, _annotations: &AnnotationList) -> Option<ParameterTypeRef<A>> {
        match ty {
            ArgType::Bool => Some(Arc::clone(&self.bool_parser)),
            ArgType::Int => Some(Arc::clone(&self.int_parser)),
            ArgType::Float => Some(Arc::clone(&self.float_parser)),
            ArgType::String => Some(Arc::clone(&self.string_parser)),
            ArgType::GreedyString => Some(Arc::clone(&self.greedy_parser)),
            ArgType::Enum(variants) => Some(Arc::new(EnumParameter {
                variants: Arc::clone(variants),
            })),
            ArgType::Custom(_) => None,
        }
    }
}

impl<A: Actor> fmt::Debug for DefaultParameterFactory<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultParameterFactory")
    }
}
