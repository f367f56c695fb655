//! The declaration model and its ingestion.
//!
//! Embedders describe commands through an explicit builder API: a
//! [`CommandDeclaration`] binds path strings to a handler with declared
//! parameters; a [`CommandGroup`] nests declarations under shared path
//! prefixes, multiplying alternatives as a Cartesian product. Ingestion
//! applies annotation replacers, resolves parsers/suggestions/validators
//! through the registries, and yields the flat command list the tree
//! installs.

use std::sync::Arc;
use std::time::Duration;

use herald_foundation::{
    AnnotationList, AnnotationReplacers, ArgType, Error, ReplaceTarget, Result,
};

use crate::actor::Actor;
use crate::annotations::{Cooldown, Description, OrphanPlaceholder};
use crate::context::{CommandOutput, ExecutionContext};
use crate::parameter::{ContextResolverRef, ParameterTypeRef};
use crate::path::{CommandPath, Segment};
use crate::precondition::{CommandCondition, ConditionRef, PermissionRef, ValidatorRef};
use crate::registry::Registries;
use crate::response::ResponseHandlerRef;
use crate::suggestion::SuggestionProviderRef;

/// The erased handler invocation interface.
pub type CommandHandler<A> =
    Arc<dyn Fn(&mut ExecutionContext<A>) -> Result<CommandOutput> + Send + Sync>;

/// One declared parameter: name, type, annotations, default, optionality.
#[derive(Clone, Debug)]
pub struct Param {
    /// The parameter name, matched against `<name>` placeholders.
    pub name: String,
    /// The declared type, keying parser resolution.
    pub ty: ArgType,
    /// Annotations attached to this parameter.
    pub annotations: AnnotationList,
    /// Default-value text, parsed through the parameter's own parser when
    /// input is exhausted.
    pub default_text: Option<String>,
    /// True if the parameter may be omitted without a default.
    pub optional: bool,
}

impl Param {
    /// Declares a parameter of the given name and type.
    pub fn new(name: impl Into<String>, ty: ArgType) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: AnnotationList::new(),
            default_text: None,
            optional: false,
        }
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotated<T: std::any::Any + Send + Sync>(mut self, annotation: T) -> Self {
        self.annotations = self.annotations.with(annotation);
        self
    }

    /// Marks the parameter optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Supplies default-value text used when input is exhausted.
    #[must_use]
    pub fn default_value(mut self, text: impl Into<String>) -> Self {
        self.default_text = Some(text.into());
        self
    }

    /// True if the walk may complete without input for this parameter.
    #[must_use]
    pub fn fillable_without_input(&self) -> bool {
        self.optional || self.default_text.is_some()
    }
}

/// A declaration binding one or more path strings to a handler.
pub struct CommandDeclaration<A: Actor> {
    pub(crate) paths: Vec<String>,
    pub(crate) parameters: Vec<Param>,
    pub(crate) annotations: AnnotationList,
    pub(crate) handler: Option<CommandHandler<A>>,
    pub(crate) permission: Option<PermissionRef<A>>,
    pub(crate) conditions: Vec<ConditionRef<A>>,
}

impl<A: Actor> CommandDeclaration<A> {
    /// Declares a command at the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
            parameters: Vec::new(),
            annotations: AnnotationList::new(),
            handler: None,
            permission: None,
            conditions: Vec::new(),
        }
    }

    /// Declares a command at its enclosing group's own path.
    ///
    /// Only meaningful inside a [`CommandGroup`].
    #[must_use]
    pub fn root() -> Self {
        Self::new("")
    }

    /// Adds an alternative path; alternatives multiply with enclosing
    /// group paths.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Declares a parameter.
    #[must_use]
    pub fn parameter(mut self, param: Param) -> Self {
        self.parameters.push(param);
        self
    }

    /// Attaches a description annotation.
    #[must_use]
    pub fn describe(self, text: impl Into<String>) -> Self {
        self.annotated(Description::new(text))
    }

    /// Attaches a cooldown annotation.
    #[must_use]
    pub fn cooldown(self, duration: Duration) -> Self {
        self.annotated(Cooldown::new(duration))
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotated<T: std::any::Any + Send + Sync>(mut self, annotation: T) -> Self {
        self.annotations = self.annotations.with(annotation);
        self
    }

    /// Requires a permission.
    #[must_use]
    pub fn permission(mut self, permission: PermissionRef<A>) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Adds a condition.
    #[must_use]
    pub fn condition(mut self, condition: impl CommandCondition<A> + 'static) -> Self {
        self.conditions.push(Arc::new(condition));
        self
    }

    /// Binds the handler.
    #[must_use]
    pub fn executes<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut ExecutionContext<A>) -> Result<CommandOutput> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    fn primary_path(&self) -> &str {
        self.paths.first().map_or("", String::as_str)
    }
}

impl<A: Actor> Clone for CommandDeclaration<A> {
    fn clone(&self) -> Self {
        Self {
            paths: self.paths.clone(),
            parameters: self.parameters.clone(),
            annotations: self.annotations.clone(),
            handler: self.handler.clone(),
            permission: self.permission.clone(),
            conditions: self.conditions.clone(),
        }
    }
}

/// A group of declarations sharing path prefixes, permissions,
/// conditions, and annotations.
pub struct CommandGroup<A: Actor> {
    pub(crate) paths: Vec<String>,
    pub(crate) annotations: AnnotationList,
    pub(crate) permission: Option<PermissionRef<A>>,
    pub(crate) conditions: Vec<ConditionRef<A>>,
    pub(crate) commands: Vec<CommandDeclaration<A>>,
    pub(crate) groups: Vec<CommandGroup<A>>,
}

impl<A: Actor> CommandGroup<A> {
    /// Creates a group rooted at the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
            annotations: AnnotationList::new(),
            permission: None,
            conditions: Vec::new(),
            commands: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Creates a group whose root path is supplied at registration time
    /// via `register_orphan`.
    #[must_use]
    pub fn orphan() -> Self {
        let mut group = Self::new("");
        group.paths.clear();
        group.annotations = group.annotations.with(OrphanPlaceholder);
        group
    }

    /// Adds an alternative root path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Attaches an annotation inherited by every member.
    #[must_use]
    pub fn annotated<T: std::any::Any + Send + Sync>(mut self, annotation: T) -> Self {
        self.annotations = self.annotations.with(annotation);
        self
    }

    /// Requires a permission for every member without its own.
    #[must_use]
    pub fn permission(mut self, permission: PermissionRef<A>) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Adds a condition inherited by every member.
    #[must_use]
    pub fn condition(mut self, condition: impl CommandCondition<A> + 'static) -> Self {
        self.conditions.push(Arc::new(condition));
        self
    }

    /// Adds a member declaration; its paths concatenate after the group's.
    #[must_use]
    pub fn command(mut self, declaration: CommandDeclaration<A>) -> Self {
        self.commands.push(declaration);
        self
    }

    /// Nests a subgroup.
    #[must_use]
    pub fn group(mut self, group: CommandGroup<A>) -> Self {
        self.groups.push(group);
        self
    }

    /// Binds a handler at the group's own path.
    #[must_use]
    pub fn executes<F>(self, handler: F) -> Self
    where
        F: Fn(&mut ExecutionContext<A>) -> Result<CommandOutput> + Send + Sync + 'static,
    {
        self.command(CommandDeclaration::root().executes(handler))
    }

    pub(crate) fn with_runtime_paths(mut self, paths: &[&str]) -> Self {
        self.paths = paths.iter().map(ToString::to_string).collect();
        self
    }
}

impl<A: Actor> Clone for CommandGroup<A> {
    fn clone(&self) -> Self {
        Self {
            paths: self.paths.clone(),
            annotations: self.annotations.clone(),
            permission: self.permission.clone(),
            conditions: self.conditions.clone(),
            commands: self.commands.clone(),
            groups: self.groups.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ingestion

/// A parameter with everything the tree needs resolved.
pub(crate) struct IngestedParameter<A: Actor> {
    pub param: Param,
    pub parser: ParameterTypeRef<A>,
    pub suggestions: Option<SuggestionProviderRef<A>>,
    pub validators: Vec<ValidatorRef<A>>,
}

/// One element of a command's node chain.
pub(crate) enum ChainElement<A: Actor> {
    Literal(String),
    Parameter(Arc<IngestedParameter<A>>),
}

/// A fully-resolved command ready for tree installation.
pub(crate) struct IngestedCommand<A: Actor> {
    pub path: CommandPath,
    pub chain: Vec<ChainElement<A>>,
    pub context_params: Vec<(String, ContextResolverRef<A>)>,
    pub handler: CommandHandler<A>,
    pub permission: Option<PermissionRef<A>>,
    pub conditions: Vec<ConditionRef<A>>,
    pub annotations: AnnotationList,
    pub cooldown: Option<Duration>,
    pub description: Option<String>,
    pub response: ResponseHandlerRef<A>,
}

/// Scope a group contributes to its members.
struct InheritedScope<A: Actor> {
    prefixes: Vec<CommandPath>,
    annotations: AnnotationList,
    permission: Option<PermissionRef<A>>,
    conditions: Vec<ConditionRef<A>>,
}

/// Ingests a standalone declaration.
pub(crate) fn ingest_declaration<A: Actor>(
    declaration: &CommandDeclaration<A>,
    registries: &Registries<A>,
    replacers: &AnnotationReplacers,
) -> Result<Vec<IngestedCommand<A>>> {
    let scope = InheritedScope {
        prefixes: vec![CommandPath::default()],
        annotations: AnnotationList::new(),
        permission: None,
        conditions: Vec::new(),
    };
    ingest_in_scope(declaration, &scope, registries, replacers)
}

/// Ingests a group and all nested members.
pub(crate) fn ingest_group<A: Actor>(
    group: &CommandGroup<A>,
    registries: &Registries<A>,
    replacers: &AnnotationReplacers,
) -> Result<Vec<IngestedCommand<A>>> {
    let scope = InheritedScope {
        prefixes: vec![CommandPath::default()],
        annotations: AnnotationList::new(),
        permission: None,
        conditions: Vec::new(),
    };
    ingest_group_in_scope(group, &scope, registries, replacers)
}

fn ingest_group_in_scope<A: Actor>(
    group: &CommandGroup<A>,
    outer: &InheritedScope<A>,
    registries: &Registries<A>,
    replacers: &AnnotationReplacers,
) -> Result<Vec<IngestedCommand<A>>> {
    if group.paths.is_empty() {
        // An orphan group must have its paths supplied via register_orphan.
        let reason = if group.annotations.has::<OrphanPlaceholder>() {
            "orphan command registered without a runtime path"
        } else {
            "group has no path"
        };
        return Err(Error::malformed_path("", reason));
    }

    // Cartesian product: every outer prefix times every group path.
    let mut prefixes = Vec::new();
    for outer_prefix in &outer.prefixes {
        for path in &group.paths {
            prefixes.push(outer_prefix.join(&CommandPath::parse(path)?));
        }
    }

    let mut annotations = outer.annotations.clone();
    for entry in group.annotations.iter() {
        annotations.insert(entry.clone());
    }

    let mut conditions = outer.conditions.clone();
    conditions.extend(group.conditions.iter().cloned());

    let scope = InheritedScope {
        prefixes,
        annotations,
        permission: group.permission.clone().or_else(|| outer.permission.clone()),
        conditions,
    };

    let mut ingested = Vec::new();
    for declaration in &group.commands {
        ingested.extend(ingest_in_scope(declaration, &scope, registries, replacers)?);
    }
    for nested in &group.groups {
        ingested.extend(ingest_group_in_scope(nested, &scope, registries, replacers)?);
    }
    Ok(ingested)
}

fn ingest_in_scope<A: Actor>(
    declaration: &CommandDeclaration<A>,
    scope: &InheritedScope<A>,
    registries: &Registries<A>,
    replacers: &AnnotationReplacers,
) -> Result<Vec<IngestedCommand<A>>> {
    let primary = declaration.primary_path();
    let Some(handler) = declaration.handler.clone() else {
        return Err(Error::malformed_path(primary, "declaration has no handler"));
    };
    if declaration.annotations.has::<OrphanPlaceholder>() {
        return Err(Error::malformed_path(
            primary,
            "orphan command registered without a runtime path",
        ));
    }

    // Command-level annotations: group's, overridden by the declaration's,
    // then rewritten by the replacers.
    let mut annotations = scope.annotations.clone();
    for entry in declaration.annotations.iter() {
        annotations.insert(entry.clone());
    }
    let target = ReplaceTarget::Command { path: primary };
    let annotations = replacers.apply(&target, &annotations)?;

    // Per-parameter resolution happens once; paths share the result.
    // Context-parameter factories are consulted first: a claimed
    // parameter never occupies an input position.
    let mut resolved = Vec::with_capacity(declaration.parameters.len());
    let mut context_params = Vec::new();
    for param in &declaration.parameters {
        if let Some(resolver) = registries.resolve_context(param) {
            context_params.push((param.name.clone(), resolver));
        } else {
            resolved.push(resolve_parameter(param, registries, replacers)?);
        }
    }

    let cooldown = annotations.get::<Cooldown>().map(|c| c.0);
    let description = annotations.get::<Description>().map(|d| d.0.clone());
    let response = registries.resolve_response(&annotations);
    let permission = declaration
        .permission
        .clone()
        .or_else(|| scope.permission.clone())
        .or_else(|| registries.resolve_permission(&annotations));

    let mut conditions = scope.conditions.clone();
    conditions.extend(declaration.conditions.iter().cloned());

    let mut ingested = Vec::new();
    for prefix in &scope.prefixes {
        for path in &declaration.paths {
            let full = prefix.join(&CommandPath::parse(path)?);
            if full.is_empty() {
                return Err(Error::malformed_path(path.clone(), "empty command path"));
            }
            let chain = build_chain(&full, &resolved)?;
            ingested.push(IngestedCommand {
                path: full,
                chain,
                context_params: context_params.clone(),
                handler: Arc::clone(&handler),
                permission: permission.clone(),
                conditions: conditions.clone(),
                annotations: annotations.clone(),
                cooldown,
                description: description.clone(),
                response: Arc::clone(&response),
            });
        }
    }
    Ok(ingested)
}

fn resolve_parameter<A: Actor>(
    param: &Param,
    registries: &Registries<A>,
    replacers: &AnnotationReplacers,
) -> Result<Arc<IngestedParameter<A>>> {
    let target = ReplaceTarget::Parameter { name: &param.name };
    let annotations = replacers.apply(&target, &param.annotations)?;
    let param = Param {
        annotations,
        ..param.clone()
    };

    let parser = registries.resolve_parser(&param)?;
    let suggestions = registries.resolve_suggestions(&param, &parser);
    let validators = registries.resolve_validators(&param.ty, &param.annotations);
    Ok(Arc::new(IngestedParameter {
        param,
        parser,
        suggestions,
        validators,
    }))
}

/// Builds the node chain: path segments in order, then declared
/// parameters not referenced by a placeholder, in declaration order.
fn build_chain<A: Actor>(
    path: &CommandPath,
    parameters: &[Arc<IngestedParameter<A>>],
) -> Result<Vec<ChainElement<A>>> {
    let mut chain = Vec::with_capacity(path.len());
    let mut used = vec![false; parameters.len()];

    for segment in path.segments() {
        match segment {
            Segment::Literal(text) => chain.push(ChainElement::Literal(text.clone())),
            Segment::Placeholder(name) => {
                let index = parameters
                    .iter()
                    .position(|p| p.param.name == *name)
                    .ok_or_else(|| {
                        Error::unresolved_placeholder(path.to_string(), name.clone())
                    })?;
                used[index] = true;
                chain.push(ChainElement::Parameter(Arc::clone(&parameters[index])));
            }
        }
    }

    for (index, parameter) in parameters.iter().enumerate() {
        if !used[index] {
            chain.push(ChainElement::Parameter(Arc::clone(parameter)));
        }
    }

    // A greedy string swallows the rest of the input, so nothing may
    // follow it.
    let greedy_at = chain.iter().position(|e| {
        matches!(e, ChainElement::Parameter(p) if p.param.ty == ArgType::GreedyString)
    });
    if let Some(index) = greedy_at {
        if index + 1 != chain.len() {
            return Err(Error::malformed_path(
                path.to_string(),
                "greedy string parameter must be last",
            ));
        }
    }

    Ok(chain)
}
