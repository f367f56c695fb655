//! The built dispatcher instance and its builder.
//!
//! [`HeraldBuilder`] accumulates registries, hooks, and replacers, then
//! freezes them into a [`Herald`]. After the freeze only the command tree
//! (register/unregister) and the cooldown store mutate: dispatches take
//! shared access to the tree, registration takes exclusive access.

use std::any::Any;
use std::sync::Arc;

use herald_foundation::{AnnotationEntry, AnnotationReplacers, ReplaceTarget, Result};
use parking_lot::RwLock;
use tracing::debug;

use crate::actor::Actor;
use crate::context::ExecutionContext;
use crate::cooldown::{Clock, CooldownStore, SystemClock};
use crate::declaration::{
    ingest_declaration, ingest_group, CommandDeclaration, CommandGroup, IngestedCommand,
};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::help::{self, HelpEntry};
use crate::hooks::{CancelHandle, Hooks};
use crate::parameter::{ContextParameterFactory, ParameterTypeFactory};
use crate::path::CommandPath;
use crate::precondition::{CommandCondition, PermissionFactory, ValidatorFactory};
use crate::registry::Registries;
use crate::response::{ExceptionHandler, FailureHandler, ResponseHandlerFactory};
use crate::suggest;
use crate::suggestion::SuggestionProviderFactory;
use crate::tree::{CommandTree, ExecutableCommand, ExecutableId};

/// Dispatcher tuning knobs.
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Stop exploring branches after this many failed attempts.
    /// `None` leaves exploration bounded only by tree fanout.
    pub max_failed_attempts: Option<usize>,
    /// Depth limit for hook- or handler-triggered re-entrant dispatch.
    pub max_dispatch_depth: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: None,
            max_dispatch_depth: 8,
        }
    }
}

impl DispatchConfig {
    /// Bounds the number of failed branch attempts per dispatch.
    #[must_use]
    pub fn with_max_failed_attempts(mut self, limit: usize) -> Self {
        self.max_failed_attempts = Some(limit);
        self
    }

    /// Sets the re-entrant dispatch depth limit.
    #[must_use]
    pub fn with_max_dispatch_depth(mut self, limit: usize) -> Self {
        self.max_dispatch_depth = limit;
        self
    }
}

/// Accumulates registries, hooks, and replacers before the freeze.
pub struct HeraldBuilder<A: Actor> {
    registries: Registries<A>,
    hooks: Hooks<A>,
    replacers: AnnotationReplacers,
    config: DispatchConfig,
    clock: Arc<dyn Clock>,
}

impl<A: Actor> HeraldBuilder<A> {
    /// Creates a builder with the framework defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registries: Registries::new(),
            hooks: Hooks::new(),
            replacers: AnnotationReplacers::new(),
            config: DispatchConfig::default(),
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Registers a parameter-type factory in the high precedence class.
    #[must_use]
    pub fn parameter_type(mut self, factory: impl ParameterTypeFactory<A> + 'static) -> Self {
        self.registries.parameter_types.add(Arc::new(factory));
        self
    }

    /// Registers a parameter-type factory consulted after all others.
    #[must_use]
    pub fn parameter_type_last(mut self, factory: impl ParameterTypeFactory<A> + 'static) -> Self {
        self.registries.parameter_types.add_last(Arc::new(factory));
        self
    }

    /// Registers a context-parameter factory.
    #[must_use]
    pub fn context_parameter(mut self, factory: impl ContextParameterFactory<A> + 'static) -> Self {
        self.registries.context_parameters.add(Arc::new(factory));
        self
    }

    /// Registers a context-parameter factory consulted after all others.
    #[must_use]
    pub fn context_parameter_last(
        mut self,
        factory: impl ContextParameterFactory<A> + 'static,
    ) -> Self {
        self.registries.context_parameters.add_last(Arc::new(factory));
        self
    }

    /// Registers a suggestion-provider factory.
    #[must_use]
    pub fn suggestion_provider(
        mut self,
        factory: impl SuggestionProviderFactory<A> + 'static,
    ) -> Self {
        self.registries.suggestion_providers.add(Arc::new(factory));
        self
    }

    /// Registers a suggestion-provider factory consulted after all others.
    #[must_use]
    pub fn suggestion_provider_last(
        mut self,
        factory: impl SuggestionProviderFactory<A> + 'static,
    ) -> Self {
        self.registries
            .suggestion_providers
            .add_last(Arc::new(factory));
        self
    }

    /// Registers a permission factory.
    #[must_use]
    pub fn permission_factory(mut self, factory: impl PermissionFactory<A> + 'static) -> Self {
        self.registries.permission_factories.add(Arc::new(factory));
        self
    }

    /// Registers a validator factory; all matching factories contribute.
    #[must_use]
    pub fn validator_factory(mut self, factory: impl ValidatorFactory<A> + 'static) -> Self {
        self.registries.validator_factories.add(Arc::new(factory));
        self
    }

    /// Registers a response-handler factory.
    #[must_use]
    pub fn response_handler(mut self, factory: impl ResponseHandlerFactory<A> + 'static) -> Self {
        self.registries.response_handlers.add(Arc::new(factory));
        self
    }

    /// Adds a condition evaluated for every command.
    #[must_use]
    pub fn condition(mut self, condition: impl CommandCondition<A> + 'static) -> Self {
        self.registries.conditions.push(Arc::new(condition));
        self
    }

    /// Appends a link to the exception chain.
    #[must_use]
    pub fn exception_handler(mut self, handler: impl ExceptionHandler<A> + 'static) -> Self {
        self.registries.exception_handlers.push(Arc::new(handler));
        self
    }

    /// Replaces the failure handler.
    #[must_use]
    pub fn failure_handler(mut self, handler: impl FailureHandler<A> + 'static) -> Self {
        self.registries.failure_handler = Arc::new(handler);
        self
    }

    /// Registers an annotation replacer for kind `T`.
    #[must_use]
    pub fn replacer<T, F>(mut self, replacer: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&ReplaceTarget<'_>, &T) -> Vec<AnnotationEntry> + Send + Sync + 'static,
    {
        self.replacers.register::<T, F>(replacer);
        self
    }

    /// Adds a pre-dispatch hook.
    #[must_use]
    pub fn on_dispatch(
        mut self,
        hook: impl Fn(&A, &str, &CancelHandle) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.add_dispatch(Arc::new(hook));
        self
    }

    /// Adds an on-registered hook.
    #[must_use]
    pub fn on_registered(
        mut self,
        hook: impl Fn(&ExecutableCommand<A>, &CancelHandle) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.add_registered(Arc::new(hook));
        self
    }

    /// Adds an on-unregistered hook.
    #[must_use]
    pub fn on_unregistered(
        mut self,
        hook: impl Fn(&ExecutableCommand<A>, &CancelHandle) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.add_unregistered(Arc::new(hook));
        self
    }

    /// Adds a pre-execution hook.
    #[must_use]
    pub fn on_executed(
        mut self,
        hook: impl Fn(&ExecutionContext<A>, &ExecutableCommand<A>, &CancelHandle)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.hooks.add_executed(Arc::new(hook));
        self
    }

    /// Overrides the dispatcher configuration.
    #[must_use]
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the cooldown clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Freezes the registries and produces the dispatcher instance.
    #[must_use]
    pub fn build(self) -> Herald<A> {
        Herald {
            inner: Arc::new(HeraldInner {
                tree: RwLock::new(CommandTree::new()),
                registries: self.registries,
                hooks: self.hooks,
                replacers: self.replacers,
                config: self.config,
                cooldowns: Arc::new(CooldownStore::new(self.clock)),
            }),
        }
    }
}

impl<A: Actor> Default for HeraldBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands installed by one `register` call; pass back to `unregister`.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    ids: Vec<ExecutableId>,
}

impl Registration {
    /// The installed commands' ids, in registration order.
    #[must_use]
    pub fn commands(&self) -> &[ExecutableId] {
        &self.ids
    }

    /// Number of installed commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the registration installed nothing (all hooks cancelled).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

struct HeraldInner<A: Actor> {
    tree: RwLock<CommandTree<A>>,
    registries: Registries<A>,
    hooks: Hooks<A>,
    replacers: AnnotationReplacers,
    config: DispatchConfig,
    cooldowns: Arc<CooldownStore>,
}

/// The frozen dispatcher instance.
///
/// Cheap to clone; all clones share the same tree and cooldown store.
pub struct Herald<A: Actor> {
    inner: Arc<HeraldInner<A>>,
}

impl<A: Actor> Clone for Herald<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Actor> Herald<A> {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> HeraldBuilder<A> {
        HeraldBuilder::new()
    }

    /// Registers a single declaration.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateCommand`, `MalformedPath`,
    /// `UnresolvedPlaceholder`, or `UnresolvedParameterType`; nothing is
    /// installed on failure.
    pub fn register(&self, declaration: CommandDeclaration<A>) -> Result<Registration> {
        let commands =
            ingest_declaration(&declaration, &self.inner.registries, &self.inner.replacers)?;
        self.install(commands)
    }

    /// Registers a group and all nested members.
    ///
    /// # Errors
    ///
    /// As [`register`](Herald::register).
    pub fn register_group(&self, group: CommandGroup<A>) -> Result<Registration> {
        let commands = ingest_group(&group, &self.inner.registries, &self.inner.replacers)?;
        self.install(commands)
    }

    /// Registers an orphan group under runtime-supplied paths.
    ///
    /// # Errors
    ///
    /// As [`register`](Herald::register); additionally fails when `paths`
    /// is empty.
    pub fn register_orphan(&self, paths: &[&str], group: CommandGroup<A>) -> Result<Registration> {
        let bound = group.with_runtime_paths(paths);
        self.register_group(bound)
    }

    /// Removes every command installed by a registration.
    ///
    /// Returns how many commands were removed; an on-unregistered hook
    /// may cancel individual removals.
    pub fn unregister(&self, registration: &Registration) -> usize {
        let mut tree = self.inner.tree.write();
        let mut removed = 0;
        for &id in &registration.ids {
            removed += usize::from(self.remove_locked(&mut tree, id));
        }
        removed
    }

    /// Removes every command whose path starts with the given prefix.
    ///
    /// # Errors
    ///
    /// Fails with `MalformedPath` if the prefix does not parse.
    pub fn unregister_path(&self, path: &str) -> Result<usize> {
        let prefix = CommandPath::parse(path)?;
        let mut tree = self.inner.tree.write();
        let ids = tree.matching_prefix(&prefix);
        let mut removed = 0;
        for id in ids {
            removed += usize::from(self.remove_locked(&mut tree, id));
        }
        Ok(removed)
    }

    /// Dispatches a raw input line from an actor.
    pub fn dispatch(&self, actor: impl Into<Arc<A>>, input: &str) -> DispatchOutcome {
        let tree = self.inner.tree.read_recursive();
        Dispatcher {
            tree: &tree,
            registries: &self.inner.registries,
            hooks: &self.inner.hooks,
            cooldowns: &self.inner.cooldowns,
            config: &self.inner.config,
        }
        .dispatch(actor.into(), input)
    }

    /// Completions for `input` with the cursor at byte `cursor`.
    pub fn suggestions(&self, actor: impl Into<Arc<A>>, input: &str, cursor: usize) -> Vec<String> {
        let tree = self.inner.tree.read_recursive();
        suggest::suggest(&tree, actor.into(), input, cursor)
    }

    /// Commands whose path strictly extends the given one.
    ///
    /// # Errors
    ///
    /// Fails with `MalformedPath` if the path does not parse.
    pub fn children(&self, path: &str) -> Result<Vec<HelpEntry>> {
        let path = CommandPath::parse(path)?;
        Ok(help::children_of(&self.inner.tree.read_recursive(), &path))
    }

    /// Commands sharing the given path's parent, differing in the last
    /// segment.
    ///
    /// # Errors
    ///
    /// Fails with `MalformedPath` if the path does not parse.
    pub fn siblings(&self, path: &str) -> Result<Vec<HelpEntry>> {
        let path = CommandPath::parse(path)?;
        Ok(help::siblings_of(&self.inner.tree.read_recursive(), &path))
    }

    /// Union of children and siblings.
    ///
    /// # Errors
    ///
    /// Fails with `MalformedPath` if the path does not parse.
    pub fn related(&self, path: &str) -> Result<Vec<HelpEntry>> {
        let path = CommandPath::parse(path)?;
        Ok(help::related_to(&self.inner.tree.read_recursive(), &path))
    }

    /// Every registered command, in registration order.
    #[must_use]
    pub fn commands(&self) -> Vec<HelpEntry> {
        let tree = self.inner.tree.read_recursive();
        tree.executables()
            .map(|exec| HelpEntry {
                path: exec.path().to_string(),
                usage: exec.usage(),
                description: exec.description().map(ToString::to_string),
            })
            .collect()
    }

    /// The shared cooldown store, for embedders that persist cooldowns.
    #[must_use]
    pub fn cooldowns(&self) -> Arc<CooldownStore> {
        Arc::clone(&self.inner.cooldowns)
    }

    fn install(&self, commands: Vec<IngestedCommand<A>>) -> Result<Registration> {
        let mut tree = self.inner.tree.write();
        let mut ids = Vec::with_capacity(commands.len());

        for command in commands {
            match tree.insert(command) {
                Ok(id) => ids.push(id),
                Err(error) => {
                    // All-or-nothing: roll back what this call installed.
                    for &id in &ids {
                        tree.remove(id);
                    }
                    return Err(error);
                }
            }
        }

        // Registration hooks may veto individual commands.
        ids.retain(|&id| {
            let cancelled = tree
                .get(id)
                .is_some_and(|exec| self.inner.hooks.fire_registered(exec));
            if cancelled {
                tree.remove(id);
            }
            !cancelled
        });

        debug!(installed = ids.len(), total = tree.len(), "commands registered");
        Ok(Registration { ids })
    }

    fn remove_locked(&self, tree: &mut CommandTree<A>, id: ExecutableId) -> bool {
        let Some(exec) = tree.get(id) else {
            return false;
        };
        if self.inner.hooks.fire_unregistered(exec) {
            return false;
        }
        let removed = tree.remove(id);
        if removed {
            self.inner.cooldowns.forget_command(id);
            debug!(remaining = tree.len(), "command unregistered");
        }
        removed
    }
}

impl<A: Actor> std::fmt::Debug for Herald<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Herald({} commands)", self.inner.tree.read_recursive().len())
    }
}
