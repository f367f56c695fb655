//! The dispatcher: token-by-token walk of the command tree.
//!
//! Every branch that could accept the input is attempted on a forked
//! stream. Attempts that reach a leaf with the input consumed become
//! candidates; everything else becomes a recorded failure. The best
//! candidate executes through the precondition/hook pipeline; with no
//! candidates, the ranked failures go to the failure handler.

use std::cell::Cell;
use std::sync::Arc;

use herald_foundation::{Error, ErrorKind, StringStream};
use tracing::{debug, trace, warn};

use crate::actor::Actor;
use crate::context::ExecutionContext;
use crate::cooldown::CooldownStore;
use crate::herald::DispatchConfig;
use crate::hooks::Hooks;
use crate::registry::Registries;
use crate::tree::{CommandTree, ExecutableCommand, ExecutableId, NodeId, NodeKind};

/// Result of one dispatch.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A candidate was selected and its handler ran to completion.
    Executed,
    /// A hook cancelled the dispatch; not an error.
    Cancelled,
    /// No candidate completed, or the selected candidate failed.
    Failed(Error),
}

impl DispatchOutcome {
    /// True if a handler ran to completion.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }

    /// True if a hook cancelled the dispatch.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The failure, if the dispatch failed.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// One failed branch attempt, reported to the failure handler.
#[derive(Debug)]
pub struct DispatchFailure {
    /// The deepest input position the branch reached.
    pub position: usize,
    /// The typed error the branch failed with.
    pub error: Error,
    order: usize,
}

thread_local! {
    static DISPATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DepthGuard;

impl DepthGuard {
    fn enter(limit: usize) -> Result<Self, Error> {
        DISPATCH_DEPTH.with(|depth| {
            if depth.get() >= limit {
                Err(Error::new(ErrorKind::HookDepthExceeded { limit }))
            } else {
                depth.set(depth.get() + 1);
                Ok(Self)
            }
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Borrowed view of everything one dispatch needs.
pub(crate) struct Dispatcher<'a, A: Actor> {
    pub tree: &'a CommandTree<A>,
    pub registries: &'a Registries<A>,
    pub hooks: &'a Hooks<A>,
    pub cooldowns: &'a Arc<CooldownStore>,
    pub config: &'a DispatchConfig,
}

struct Candidate<A: Actor> {
    exec: ExecutableId,
    ctx: ExecutionContext<A>,
    literals: usize,
    defaults: usize,
}

impl<A: Actor> Dispatcher<'_, A> {
    pub fn dispatch(&self, actor: Arc<A>, input: &str) -> DispatchOutcome {
        let _guard = match DepthGuard::enter(self.config.max_dispatch_depth) {
            Ok(guard) => guard,
            Err(error) => return DispatchOutcome::Failed(error),
        };

        if self.hooks.fire_dispatch(&actor, input) {
            debug!(input, "dispatch cancelled by pre-dispatch hook");
            return DispatchOutcome::Cancelled;
        }

        let input: Arc<str> = Arc::from(input);
        let ctx = ExecutionContext::new(Arc::clone(&actor), Arc::clone(&input));
        let mut walk = Walk {
            dispatcher: self,
            candidates: Vec::new(),
            failures: Vec::new(),
            exhausted: false,
        };
        walk.explore(NodeId::ROOT, StringStream::new(Arc::clone(&input)), ctx, 0, 0);

        let Walk {
            mut candidates,
            mut failures,
            ..
        } = walk;

        if candidates.is_empty() {
            rank_failures(&mut failures);
            if failures.is_empty() {
                failures.push(DispatchFailure {
                    position: 0,
                    error: Error::unknown_command(input.as_ref()),
                    order: 0,
                });
            }
            debug!(input = input.as_ref(), failures = failures.len(), "no candidates");
            self.registries
                .failure_handler
                .handle(&actor, &input, &failures);
            let best = failures.swap_remove(0);
            return DispatchOutcome::Failed(best.error);
        }

        self.rank_candidates(&mut candidates);
        let selected = candidates.remove(0);
        trace!(
            command = %self
                .tree
                .get(selected.exec)
                .map(ExecutableCommand::usage)
                .unwrap_or_default(),
            "candidate selected"
        );
        self.execute(selected)
    }

    fn rank_candidates(&self, candidates: &mut Vec<Candidate<A>>) {
        candidates.sort_by(|a, b| {
            let (exec_a, exec_b) = (self.tree.get(a.exec), self.tree.get(b.exec));
            let priority = |e: Option<&ExecutableCommand<A>>| e.map_or(0, ExecutableCommand::priority_sum);
            let order = |e: Option<&ExecutableCommand<A>>| {
                e.map_or(usize::MAX, ExecutableCommand::registration_index)
            };
            b.literals
                .cmp(&a.literals)
                .then_with(|| priority(exec_b).cmp(&priority(exec_a)))
                .then_with(|| a.defaults.cmp(&b.defaults))
                .then_with(|| order(exec_a).cmp(&order(exec_b)))
        });
    }

    fn execute(&self, candidate: Candidate<A>) -> DispatchOutcome {
        let Some(exec) = self.tree.get(candidate.exec) else {
            return DispatchOutcome::Failed(Error::internal("selected command vanished"));
        };
        let mut ctx = candidate.ctx;
        let handle =
            self.cooldowns
                .handle(exec.id(), ctx.actor_id(), exec.cooldown());
        ctx.select_command(Arc::from(exec.path().to_string()), handle.clone());

        // Conditions: global first, then the command's own.
        for condition in self.registries.conditions.iter().chain(&exec.conditions) {
            if let Err(error) = condition.test(&ctx) {
                return self.fail(error, &ctx);
            }
        }

        // The cooldown annotation acts as a built-in condition.
        if exec.cooldown().is_some() {
            let remaining = handle.remaining_time();
            if !remaining.is_zero() {
                return self.fail(Error::on_cooldown(remaining), &ctx);
            }
        }

        if let Some(permission) = &exec.permission {
            if !permission.allows(ctx.actor()) {
                return self.fail(Error::no_permission(permission.describe()), &ctx);
            }
        }

        // Validator chains run per argument, in parameter order.
        for parameter in &exec.parameters {
            let name = &parameter.param.name;
            let Some(value) = ctx.get(name) else {
                continue; // optional parameter that was skipped
            };
            for validator in &parameter.validators {
                if let Err(error) = validator.validate(name, value, &ctx) {
                    return self.fail(error, &ctx);
                }
            }
        }

        if self.hooks.fire_executed(&ctx, exec) {
            debug!(command = %exec.usage(), "execution cancelled by hook");
            return DispatchOutcome::Cancelled;
        }

        // Context parameters resolve at invocation time, after every gate.
        for (name, resolver) in &exec.context_params {
            match resolver.resolve(&ctx) {
                Ok(value) => ctx.push_arg(name.clone(), value),
                Err(error) => return self.fail(error, &ctx),
            }
        }

        match (exec.handler)(&mut ctx) {
            Ok(output) => {
                if exec.cooldown().is_some() {
                    // Annotation-armed cooldown starts only after success.
                    let _ = handle.cooldown();
                }
                if let Err(error) = exec.response.respond(output, &ctx) {
                    if !self.route_exception(&error, &ctx) {
                        warn!(%error, "response handling failed; error dropped");
                    }
                }
                DispatchOutcome::Executed
            }
            Err(error) => self.fail(error, &ctx),
        }
    }

    fn fail(&self, error: Error, ctx: &ExecutionContext<A>) -> DispatchOutcome {
        if !self.route_exception(&error, ctx) {
            ctx.error(&error.to_string());
        }
        DispatchOutcome::Failed(error)
    }

    fn route_exception(&self, error: &Error, ctx: &ExecutionContext<A>) -> bool {
        self.registries
            .exception_handlers
            .iter()
            .any(|handler| handler.handle(error, ctx))
    }
}

struct Walk<'d, 'a, A: Actor> {
    dispatcher: &'d Dispatcher<'a, A>,
    candidates: Vec<Candidate<A>>,
    failures: Vec<DispatchFailure>,
    exhausted: bool,
}

impl<A: Actor> Walk<'_, '_, A> {
    fn explore(
        &mut self,
        node: NodeId,
        mut stream: StringStream,
        ctx: ExecutionContext<A>,
        literals: usize,
        defaults: usize,
    ) {
        if self.exhausted {
            return;
        }
        stream.skip_whitespace();
        let tree = self.dispatcher.tree;

        if !stream.has_remaining() {
            self.complete_here(node, &stream, ctx, literals, defaults);
            return;
        }

        let token = peek_token(&stream);
        let current = tree.node(node);

        // Literals are preferred over parameters: the first child whose
        // lowercase spelling (or alias) equals the token wins the branch.
        let literal_child = current.children.iter().copied().find(|&child| {
            matches!(&tree.node(child).kind, NodeKind::Literal(l) if l.matches(&token))
        });
        if let Some(child) = literal_child {
            let mut next = stream.fork();
            let _ = next.read_unquoted_string();
            self.explore(child, next, ctx, literals + 1, defaults);
            return;
        }

        let mut tried_parameter = false;
        for &child in &current.children {
            if self.exhausted {
                return;
            }
            let NodeKind::Parameter(parameter) = &tree.node(child).kind else {
                continue;
            };
            tried_parameter = true;

            let mut fork = stream.fork();
            let start = fork.position();
            let mut forked_ctx = ctx.clone();
            match parameter.parser.parse(&mut fork, &forked_ctx) {
                Ok(value) => {
                    forked_ctx.push_arg(&parameter.param.name, value);
                    self.explore(child, fork, forked_ctx, literals, defaults);
                }
                Err(error) => {
                    let position = error.position.unwrap_or(start).max(start);
                    self.record_failure(position, name_error(error, &parameter.param.name));
                }
            }
        }

        if !tried_parameter {
            let position = stream.position();
            if current.executable.is_some() {
                self.record_failure(
                    position,
                    Error::extra_arguments(stream.remaining().trim_end())
                        .with_position(position),
                );
            } else {
                self.record_failure(
                    position,
                    Error::unknown_command(token).with_position(position),
                );
            }
        }
    }

    /// Input is exhausted at `node`: complete if a leaf lives here, and
    /// descend through parameters that can be filled without input.
    fn complete_here(
        &mut self,
        node: NodeId,
        stream: &StringStream,
        ctx: ExecutionContext<A>,
        literals: usize,
        defaults: usize,
    ) {
        let tree = self.dispatcher.tree;
        let current = tree.node(node);

        if let Some(exec) = current.executable {
            self.candidates.push(Candidate {
                exec,
                ctx: ctx.clone(),
                literals,
                defaults,
            });
        }

        let mut saw_literal_child = false;
        for &child in &current.children {
            if self.exhausted {
                return;
            }
            let parameter = match &tree.node(child).kind {
                NodeKind::Parameter(p) => p,
                NodeKind::Literal(_) => {
                    saw_literal_child = true;
                    continue;
                }
                NodeKind::Root => continue,
            };

            if let Some(text) = &parameter.param.default_text {
                let mut default_stream = StringStream::new(text.as_str());
                let mut forked_ctx = ctx.clone();
                match parameter.parser.parse(&mut default_stream, &forked_ctx) {
                    Ok(value) => {
                        forked_ctx.push_arg(&parameter.param.name, value);
                        self.explore(child, stream.fork(), forked_ctx, literals, defaults + 1);
                    }
                    Err(error) => {
                        let error = name_error(error, &parameter.param.name);
                        self.record_failure(stream.position(), error);
                    }
                }
            } else if parameter.param.optional {
                self.explore(child, stream.fork(), ctx.clone(), literals, defaults + 1);
            } else {
                self.record_failure(
                    stream.position(),
                    Error::missing_argument(
                        &parameter.param.name,
                        parameter.param.ty.to_string(),
                    )
                    .with_position(stream.position()),
                );
            }
        }

        if current.executable.is_none() {
            if node == NodeId::ROOT {
                self.record_failure(0, Error::unknown_command(ctx.input()));
            } else if saw_literal_child {
                self.record_failure(
                    stream.position(),
                    Error::expected_input().with_position(stream.position()),
                );
            }
        }
    }

    fn record_failure(&mut self, position: usize, error: Error) {
        if let Some(limit) = self.dispatcher.config.max_failed_attempts {
            if self.failures.len() >= limit {
                self.exhausted = true;
                return;
            }
        }
        let order = self.failures.len();
        self.failures.push(DispatchFailure {
            position,
            error,
            order,
        });
    }
}

fn peek_token(stream: &StringStream) -> String {
    stream.fork().read_unquoted_string().unwrap_or_default()
}

/// Attaches the parameter name to a parse failure. Parsers do not know
/// which parameter they serve, so `InvalidValue` kinds may arrive with an
/// empty name.
fn name_error(mut error: Error, name: &str) -> Error {
    if error.parameter.is_none() {
        error.parameter = Some(name.to_string());
    }
    if let ErrorKind::InvalidValue { parameter, .. } = &mut error.kind {
        if parameter.is_empty() {
            *parameter = name.to_string();
        }
    }
    error
}

/// Orders failures best-first: deepest position, then kind weight, then
/// discovery order.
pub(crate) fn rank_failures(failures: &mut [DispatchFailure]) {
    failures.sort_by(|a, b| {
        b.position
            .cmp(&a.position)
            .then_with(|| b.error.kind.weight().cmp(&a.error.kind.weight()))
            .then_with(|| a.order.cmp(&b.order))
    });
}
