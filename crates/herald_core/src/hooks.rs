//! Hooks around registration, unregistration, and execution.
//!
//! Hooks run in registration order. Each chain shares one cancel latch:
//! a cancellation prevents the underlying action but still runs the
//! remaining hooks, so observers see the cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::actor::Actor;
use crate::context::ExecutionContext;
use crate::tree::ExecutableCommand;

/// Set-once cancellation latch handed to every hook in a chain.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Creates an un-cancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the latch. Once set it cannot be cleared.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// True if any hook in the chain cancelled.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Hook fired before the tree walk of a dispatch.
pub type DispatchHook<A> = Arc<dyn Fn(&A, &str, &CancelHandle) + Send + Sync>;

/// Hook fired when a command is registered or unregistered.
pub type CommandHook<A> = Arc<dyn Fn(&ExecutableCommand<A>, &CancelHandle) + Send + Sync>;

/// Hook fired after candidate selection, before the handler runs.
pub type ExecutionHook<A> =
    Arc<dyn Fn(&ExecutionContext<A>, &ExecutableCommand<A>, &CancelHandle) + Send + Sync>;

/// All registered hooks, frozen at build time.
pub struct Hooks<A: Actor> {
    on_dispatch: Vec<DispatchHook<A>>,
    on_registered: Vec<CommandHook<A>>,
    on_unregistered: Vec<CommandHook<A>>,
    on_executed: Vec<ExecutionHook<A>>,
}

impl<A: Actor> Hooks<A> {
    /// Creates an empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_dispatch: Vec::new(),
            on_registered: Vec::new(),
            on_unregistered: Vec::new(),
            on_executed: Vec::new(),
        }
    }

    /// Adds a pre-dispatch hook.
    pub fn add_dispatch(&mut self, hook: DispatchHook<A>) {
        self.on_dispatch.push(hook);
    }

    /// Adds an on-registered hook.
    pub fn add_registered(&mut self, hook: CommandHook<A>) {
        self.on_registered.push(hook);
    }

    /// Adds an on-unregistered hook.
    pub fn add_unregistered(&mut self, hook: CommandHook<A>) {
        self.on_unregistered.push(hook);
    }

    /// Adds a pre-execution hook.
    pub fn add_executed(&mut self, hook: ExecutionHook<A>) {
        self.on_executed.push(hook);
    }

    /// Fires the pre-dispatch chain; returns true if cancelled.
    #[must_use]
    pub fn fire_dispatch(&self, actor: &A, input: &str) -> bool {
        let handle = CancelHandle::new();
        for hook in &self.on_dispatch {
            hook(actor, input, &handle);
        }
        handle.was_cancelled()
    }

    /// Fires the on-registered chain; returns true if cancelled.
    #[must_use]
    pub fn fire_registered(&self, command: &ExecutableCommand<A>) -> bool {
        Self::fire_command_chain(&self.on_registered, command)
    }

    /// Fires the on-unregistered chain; returns true if cancelled.
    #[must_use]
    pub fn fire_unregistered(&self, command: &ExecutableCommand<A>) -> bool {
        Self::fire_command_chain(&self.on_unregistered, command)
    }

    /// Fires the pre-execution chain; returns true if cancelled.
    #[must_use]
    pub fn fire_executed(&self, ctx: &ExecutionContext<A>, command: &ExecutableCommand<A>) -> bool {
        let handle = CancelHandle::new();
        for hook in &self.on_executed {
            hook(ctx, command, &handle);
        }
        handle.was_cancelled()
    }

    fn fire_command_chain(chain: &[CommandHook<A>], command: &ExecutableCommand<A>) -> bool {
        let handle = CancelHandle::new();
        for hook in chain {
            hook(command, &handle);
        }
        handle.was_cancelled()
    }
}

impl<A: Actor> Default for Hooks<A> {
    fn default() -> Self {
        Self::new()
    }
}
