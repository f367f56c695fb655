//! Per-(command, actor) cooldowns.
//!
//! The store keeps the monotonic expiry timestamp for each key; handles
//! expose inspection and control to handlers. Nothing here is persisted:
//! the embedder may externalize cooldowns through the handle API.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use herald_foundation::{Error, ErrorKind, Result};
use parking_lot::Mutex;

use crate::actor::ActorId;
use crate::tree::ExecutableId;

/// Monotonic time source for cooldown expiry.
///
/// The default [`SystemClock`] measures real elapsed time; tests inject a
/// controllable clock to verify expiry behavior without sleeping.
pub trait Clock: Send + Sync {
    /// Monotonic time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Real monotonic clock, measuring from its creation.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock with its origin at now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

type CooldownKey = (ExecutableId, ActorId);

/// Shared store of active cooldowns, keyed by (command, actor).
pub struct CooldownStore {
    clock: Arc<dyn Clock>,
    expiries: Mutex<HashMap<CooldownKey, Duration>>,
}

impl CooldownStore {
    /// Creates an empty store over the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            expiries: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a handle for one (command, actor) key.
    ///
    /// `bound` is the duration the no-argument [`CooldownHandle::cooldown`]
    /// arms, normally supplied by the command's cooldown annotation.
    #[must_use]
    pub fn handle(
        self: &Arc<Self>,
        command: ExecutableId,
        actor: ActorId,
        bound: Option<Duration>,
    ) -> CooldownHandle {
        CooldownHandle {
            store: Arc::clone(self),
            command,
            actor,
            bound,
        }
    }

    /// Time remaining until the key's cooldown expires; zero when idle.
    #[must_use]
    pub fn remaining(&self, command: ExecutableId, actor: &ActorId) -> Duration {
        let expiries = self.expiries.lock();
        let Some(expiry) = expiries.get(&(command, actor.clone())) else {
            return Duration::ZERO;
        };
        expiry.saturating_sub(self.clock.now())
    }

    /// Arms the key's cooldown for the given duration from now.
    pub fn arm(&self, command: ExecutableId, actor: &ActorId, duration: Duration) {
        let expiry = self.clock.now() + duration;
        self.expiries
            .lock()
            .insert((command, actor.clone()), expiry);
    }

    /// Clears the key's cooldown.
    pub fn clear(&self, command: ExecutableId, actor: &ActorId) {
        self.expiries.lock().remove(&(command, actor.clone()));
    }

    /// Drops every cooldown for an unregistered command.
    pub(crate) fn forget_command(&self, command: ExecutableId) {
        self.expiries.lock().retain(|(c, _), _| *c != command);
    }
}

impl fmt::Debug for CooldownStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CooldownStore({} active)", self.expiries.lock().len())
    }
}

/// A handler's view of its own cooldown for the invoking actor.
///
/// Obtained through
/// [`ExecutionContext::cooldown`](crate::context::ExecutionContext::cooldown).
#[derive(Clone)]
pub struct CooldownHandle {
    store: Arc<CooldownStore>,
    command: ExecutableId,
    actor: ActorId,
    bound: Option<Duration>,
}

impl CooldownHandle {
    /// Returns true if the actor is still cooling down.
    #[must_use]
    pub fn is_on_cooldown(&self) -> bool {
        !self.remaining_time().is_zero()
    }

    /// Time left until the command may run again; zero when idle.
    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        self.store.remaining(self.command, &self.actor)
    }

    /// Arms the cooldown for an explicit duration.
    pub fn cooldown_for(&self, duration: Duration) {
        self.store.arm(self.command, &self.actor, duration);
    }

    /// Arms the cooldown for the bound duration.
    ///
    /// # Errors
    ///
    /// Fails with `UnboundCooldown` if no duration was bound via the
    /// command's cooldown annotation or [`with_cooldown`].
    ///
    /// [`with_cooldown`]: CooldownHandle::with_cooldown
    pub fn cooldown(&self) -> Result<()> {
        let Some(bound) = self.bound else {
            return Err(Error::new(ErrorKind::UnboundCooldown));
        };
        self.cooldown_for(bound);
        Ok(())
    }

    /// Clears the cooldown.
    pub fn remove_cooldown(&self) {
        self.store.clear(self.command, &self.actor);
    }

    /// Returns a handle with the given bound duration.
    #[must_use]
    pub fn with_cooldown(mut self, duration: Duration) -> Self {
        self.bound = Some(duration);
        self
    }
}

impl fmt::Debug for CooldownHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CooldownHandle({:?}, {}, remaining {:?})",
            self.command,
            self.actor,
            self.remaining_time()
        )
    }
}
