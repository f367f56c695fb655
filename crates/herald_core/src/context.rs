//! Per-dispatch execution state.
//!
//! An [`ExecutionContext`] is created for each dispatch, accumulates
//! parsed arguments during the tree walk, and is handed to parsers,
//! conditions, validators, hooks, and finally the handler. It is dropped
//! when the dispatch completes.

use std::sync::Arc;

use herald_foundation::{ArgValue, Error, Result};

use crate::actor::{Actor, ActorId};
use crate::cooldown::CooldownHandle;

/// What a handler returned, fed to the resolved response handler.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandOutput {
    /// Nothing to report.
    None,
    /// A text reply for the actor.
    Text(String),
    /// A structured value; the default response handler displays it.
    Value(ArgValue),
}

impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<()> for CommandOutput {
    fn from((): ()) -> Self {
        Self::None
    }
}

/// State of one dispatch: the actor, the raw input, and the arguments
/// parsed so far, by name and in parse order.
pub struct ExecutionContext<A: Actor> {
    actor: Arc<A>,
    input: Arc<str>,
    args: Vec<(String, ArgValue)>,
    command_path: Option<Arc<str>>,
    cooldown: Option<CooldownHandle>,
}

// Not derived: the actor is shared, not cloned, so `A: Clone` is never
// required. The dispatcher forks contexts when attempting branches.
impl<A: Actor> Clone for ExecutionContext<A> {
    fn clone(&self) -> Self {
        Self {
            actor: Arc::clone(&self.actor),
            input: Arc::clone(&self.input),
            args: self.args.clone(),
            command_path: self.command_path.clone(),
            cooldown: self.cooldown.clone(),
        }
    }
}

impl<A: Actor> ExecutionContext<A> {
    /// Creates a fresh context for a dispatch of `input` by `actor`.
    #[must_use]
    pub fn new(actor: Arc<A>, input: Arc<str>) -> Self {
        Self {
            actor,
            input,
            args: Vec::new(),
            command_path: None,
            cooldown: None,
        }
    }

    /// The actor that submitted the input.
    #[must_use]
    pub fn actor(&self) -> &A {
        &self.actor
    }

    /// The actor behind a shared handle.
    #[must_use]
    pub fn actor_arc(&self) -> Arc<A> {
        Arc::clone(&self.actor)
    }

    /// The actor's identity.
    #[must_use]
    pub fn actor_id(&self) -> ActorId {
        self.actor.id()
    }

    /// The complete raw input line.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The display path of the selected command, once one is selected.
    #[must_use]
    pub fn command_path(&self) -> Option<&str> {
        self.command_path.as_deref()
    }

    /// Sends a reply through the actor.
    pub fn reply(&self, message: &str) {
        self.actor.reply(message);
    }

    /// Sends an error through the actor.
    pub fn error(&self, message: &str) {
        self.actor.error(message);
    }

    /// All parsed arguments, in parse order.
    pub fn args(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.args.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Looks up a parsed argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.args
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Typed access to an integer argument.
    ///
    /// # Errors
    ///
    /// Fails if the argument is absent or not an integer.
    pub fn int(&self, name: &str) -> Result<i64> {
        self.require(name)?
            .as_int()
            .ok_or_else(|| Error::internal(format!("argument <{name}> is not an integer")))
    }

    /// Typed access to a float argument (integers convert).
    ///
    /// # Errors
    ///
    /// Fails if the argument is absent or not numeric.
    pub fn float(&self, name: &str) -> Result<f64> {
        self.require(name)?
            .as_number()
            .ok_or_else(|| Error::internal(format!("argument <{name}> is not a number")))
    }

    /// Typed access to a boolean argument.
    ///
    /// # Errors
    ///
    /// Fails if the argument is absent or not a boolean.
    pub fn bool(&self, name: &str) -> Result<bool> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| Error::internal(format!("argument <{name}> is not a boolean")))
    }

    /// Typed access to a string argument.
    ///
    /// # Errors
    ///
    /// Fails if the argument is absent or not a string.
    pub fn string(&self, name: &str) -> Result<&str> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| Error::internal(format!("argument <{name}> is not a string")))
    }

    /// Typed access to an embedder-defined argument.
    ///
    /// # Errors
    ///
    /// Fails if the argument is absent or of a different type.
    pub fn value<T: 'static>(&self, name: &str) -> Result<&T> {
        self.require(name)?
            .downcast_ref::<T>()
            .ok_or_else(|| Error::internal(format!("argument <{name}> has an unexpected type")))
    }

    /// The cooldown handle for the selected command and this actor.
    ///
    /// # Errors
    ///
    /// Fails if no command has been selected yet (parsers cannot touch
    /// cooldowns).
    pub fn cooldown(&self) -> Result<CooldownHandle> {
        self.cooldown
            .clone()
            .ok_or_else(|| Error::internal("no command selected; cooldown handle unavailable"))
    }

    fn require(&self, name: &str) -> Result<&ArgValue> {
        self.get(name)
            .ok_or_else(|| Error::internal(format!("argument <{name}> was not parsed")))
    }

    pub(crate) fn push_arg(&mut self, name: impl Into<String>, value: ArgValue) {
        let name = name.into();
        if let Some(slot) = self.args.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.args.push((name, value));
        }
    }

    pub(crate) fn select_command(&mut self, path: Arc<str>, handle: CooldownHandle) {
        self.command_path = Some(path);
        self.cooldown = Some(handle);
    }
}
