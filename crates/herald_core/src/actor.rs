//! The acting principal behind a dispatch.
//!
//! Actors are supplied by the embedder. The core only needs an identity
//! (for cooldown keying and hooks) and a reply/error sink.

use std::fmt;
use std::sync::Arc;

/// Identity of an actor, used for equality, hashing, and cooldown keying.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ActorId(Arc<str>);

impl ActorId {
    /// Creates an actor identity from any string-like token.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The identity token as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The principal invoking commands.
///
/// Implementations decide what "replying" means for their platform: a chat
/// message, a console line, a packet. The core never interprets the text
/// it sends through these sinks.
pub trait Actor: Send + Sync + 'static {
    /// Stable identity of this actor.
    fn id(&self) -> ActorId;

    /// Delivers a normal reply to the actor.
    fn reply(&self, message: &str);

    /// Delivers an error message to the actor.
    fn error(&self, message: &str);
}
