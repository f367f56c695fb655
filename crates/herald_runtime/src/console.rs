//! A console-backed actor.

use herald_core::{Actor, ActorId};

/// Actor whose replies go to stdout and errors to stderr.
#[derive(Debug)]
pub struct ConsoleActor {
    name: String,
}

impl ConsoleActor {
    /// Creates a console actor with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The actor's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Actor for ConsoleActor {
    fn id(&self) -> ActorId {
        ActorId::new(self.name.clone())
    }

    fn reply(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
