//! Shared fixtures: a recording actor, a manual clock, and a small
//! "player" parameter type.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use herald::core::cooldown::Clock;
use herald::core::parameter::{self, ParameterTypeRef, ParsePriority};
use herald::core::{
    Actor, ActorId, AnnotationList, ArgType, ArgValue, Error, Herald, HeraldBuilder,
};

/// Actor that records every reply and error it receives.
pub struct TestActor {
    name: String,
    replies: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl TestActor {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            replies: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn last_reply(&self) -> Option<String> {
        self.replies.lock().unwrap().last().cloned()
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.lock().unwrap().last().cloned()
    }
}

impl Actor for TestActor {
    fn id(&self) -> ActorId {
        ActorId::new(self.name.clone())
    }

    fn reply(&self, message: &str) {
        self.replies.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Manually advanced clock for cooldown tests.
pub struct FakeClock {
    now: Mutex<Duration>,
}

impl FakeClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }
}

/// Players the test "player" parameter type accepts.
pub const PLAYERS: [&str; 3] = ["alice", "bob", "carol"];

/// A resolved player argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
}

/// A single shared player parser, so `<target>` nodes merge across
/// overloads.
pub fn player_parser() -> ParameterTypeRef<TestActor> {
    parameter::from_fn(ParsePriority::Default, |stream, _ctx| {
        let start = stream.position();
        let token = stream.read_unquoted_string()?;
        PLAYERS
            .iter()
            .find(|p| p.eq_ignore_ascii_case(&token))
            .map(|p| {
                ArgValue::other(
                    "player",
                    Player {
                        name: (*p).to_string(),
                    },
                )
            })
            .ok_or_else(|| Error::rejected_token(token, "no such player").with_position(start))
    })
}

/// A builder with the player parameter type and its suggestions wired in.
pub fn builder_with_players() -> HeraldBuilder<TestActor> {
    let parser = player_parser();
    Herald::builder()
        .parameter_type(move |ty: &ArgType, _ann: &AnnotationList| {
            (*ty == ArgType::custom("player")).then(|| Arc::clone(&parser))
        })
        .suggestion_provider(|ty: &ArgType, _ann: &AnnotationList| {
            (*ty == ArgType::custom("player"))
                .then(|| herald::core::StaticSuggestions::shared::<TestActor, _, _>(PLAYERS))
        })
}

/// A herald with the player type and no commands.
pub fn herald_with_players() -> Herald<TestActor> {
    builder_with_players().build()
}
