//! The Herald dispatch core.
//!
//! This crate turns command declarations into a command tree and resolves
//! raw input lines from actors into handler invocations:
//!
//! ```text
//! "teleport Alice 1 2 3"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ TREE WALK       │  → fork a stream per matching branch
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CANDIDATE       │  → literals, parser priorities, defaults,
//! │ RANKING         │    registration order
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ EXECUTION       │  → conditions, permission, validators,
//! │ PIPELINE        │    hooks, handler, response
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actor`] - The acting principal: identity plus reply/error sinks
//! - [`annotations`] - Built-in annotation kinds (description, cooldown, range)
//! - [`parameter`] - Parameter parsers, priorities, and their factories
//! - [`suggestion`] - Suggestion providers for partial arguments
//! - [`precondition`] - Permissions, conditions, and argument validators
//! - [`response`] - Response, exception, and failure handlers
//! - [`registry`] - Ordered factory registries with first/last precedence
//! - [`path`] - Command paths of literal and placeholder segments
//! - [`declaration`] - The builder-API declaration model and its ingestion
//! - [`tree`] - The command trie of literal/parameter nodes
//! - [`context`] - Per-dispatch execution context
//! - [`dispatch`] - The token-walk dispatcher and its ranking rules
//! - [`suggest`] - The completion engine sharing the dispatcher's walk
//! - [`hooks`] - Registration/unregistration/execution hooks
//! - [`cooldown`] - Per-(command, actor) cooldown store and handles
//! - [`help`] - Children/siblings/related enumeration and pagination
//! - [`herald`] - The builder, the frozen [`Herald`] instance, entry points

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actor;
pub mod annotations;
pub mod context;
pub mod cooldown;
pub mod declaration;
pub mod dispatch;
pub mod help;
pub mod herald;
pub mod hooks;
pub mod parameter;
pub mod path;
pub mod precondition;
pub mod registry;
pub mod response;
pub mod suggest;
pub mod suggestion;
pub mod tree;

// Re-export primary types at crate root for convenience
pub use actor::{Actor, ActorId};
pub use annotations::{Cooldown, Description, Range, SuggestWith};
pub use context::{CommandOutput, ExecutionContext};
pub use cooldown::{Clock, CooldownHandle, SystemClock};
pub use declaration::{CommandDeclaration, CommandGroup, Param};
pub use dispatch::{DispatchFailure, DispatchOutcome};
pub use help::{paginate, HelpEntry};
pub use herald::{DispatchConfig, Herald, HeraldBuilder, Registration};
pub use parameter::{ParameterType, ParameterTypeFactory, ParsePriority};
pub use suggestion::{StaticSuggestions, SuggestionProvider};

pub use herald_foundation::{
    AnnotationList, ArgType, ArgValue, Error, ErrorKind, Result, StreamView, StringStream,
};
