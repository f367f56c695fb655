//! A sample command set for the demo shell.
//!
//! Exercises the dispatch core end to end: custom parameter types,
//! overloads, enums, greedy strings, defaults, cooldowns, groups, and an
//! orphan command bound at registration time.

use std::sync::Arc;
use std::time::Duration;

use herald_core::parameter::{self, ParameterTypeRef, ParsePriority};
use herald_core::{
    ArgType, ArgValue, CommandDeclaration, CommandGroup, CommandOutput, Error, Herald, Param,
};

use crate::console::ConsoleActor;

/// A resolved player argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// The player's canonical name.
    pub name: String,
}

const ONLINE_PLAYERS: [&str; 3] = ["alice", "bob", "carol"];

fn player_parser() -> ParameterTypeRef<ConsoleActor> {
    parameter::from_fn(ParsePriority::Default, |stream, _ctx| {
        let start = stream.position();
        let token = stream.read_unquoted_string()?;
        ONLINE_PLAYERS
            .iter()
            .find(|p| p.eq_ignore_ascii_case(&token))
            .map(|p| ArgValue::other("player", Player { name: (*p).to_string() }))
            .ok_or_else(|| Error::rejected_token(token, "no such player").with_position(start))
    })
}

/// Builds a dispatcher with the demo command set installed.
///
/// # Panics
///
/// Panics if a demo declaration fails to register; the set is fixed, so
/// that would be a bug here, not in the caller.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn demo_herald() -> Herald<ConsoleActor> {
    // One shared parser instance, so <target> nodes merge across overloads.
    let player = player_parser();
    let player_factory = move |ty: &ArgType, _ann: &herald_core::AnnotationList| {
        (*ty == ArgType::custom("player")).then(|| Arc::clone(&player))
    };

    let herald: Herald<ConsoleActor> = Herald::builder()
        .parameter_type(player_factory)
        .suggestion_provider(|ty: &ArgType, _ann: &herald_core::AnnotationList| {
            (*ty == ArgType::custom("player"))
                .then(|| herald_core::StaticSuggestions::shared::<ConsoleActor, _, _>(ONLINE_PLAYERS))
        })
        .build();

    herald
        .register(
            CommandDeclaration::new("greet")
                .describe("Greets you back")
                .executes(|ctx: &mut herald_core::ExecutionContext<ConsoleActor>| {
                    let name = ctx.actor().name().to_string();
                    Ok(CommandOutput::Text(format!("Hello, {name}!")))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("greet <target>")
                .describe("Greets another player")
                .parameter(Param::new("target", ArgType::custom("player")))
                .executes(|ctx| {
                    let target = ctx.value::<Player>("target")?;
                    Ok(CommandOutput::Text(format!("Welcome, {}!", target.name)))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("teleport <x> <y> <z>")
                .describe("Teleports you to coordinates")
                .parameter(Param::new("x", ArgType::Float))
                .parameter(Param::new("y", ArgType::Float))
                .parameter(Param::new("z", ArgType::Float))
                .executes(|ctx| {
                    let (x, y, z) = (ctx.float("x")?, ctx.float("y")?, ctx.float("z")?);
                    Ok(CommandOutput::Text(format!("Teleported to {x} {y} {z}")))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("teleport <target> <x> <y> <z>")
                .describe("Teleports a player to coordinates")
                .parameter(Param::new("target", ArgType::custom("player")))
                .parameter(Param::new("x", ArgType::Float))
                .parameter(Param::new("y", ArgType::Float))
                .parameter(Param::new("z", ArgType::Float))
                .executes(|ctx| {
                    let target = ctx.value::<Player>("target")?.name.clone();
                    let (x, y, z) = (ctx.float("x")?, ctx.float("y")?, ctx.float("z")?);
                    Ok(CommandOutput::Text(format!("Sent {target} to {x} {y} {z}")))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("teleport <target> here")
                .describe("Pulls a player to you")
                .parameter(Param::new("target", ArgType::custom("player")))
                .executes(|ctx| {
                    let target = ctx.value::<Player>("target")?.name.clone();
                    Ok(CommandOutput::Text(format!("{target} is on their way")))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("teleport <to>")
                .describe("Teleports you to a player")
                .parameter(Param::new("to", ArgType::custom("player")))
                .executes(|ctx| {
                    let to = ctx.value::<Player>("to")?.name.clone();
                    Ok(CommandOutput::Text(format!("Teleported to {to}")))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("mode <mode>")
                .describe("Switches the game mode")
                .parameter(Param::new("mode", ArgType::enumeration("mode", ["fast", "slow"])))
                .executes(|ctx| {
                    let mode = ctx.string("mode")?.to_string();
                    Ok(CommandOutput::Text(format!("Mode set to {mode}")))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("say <message>")
                .describe("Says something out loud")
                .parameter(Param::new("message", ArgType::GreedyString))
                .executes(|ctx| {
                    let message = ctx.string("message")?.to_string();
                    Ok(CommandOutput::Text(format!("You say: {message}")))
                }),
        )
        .expect("demo command registers");

    herald
        .register(
            CommandDeclaration::new("spin")
                .describe("Spins in place (3s cooldown)")
                .cooldown(Duration::from_secs(3))
                .executes(|_| Ok(CommandOutput::Text("Wheee!".to_string()))),
        )
        .expect("demo command registers");

    let quest = CommandGroup::new("quest")
        .path("q")
        .command(
            CommandDeclaration::new("create <name>")
                .describe("Creates a quest")
                .parameter(Param::new("name", ArgType::String))
                .executes(|ctx| {
                    Ok(CommandOutput::Text(format!("Created quest {}", ctx.string("name")?)))
                }),
        )
        .command(
            CommandDeclaration::new("delete <name>")
                .describe("Deletes a quest")
                .parameter(Param::new("name", ArgType::String))
                .executes(|ctx| {
                    Ok(CommandOutput::Text(format!("Deleted quest {}", ctx.string("name")?)))
                }),
        )
        .command(
            CommandDeclaration::new("start <name>")
                .describe("Starts a quest")
                .parameter(Param::new("name", ArgType::String))
                .executes(|ctx| {
                    Ok(CommandOutput::Text(format!("Started quest {}", ctx.string("name")?)))
                }),
        )
        .command(
            CommandDeclaration::new("clear")
                .describe("Clears your quest log")
                .executes(|_| Ok(CommandOutput::Text("Quest log cleared".to_string()))),
        );
    herald.register_group(quest).expect("demo group registers");

    let orphan = CommandGroup::orphan()
        .executes(|_| Ok(CommandOutput::Text("buzz!".to_string())))
        .command(
            CommandDeclaration::new("bar")
                .describe("The orphan's subcommand")
                .executes(|_| Ok(CommandOutput::Text("bar!".to_string()))),
        );
    herald
        .register_orphan(&["buzz"], orphan)
        .expect("orphan registers");

    let listing = herald.clone();
    herald
        .register(
            CommandDeclaration::new("commands")
                .describe("Lists every command")
                .executes(move |ctx| {
                    for entry in listing.commands() {
                        match &entry.description {
                            Some(text) => ctx.reply(&format!("{} - {text}", entry.usage)),
                            None => ctx.reply(&entry.usage),
                        }
                    }
                    Ok(CommandOutput::None)
                }),
        )
        .expect("demo command registers");

    herald
}
