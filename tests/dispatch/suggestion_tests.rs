//! Suggestion engine tests.

use std::sync::Arc;

use herald::core::{
    CommandDeclaration, CommandGroup, CommandOutput, Param, StaticSuggestions, SuggestWith,
};
use herald::foundation::ArgType;

use crate::common::{herald_with_players, TestActor, PLAYERS};

fn quest_tree() -> herald::core::Herald<TestActor> {
    let herald = herald_with_players();
    let group = CommandGroup::new("quest")
        .command(CommandDeclaration::new("create").executes(|_| Ok(CommandOutput::None)))
        .command(CommandDeclaration::new("delete").executes(|_| Ok(CommandOutput::None)))
        .command(CommandDeclaration::new("start").executes(|_| Ok(CommandOutput::None)))
        .command(CommandDeclaration::new("clear").executes(|_| Ok(CommandOutput::None)));
    herald.register_group(group).unwrap();
    herald
}

#[test]
fn subcommands_complete_in_insertion_order() {
    let herald = quest_tree();
    let actor = TestActor::new("x");
    let input = "quest ";
    assert_eq!(
        herald.suggestions(actor, input, input.len()),
        vec!["create", "delete", "start", "clear"]
    );
}

#[test]
fn partial_token_filters_by_prefix() {
    let herald = quest_tree();
    let actor = TestActor::new("x");
    let input = "quest c";
    assert_eq!(
        herald.suggestions(actor, input, input.len()),
        vec!["create", "clear"]
    );
}

#[test]
fn root_literals_complete() {
    let herald = quest_tree();
    let actor = TestActor::new("x");
    assert_eq!(herald.suggestions(actor.clone(), "qu", 2), vec!["quest"]);
    assert_eq!(herald.suggestions(actor, "", 0), vec!["quest"]);
}

#[test]
fn cursor_truncates_the_input() {
    let herald = quest_tree();
    let actor = TestActor::new("x");
    // Cursor inside "quest": only the first token matters.
    let suggestions = herald.suggestions(actor, "quest create", 3);
    assert_eq!(suggestions, vec!["quest"]);
}

#[test]
fn parameter_suggestions_come_from_the_registry() {
    let herald = herald_with_players();
    herald
        .register(
            CommandDeclaration::new("poke <target>")
                .parameter(Param::new("target", ArgType::custom("player")))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let actor = TestActor::new("x");
    let input = "poke ";
    assert_eq!(herald.suggestions(actor.clone(), input, input.len()), PLAYERS.to_vec());

    let input = "poke a";
    assert_eq!(herald.suggestions(actor, input, input.len()), vec!["alice"]);
}

#[test]
fn suggest_with_annotation_overrides_the_registry() {
    let herald = herald_with_players();
    herald
        .register(
            CommandDeclaration::new("poke <target>")
                .parameter(
                    Param::new("target", ArgType::custom("player")).annotated(SuggestWith::new(
                        StaticSuggestions::shared::<TestActor, _, _>(["steve"]),
                    )),
                )
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let actor = TestActor::new("x");
    let input = "poke ";
    assert_eq!(herald.suggestions(actor, input, input.len()), vec!["steve"]);
}

#[test]
fn enum_parameters_suggest_their_variants() {
    let herald = herald_with_players();
    herald
        .register(
            CommandDeclaration::new("mode <m>")
                .parameter(Param::new("m", ArgType::enumeration("mode", ["fast", "slow"])))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let actor = TestActor::new("x");
    let input = "mode ";
    assert_eq!(
        herald.suggestions(actor.clone(), input, input.len()),
        vec!["fast", "slow"]
    );
    let input = "mode f";
    assert_eq!(herald.suggestions(actor, input, input.len()), vec!["fast"]);
}

#[test]
fn mixed_literal_and_parameter_children_both_contribute() {
    let herald = herald_with_players();
    herald
        .register(
            CommandDeclaration::new("teleport <target> here")
                .parameter(Param::new("target", ArgType::custom("player")))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();
    herald
        .register(
            CommandDeclaration::new("teleport <target> <x>")
                .parameter(Param::new("target", ArgType::custom("player")))
                .parameter(Param::new("x", ArgType::Float))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let actor = TestActor::new("x");
    // After a resolved player, the literal "here" completes; the float
    // parameter has no provider and contributes nothing.
    let input = "teleport alice ";
    assert_eq!(
        herald.suggestions(actor, input, input.len()),
        vec!["here"]
    );
}

#[test]
fn duplicates_are_removed_preserving_first_position() {
    let herald = herald_with_players();
    herald
        .register(
            CommandDeclaration::new("color <c>")
                .parameter(
                    Param::new("c", ArgType::String).annotated(SuggestWith::new(
                        StaticSuggestions::shared::<TestActor, _, _>(["red", "green", "red"]),
                    )),
                )
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let actor = TestActor::new("x");
    let input = "color ";
    assert_eq!(
        herald.suggestions(actor, input, input.len()),
        vec!["red", "green"]
    );
}
