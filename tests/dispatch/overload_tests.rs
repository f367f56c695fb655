//! Overload selection tests: literal specificity, parser priority,
//! arity, and registration-order tie-breaking.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use herald::core::{CommandDeclaration, CommandOutput, Herald, Param};
use herald::foundation::ArgType;

use crate::common::{herald_with_players, Player, TestActor};

/// The four teleport overloads, each tagging which one ran.
fn teleport_set() -> (Herald<TestActor>, Arc<std::sync::Mutex<Option<&'static str>>>) {
    let herald = herald_with_players();
    let selected = Arc::new(std::sync::Mutex::new(None));

    let tag = |label: &'static str, selected: &Arc<std::sync::Mutex<Option<&'static str>>>| {
        let selected = Arc::clone(selected);
        move |_: &mut herald::core::ExecutionContext<TestActor>| {
            *selected.lock().unwrap() = Some(label);
            Ok(CommandOutput::None)
        }
    };

    herald
        .register(
            CommandDeclaration::new("teleport <x> <y> <z>")
                .parameter(Param::new("x", ArgType::Float))
                .parameter(Param::new("y", ArgType::Float))
                .parameter(Param::new("z", ArgType::Float))
                .executes(tag("coords", &selected)),
        )
        .unwrap();
    herald
        .register(
            CommandDeclaration::new("teleport <target> <x> <y> <z>")
                .parameter(Param::new("target", ArgType::custom("player")))
                .parameter(Param::new("x", ArgType::Float))
                .parameter(Param::new("y", ArgType::Float))
                .parameter(Param::new("z", ArgType::Float))
                .executes(tag("target-coords", &selected)),
        )
        .unwrap();
    herald
        .register(
            CommandDeclaration::new("teleport <target> here")
                .parameter(Param::new("target", ArgType::custom("player")))
                .executes(tag("here", &selected)),
        )
        .unwrap();
    herald
        .register(
            CommandDeclaration::new("teleport <to>")
                .parameter(Param::new("to", ArgType::custom("player")))
                .executes(tag("to-player", &selected)),
        )
        .unwrap();

    (herald, selected)
}

#[test]
fn numeric_input_selects_the_coordinate_overload() {
    let (herald, selected) = teleport_set();
    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor, "teleport 1 2 3").is_executed());
    assert_eq!(*selected.lock().unwrap(), Some("coords"));
}

#[test]
fn literal_beats_parameter_at_the_same_depth() {
    let (herald, selected) = teleport_set();
    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor, "teleport alice here").is_executed());
    assert_eq!(*selected.lock().unwrap(), Some("here"));
}

#[test]
fn higher_arity_wins_when_the_first_token_is_a_player() {
    let (herald, selected) = teleport_set();
    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor, "teleport alice 1 2 3").is_executed());
    assert_eq!(*selected.lock().unwrap(), Some("target-coords"));
}

#[test]
fn single_player_token_selects_the_short_overload() {
    let (herald, selected) = teleport_set();
    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor, "teleport alice").is_executed());
    assert_eq!(*selected.lock().unwrap(), Some("to-player"));
}

#[test]
fn enum_priority_wins_when_both_parsers_accept() {
    let herald = herald_with_players();
    let selected = Arc::new(std::sync::Mutex::new(None));

    let enum_sel = Arc::clone(&selected);
    herald
        .register(
            CommandDeclaration::new("mode <m>")
                .parameter(Param::new("m", ArgType::enumeration("mode", ["fast", "slow"])))
                .executes(move |ctx| {
                    *enum_sel.lock().unwrap() = Some(format!("enum:{}", ctx.string("m")?));
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let num_sel = Arc::clone(&selected);
    herald
        .register(
            CommandDeclaration::new("mode <level>")
                .parameter(Param::new("level", ArgType::Int))
                .executes(move |ctx| {
                    *num_sel.lock().unwrap() = Some(format!("int:{}", ctx.int("level")?));
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let actor = TestActor::new("x");

    // FAST parses under both... no: the int parser rejects it, but even if
    // a string overload existed, the enum's Highest priority would win.
    assert!(herald.dispatch(actor.clone(), "mode FAST").is_executed());
    assert_eq!(selected.lock().unwrap().as_deref(), Some("enum:fast"));

    // 42 is rejected by the enum parser, so the numeric overload wins.
    assert!(herald.dispatch(actor, "mode 42").is_executed());
    assert_eq!(selected.lock().unwrap().as_deref(), Some("int:42"));
}

#[test]
fn enum_priority_beats_a_plain_string_overload() {
    let herald = herald_with_players();
    let selected = Arc::new(std::sync::Mutex::new(None));

    let string_sel = Arc::clone(&selected);
    herald
        .register(
            CommandDeclaration::new("lever <name>")
                .parameter(Param::new("name", ArgType::String))
                .executes(move |_| {
                    *string_sel.lock().unwrap() = Some("string");
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let enum_sel = Arc::clone(&selected);
    herald
        .register(
            CommandDeclaration::new("lever <state>")
                .parameter(Param::new("state", ArgType::enumeration("state", ["on", "off"])))
                .executes(move |_| {
                    *enum_sel.lock().unwrap() = Some("enum");
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let actor = TestActor::new("x");
    // Both parsers accept "on"; the enum's priority class is higher even
    // though the string overload registered first.
    assert!(herald.dispatch(actor.clone(), "lever on").is_executed());
    assert_eq!(*selected.lock().unwrap(), Some("enum"));

    // Only the string overload accepts arbitrary tokens.
    assert!(herald.dispatch(actor, "lever crank").is_executed());
    assert_eq!(*selected.lock().unwrap(), Some("string"));
}

#[test]
fn registration_order_breaks_exact_ties() {
    let herald = herald_with_players();
    let counter = Arc::new(AtomicUsize::new(0));

    // Same arity, same parser priority class: int vs float.
    let first = Arc::clone(&counter);
    herald
        .register(
            CommandDeclaration::new("roll <sides>")
                .parameter(Param::new("sides", ArgType::Int))
                .executes(move |_| {
                    first.store(1, Ordering::SeqCst);
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let second = Arc::clone(&counter);
    herald
        .register(
            CommandDeclaration::new("roll <chance>")
                .parameter(Param::new("chance", ArgType::Float))
                .executes(move |_| {
                    second.store(2, Ordering::SeqCst);
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let actor = TestActor::new("x");
    // "6" parses as both int and float; earlier registration wins.
    assert!(herald.dispatch(actor, "roll 6").is_executed());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn fewer_defaults_beats_more_defaults() {
    let herald = herald_with_players();
    let selected = Arc::new(std::sync::Mutex::new(None));

    let defaulted = Arc::clone(&selected);
    herald
        .register(
            CommandDeclaration::new("warp <name> <dimension>")
                .parameter(Param::new("name", ArgType::String))
                .parameter(Param::new("dimension", ArgType::String).default_value("overworld"))
                .executes(move |_| {
                    *defaulted.lock().unwrap() = Some("with-default");
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let exact = Arc::clone(&selected);
    herald
        .register(
            CommandDeclaration::new("warp <spot>")
                .parameter(Param::new("spot", ArgType::String))
                .executes(move |_| {
                    *exact.lock().unwrap() = Some("exact");
                    Ok(CommandOutput::None)
                }),
        )
        .unwrap();

    let actor = TestActor::new("x");
    // Both overloads complete on one token; the one needing no default
    // filling ranks higher despite registering later.
    assert!(herald.dispatch(actor, "warp hub").is_executed());
    assert_eq!(*selected.lock().unwrap(), Some("exact"));
}

#[test]
fn target_resolves_to_the_canonical_player() {
    let herald = herald_with_players();
    herald
        .register(
            CommandDeclaration::new("poke <target>")
                .parameter(Param::new("target", ArgType::custom("player")))
                .executes(|ctx| {
                    let target = ctx.value::<Player>("target")?;
                    Ok(CommandOutput::Text(target.name.clone()))
                }),
        )
        .unwrap();

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "poke ALICE").is_executed());
    assert_eq!(actor.last_reply().as_deref(), Some("alice"));
}
