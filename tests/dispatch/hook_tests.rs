//! Hook ordering, cancellation, and re-entrancy tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use herald::core::{CommandDeclaration, CommandOutput, DispatchConfig};
use herald::foundation::ErrorKind;

use crate::common::{builder_with_players, TestActor};

#[test]
fn execution_hooks_fire_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&order);
    let second = Arc::clone(&order);
    let herald = builder_with_players()
        .on_executed(move |_, _, _| first.lock().unwrap().push("first"))
        .on_executed(move |_, _, _| second.lock().unwrap().push("second"))
        .build();

    herald
        .register(CommandDeclaration::new("go").executes(|_| Ok(CommandOutput::None)))
        .unwrap();
    assert!(herald.dispatch(TestActor::new("x"), "go").is_executed());
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn cancellation_still_runs_later_hooks_which_observe_it() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let ran = Arc::new(AtomicUsize::new(0));

    let canceller = Arc::clone(&observed);
    let observer = Arc::clone(&observed);
    let herald = builder_with_players()
        .on_executed(move |_, _, cancel| {
            canceller.lock().unwrap().push(("canceller", cancel.was_cancelled()));
            cancel.cancel();
        })
        .on_executed(move |_, _, cancel| {
            observer.lock().unwrap().push(("observer", cancel.was_cancelled()));
        })
        .build();

    let ran_in_handler = Arc::clone(&ran);
    herald
        .register(CommandDeclaration::new("go").executes(move |_| {
            ran_in_handler.fetch_add(1, Ordering::SeqCst);
            Ok(CommandOutput::None)
        }))
        .unwrap();

    let outcome = herald.dispatch(TestActor::new("x"), "go");
    assert!(outcome.is_cancelled());
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(
        *observed.lock().unwrap(),
        vec![("canceller", false), ("observer", true)]
    );
}

#[test]
fn pre_dispatch_hooks_can_veto_before_parsing() {
    let herald = builder_with_players()
        .on_dispatch(|_, input, cancel| {
            if input.contains("forbidden") {
                cancel.cancel();
            }
        })
        .build();

    herald
        .register(CommandDeclaration::new("speak").executes(|_| Ok("ok".into())))
        .unwrap();

    let actor = TestActor::new("x");
    assert!(herald
        .dispatch(actor.clone(), "speak forbidden")
        .is_cancelled());
    assert!(herald.dispatch(actor, "speak").is_executed());
}

#[test]
fn registration_hooks_observe_and_can_veto() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let herald = builder_with_players()
        .on_registered(move |command, cancel| {
            sink.lock().unwrap().push(command.path().to_string());
            if command.path().to_string().starts_with("blocked") {
                cancel.cancel();
            }
        })
        .build();

    herald
        .register(CommandDeclaration::new("allowed").executes(|_| Ok(CommandOutput::None)))
        .unwrap();
    let vetoed = herald
        .register(CommandDeclaration::new("blocked").executes(|_| Ok(CommandOutput::None)))
        .unwrap();

    assert!(vetoed.is_empty());
    assert_eq!(*seen.lock().unwrap(), vec!["allowed", "blocked"]);

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "allowed").is_executed());
    assert!(herald.dispatch(actor, "blocked").error().is_some());
}

#[test]
fn unregistration_hooks_can_keep_a_command_alive() {
    let herald = builder_with_players()
        .on_unregistered(|command, cancel| {
            if command.path().to_string() == "protected" {
                cancel.cancel();
            }
        })
        .build();

    let protected = herald
        .register(CommandDeclaration::new("protected").executes(|_| Ok(CommandOutput::None)))
        .unwrap();
    let plain = herald
        .register(CommandDeclaration::new("plain").executes(|_| Ok(CommandOutput::None)))
        .unwrap();

    assert_eq!(herald.unregister(&protected), 0);
    assert_eq!(herald.unregister(&plain), 1);

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "protected").is_executed());
    assert!(herald.dispatch(actor, "plain").error().is_some());
}

#[test]
fn runaway_recursive_dispatch_is_cut_off() {
    let herald = builder_with_players()
        .config(DispatchConfig::default().with_max_dispatch_depth(4))
        .build();

    let inner = herald.clone();
    let depth_errors = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&depth_errors);
    herald
        .register(CommandDeclaration::new("loop").executes(move |ctx| {
            let outcome = inner.dispatch(ctx.actor_arc(), "loop");
            if matches!(
                outcome.error().map(|e| &e.kind),
                Some(ErrorKind::HookDepthExceeded { .. })
            ) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Ok(CommandOutput::None)
        }))
        .unwrap();

    assert!(herald.dispatch(TestActor::new("x"), "loop").is_executed());
    // Exactly one frame hit the guard; the rest unwound normally.
    assert_eq!(depth_errors.load(Ordering::SeqCst), 1);
}
