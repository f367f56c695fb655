//! Cooldown subsystem tests, driven by a manual clock.

use std::sync::Arc;
use std::time::Duration;

use herald::core::{CommandDeclaration, CommandOutput, ExecutionContext, Herald};
use herald::foundation::{Error, ErrorKind};

use crate::common::{builder_with_players, FakeClock, TestActor};

fn herald_with_clock(clock: Arc<FakeClock>) -> Herald<TestActor> {
    builder_with_players().clock(clock).build()
}

#[test]
fn annotated_cooldown_blocks_until_it_elapses() {
    let clock = FakeClock::new();
    let herald = herald_with_clock(clock.clone());
    herald
        .register(
            CommandDeclaration::new("foo")
                .cooldown(Duration::from_secs(3))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let actor = TestActor::new("x");

    // t = 0: first dispatch succeeds.
    assert!(herald.dispatch(actor.clone(), "foo").is_executed());

    // t = 1: still cooling down, roughly two seconds left.
    clock.advance(Duration::from_secs(1));
    let outcome = herald.dispatch(actor.clone(), "foo");
    match outcome.error().map(|e| &e.kind) {
        Some(ErrorKind::OnCooldown { remaining }) => {
            assert_eq!(*remaining, Duration::from_secs(2));
        }
        other => panic!("expected OnCooldown, got {other:?}"),
    }

    // t = 3.001: cooldown has elapsed.
    clock.advance(Duration::from_millis(2001));
    assert!(herald.dispatch(actor, "foo").is_executed());
}

#[test]
fn cooldowns_are_per_actor() {
    let clock = FakeClock::new();
    let herald = herald_with_clock(clock);
    herald
        .register(
            CommandDeclaration::new("foo")
                .cooldown(Duration::from_secs(3))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let first = TestActor::new("first");
    let second = TestActor::new("second");

    assert!(herald.dispatch(first.clone(), "foo").is_executed());
    assert!(herald.dispatch(first, "foo").error().is_some());
    assert!(herald.dispatch(second, "foo").is_executed());
}

#[test]
fn failed_handlers_leave_no_cooldown() {
    let clock = FakeClock::new();
    let herald = herald_with_clock(clock);
    herald
        .register(
            CommandDeclaration::new("flaky")
                .cooldown(Duration::from_secs(3))
                .executes(|ctx: &mut ExecutionContext<TestActor>| {
                    if ctx.actor().errors().is_empty() {
                        Err(Error::command("first try always fails"))
                    } else {
                        Ok(CommandOutput::None)
                    }
                }),
        )
        .unwrap();

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "flaky").error().is_some());
    // The failure did not arm the cooldown, so the retry runs at once.
    assert!(herald.dispatch(actor, "flaky").is_executed());
}

#[test]
fn handlers_control_their_own_cooldown() {
    let clock = FakeClock::new();
    let herald = herald_with_clock(clock.clone());
    herald
        .register(CommandDeclaration::new("burst").executes(|ctx| {
            // No annotation: the handle is unbound until we bind it.
            let handle = ctx.cooldown()?;
            assert!(matches!(
                handle.cooldown().unwrap_err().kind,
                ErrorKind::UnboundCooldown
            ));

            let bound = handle.with_cooldown(Duration::from_secs(5));
            bound.cooldown()?;
            assert!(bound.is_on_cooldown());
            assert_eq!(bound.remaining_time(), Duration::from_secs(5));

            bound.remove_cooldown();
            assert!(!bound.is_on_cooldown());
            assert_eq!(bound.remaining_time(), Duration::ZERO);
            Ok(CommandOutput::None)
        }))
        .unwrap();

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "burst").is_executed());
    // The handler removed its own cooldown, so it can run again.
    assert!(herald.dispatch(actor, "burst").is_executed());
}

#[test]
fn unregistering_a_command_drops_its_cooldowns() {
    let clock = FakeClock::new();
    let herald = herald_with_clock(clock);
    let registration = herald
        .register(
            CommandDeclaration::new("foo")
                .cooldown(Duration::from_secs(3600))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "foo").is_executed());
    herald.unregister(&registration);

    // Re-registering the same path starts from a clean store.
    herald
        .register(
            CommandDeclaration::new("foo")
                .cooldown(Duration::from_secs(3600))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap();
    assert!(herald.dispatch(actor, "foo").is_executed());
}
