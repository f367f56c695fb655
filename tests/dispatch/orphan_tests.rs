//! Orphan command tests: paths supplied at registration time.

use herald::core::{CommandDeclaration, CommandGroup, CommandOutput};
use herald::foundation::ErrorKind;

use crate::common::{herald_with_players, TestActor};

fn orphan_group() -> CommandGroup<TestActor> {
    CommandGroup::orphan()
        .executes(|_| Ok(CommandOutput::Text("entry".to_string())))
        .command(
            CommandDeclaration::new("bar")
                .executes(|_| Ok(CommandOutput::Text("bar".to_string()))),
        )
}

#[test]
fn orphan_binds_to_the_runtime_path() {
    let herald = herald_with_players();
    herald.register_orphan(&["buzz"], orphan_group()).unwrap();

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "buzz").is_executed());
    assert_eq!(actor.last_reply().as_deref(), Some("entry"));

    assert!(herald.dispatch(actor.clone(), "buzz bar").is_executed());
    assert_eq!(actor.last_reply().as_deref(), Some("bar"));
}

#[test]
fn orphan_accepts_multiple_runtime_paths() {
    let herald = herald_with_players();
    herald
        .register_orphan(&["buzz", "bz"], orphan_group())
        .unwrap();

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor.clone(), "bz bar").is_executed());
    assert_eq!(actor.last_reply().as_deref(), Some("bar"));

    let paths: Vec<String> = herald.commands().into_iter().map(|e| e.path).collect();
    assert_eq!(paths, vec!["buzz", "bz", "buzz bar", "bz bar"]);
}

#[test]
fn registering_an_unbound_orphan_fails() {
    let herald = herald_with_players();
    let err = herald.register_group(orphan_group()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedPath { .. }));
    assert!(herald.commands().is_empty());
}

#[test]
fn registering_an_orphan_with_no_paths_fails() {
    let herald = herald_with_players();
    let err = herald.register_orphan(&[], orphan_group()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedPath { .. }));
}
