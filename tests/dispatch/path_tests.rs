//! Path expansion and registration tests.

use herald::core::{CommandDeclaration, CommandGroup, CommandOutput, Herald, Param};
use herald::foundation::{ArgType, ErrorKind};

use crate::common::TestActor;

fn herald() -> Herald<TestActor> {
    Herald::builder().build()
}

fn no_op(path: &str) -> CommandDeclaration<TestActor> {
    CommandDeclaration::new(path).executes(|_| Ok(CommandOutput::None))
}

#[test]
fn group_and_declaration_paths_form_a_cartesian_product() {
    let herald = herald();
    let group = CommandGroup::new("quest")
        .path("q")
        .group(
            CommandGroup::new("admin")
                .path("a")
                .command(no_op("reset").path("wipe")),
        );
    herald.register_group(group).unwrap();

    let paths: Vec<String> = herald.commands().into_iter().map(|e| e.path).collect();
    assert_eq!(
        paths,
        vec![
            "quest admin reset",
            "quest admin wipe",
            "quest a reset",
            "quest a wipe",
            "q admin reset",
            "q admin wipe",
            "q a reset",
            "q a wipe",
        ]
    );
}

#[test]
fn duplicate_registration_fails_and_installs_nothing() {
    let herald = herald();
    herald.register(no_op("greet")).unwrap();

    let err = herald
        .register(no_op("other").path("greet"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateCommand { .. }));

    // The non-conflicting "other" path must have been rolled back too.
    let paths: Vec<String> = herald.commands().into_iter().map(|e| e.path).collect();
    assert_eq!(paths, vec!["greet"]);
}

#[test]
fn unresolved_placeholder_is_a_registration_error() {
    let herald = herald();
    let err = herald
        .register(
            CommandDeclaration::new("warp <name>").executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedPlaceholder { .. }));
}

#[test]
fn unknown_parameter_type_is_a_registration_error() {
    let herald = herald();
    let err = herald
        .register(
            CommandDeclaration::new("warp <w>")
                .parameter(Param::new("w", ArgType::custom("warp")))
                .executes(|_| Ok(CommandOutput::None)),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedParameterType { .. }));
}

#[test]
fn unregistration_is_complete_and_leaves_others_alone() {
    let herald = herald();
    let quest = herald
        .register_group(
            CommandGroup::new("quest")
                .command(no_op("create"))
                .command(no_op("delete")),
        )
        .unwrap();
    herald.register(no_op("warp")).unwrap();

    assert_eq!(herald.unregister(&quest), 2);

    let actor = TestActor::new("x");
    assert!(herald
        .dispatch(actor.clone(), "quest create")
        .error()
        .is_some());
    assert!(herald.dispatch(actor.clone(), "warp").is_executed());

    let paths: Vec<String> = herald.commands().into_iter().map(|e| e.path).collect();
    assert_eq!(paths, vec!["warp"]);
}

#[test]
fn unregister_by_path_prefix() {
    let herald = herald();
    herald.register(no_op("quest create")).unwrap();
    herald.register(no_op("quest delete")).unwrap();
    herald.register(no_op("questlog")).unwrap();

    assert_eq!(herald.unregister_path("quest").unwrap(), 2);
    let paths: Vec<String> = herald.commands().into_iter().map(|e| e.path).collect();
    assert_eq!(paths, vec!["questlog"]);
}

#[test]
fn reregistration_after_unregister_works() {
    let herald = herald();
    let first = herald.register(no_op("greet")).unwrap();
    herald.unregister(&first);
    herald.register(no_op("greet")).unwrap();

    let actor = TestActor::new("x");
    assert!(herald.dispatch(actor, "greet").is_executed());
}
