//! Help introspection tests.

use herald::core::{paginate, CommandDeclaration, CommandGroup, CommandOutput, Herald};

use crate::common::TestActor;

fn populated() -> Herald<TestActor> {
    let herald = Herald::builder().build();
    let group = CommandGroup::new("quest")
        .executes(|_| Ok(CommandOutput::None))
        .command(
            CommandDeclaration::new("create").describe("Creates a quest").executes(|_| {
                Ok(CommandOutput::None)
            }),
        )
        .command(CommandDeclaration::new("delete").executes(|_| Ok(CommandOutput::None)))
        .command(CommandDeclaration::new("create confirm").executes(|_| Ok(CommandOutput::None)));
    herald.register_group(group).unwrap();
    herald
        .register(CommandDeclaration::new("warp").executes(|_| Ok(CommandOutput::None)))
        .unwrap();
    herald
}

#[test]
fn children_are_strict_path_extensions() {
    let herald = populated();
    let children: Vec<String> = herald
        .children("quest")
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(children, vec!["quest create", "quest delete", "quest create confirm"]);

    let grandchildren: Vec<String> = herald
        .children("quest create")
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(grandchildren, vec!["quest create confirm"]);
}

#[test]
fn siblings_share_the_parent_and_differ_in_the_last_segment() {
    let herald = populated();
    let siblings: Vec<String> = herald
        .siblings("quest create")
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(siblings, vec!["quest delete"]);

    // A root-level command's parent is the empty prefix, so its siblings
    // are the other root-level commands.
    let root_siblings: Vec<String> = herald
        .siblings("warp")
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(root_siblings, vec!["quest"]);
}

#[test]
fn related_is_the_union_in_registration_order() {
    let herald = populated();
    let related: Vec<String> = herald
        .related("quest create")
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(related, vec!["quest create confirm", "quest delete"]);
}

#[test]
fn descriptions_surface_in_entries() {
    let herald = populated();
    let create = herald
        .children("quest")
        .unwrap()
        .into_iter()
        .find(|e| e.path == "quest create")
        .unwrap();
    assert_eq!(create.description.as_deref(), Some("Creates a quest"));
}

#[test]
fn listing_pages_are_stable() {
    let herald = populated();
    let all = herald.commands();
    assert_eq!(all.len(), 5);

    let page1 = paginate(&all, 1, 2);
    let page2 = paginate(&all, 2, 2);
    let page3 = paginate(&all, 3, 2);
    assert_eq!(page1.len(), 2);
    assert_eq!(page2.len(), 2);
    assert_eq!(page3.len(), 1);
    assert_eq!(page1[0].path, "quest");
    assert_eq!(page3[0].path, "warp");
    assert!(paginate(&all, 4, 2).is_empty());
}
