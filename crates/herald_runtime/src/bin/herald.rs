//! The demo shell binary.

use std::process::ExitCode;
use std::sync::Arc;

use herald_runtime::demo::demo_herald;
use herald_runtime::{ConsoleActor, RustylineEditor, Shell};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let herald = demo_herald();
    let actor = Arc::new(ConsoleActor::new(
        std::env::var("USER").unwrap_or_else(|_| "you".to_string()),
    ));

    let editor = match RustylineEditor::new(herald.clone(), Arc::clone(&actor)) {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("failed to initialize editor: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut shell = Shell::new(editor, herald, actor);
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("shell error: {e}");
            ExitCode::FAILURE
        }
    }
}
