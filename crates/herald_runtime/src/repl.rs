//! The read-dispatch loop.

use std::sync::Arc;

use herald_core::{Actor, Herald};
use herald_foundation::Result;

use crate::editor::{LineEditor, ReadResult};

/// Interactive shell: reads lines, dispatches them, repeats.
pub struct Shell<A: Actor, E: LineEditor> {
    editor: E,
    herald: Herald<A>,
    actor: Arc<A>,
    prompt: String,
    show_banner: bool,
}

impl<A: Actor, E: LineEditor> Shell<A, E> {
    /// Creates a shell over the given editor, dispatcher, and actor.
    pub fn new(editor: E, herald: Herald<A>, actor: Arc<A>) -> Self {
        Self {
            editor,
            herald,
            actor,
            prompt: "> ".to_string(),
            show_banner: true,
        }
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Runs the loop until EOF or `exit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => {
                    println!();
                    continue;
                }
                ReadResult::Eof => break,
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.editor.add_history(trimmed);

            if trimmed == "exit" || trimmed == "quit" {
                break;
            }

            // Platform glue strips the command prefix before dispatch.
            let input = trimmed.strip_prefix('/').unwrap_or(trimmed);
            let outcome = self.herald.dispatch(Arc::clone(&self.actor), input);
            if outcome.is_cancelled() {
                println!("(cancelled)");
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    fn print_banner(&self) {
        println!(
            "herald shell ({} commands registered)",
            self.herald.commands().len()
        );
        println!("Tab completes; 'commands' lists everything; 'exit' quits.");
    }
}
