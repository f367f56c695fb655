//! Line editor abstraction for the shell.
//!
//! This module provides a trait-based abstraction over line editing
//! libraries, allowing the shell to use rustyline while remaining
//! swappable. The completer delegates to the core suggestion engine, so
//! tab completion and dispatch always agree on the tree.

use std::borrow::Cow;
use std::sync::Arc;

use herald_core::{Actor, Herald};
use herald_foundation::{Error, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer as CompleterDerive, Config, Context, Editor, Helper, Hinter, Validator};

/// Result of reading a line from the editor.
#[derive(Debug)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);
}

/// Helper for rustyline providing completion, hints, and prompt styling.
#[derive(CompleterDerive, Helper, Hinter, Validator)]
struct ShellHelper<A: Actor> {
    #[rustyline(Completer)]
    completer: SuggestionCompleter<A>,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
}

impl<A: Actor> Highlighter for ShellHelper<A> {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completer backed by [`Herald::suggestions`].
struct SuggestionCompleter<A: Actor> {
    herald: Herald<A>,
    actor: Arc<A>,
}

impl<A: Actor> Completer for SuggestionCompleter<A> {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Replacement starts at the current word, exactly where the
        // engine anchors its partial token.
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + 1);

        let candidates: Vec<Pair> = self
            .herald
            .suggestions(Arc::clone(&self.actor), line, pos)
            .into_iter()
            .map(|suggestion| Pair {
                display: suggestion.clone(),
                replacement: suggestion,
            })
            .collect();

        Ok((start, candidates))
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor<A: Actor> {
    editor: Editor<ShellHelper<A>, DefaultHistory>,
}

impl<A: Actor> RustylineEditor<A> {
    /// Creates a rustyline editor completing against the given dispatcher.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    ///
    /// # Panics
    ///
    /// Panics if the history size configuration is invalid (should not
    /// happen with hardcoded valid values).
    pub fn new(herald: Herald<A>, actor: Arc<A>) -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(1000)
            .expect("valid history size")
            .build();

        let helper = ShellHelper {
            completer: SuggestionCompleter { herald, actor },
            hinter: HistoryHinter::new(),
        };

        let mut editor =
            Editor::with_config(config).map_err(|e| Error::internal(e.to_string()))?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

impl<A: Actor> LineEditor for RustylineEditor<A> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::internal(e.to_string())),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}
