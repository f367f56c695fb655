//! Interactive shell for Herald.
//!
//! This crate provides:
//! - [`ConsoleActor`] - An actor writing replies to stdout/stderr
//! - [`LineEditor`] / [`RustylineEditor`] - Line editing with completions
//!   backed by the suggestion engine
//! - [`Shell`] - The read-dispatch loop
//! - [`demo`] - A sample command set exercising the dispatch core

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod console;
pub mod demo;
pub mod editor;
pub mod repl;

pub use console::ConsoleActor;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::Shell;
