//! Integration tests for the herald dispatch core.
//!
//! Tests for the full pipeline from raw input to handler invocation:
//! - Input streams and quoting
//! - Path expansion and registration
//! - Dispatch, overload resolution, and failure ranking
//! - Suggestions
//! - Cooldowns, hooks, help, orphan commands

mod common;

mod cooldown_tests;
mod help_tests;
mod hook_tests;
mod orphan_tests;
mod overload_tests;
mod path_tests;
mod stream_tests;
mod suggestion_tests;
