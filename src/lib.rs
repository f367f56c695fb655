//! Herald - Declarative command framework
//!
//! This crate re-exports all layers of the Herald system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: herald_runtime    — Interactive shell, demo binary
//! Layer 1: herald_core       — Registries, command tree, dispatcher,
//!                              suggestions, hooks, cooldowns, help
//! Layer 0: herald_foundation — Streams, values, annotations, errors
//! ```

pub use herald_core as core;
pub use herald_foundation as foundation;
pub use herald_runtime as runtime;
