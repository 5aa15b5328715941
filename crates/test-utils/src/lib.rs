//! Shared test utilities for the Houdini pipeline crates.
//!
//! - [`TestProject`] builds a schema, config and raw documents, then runs
//!   the whole pipeline against an in-memory store
//! - [`TestRun`] exposes the resulting diagnostics and the IR
//! - [`format_diagnostics`] renders diagnostics for snapshot assertions

#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

mod assertions;
mod project;

pub use assertions::{format_diagnostic_messages, format_diagnostics};
pub use project::{TestProject, TestRun};
