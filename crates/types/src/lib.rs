//! Foundation types for the Houdini document pipeline.
//!
//! This crate provides the types shared by every stage of the pipeline:
//! the IR store, the loader, the convention rewriters and the validator.
//!
//! # Type Categories
//!
//! - **Location types**: [`SourceLocation`], [`Position`], [`SourceOffset`]
//! - **Diagnostic types**: [`Diagnostic`], [`DiagnosticKind`], [`DiagnosticSink`]
//! - **Type references**: [`TypeModifiers`], [`Wrapping`]

mod diagnostic;
mod location;
mod modifiers;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
pub use location::{Position, SourceLocation, SourceOffset};
pub use modifiers::{TypeModifiers, Wrapping};
