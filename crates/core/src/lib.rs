//! # Houdini core
//!
//! Runs the build-time pipeline over an [`IrStore`](houdini_ir::IrStore):
//!
//! 1. import the schema
//! 2. load every raw document the extractor wrote
//! 3. register component fields
//! 4. rewrite runtime scalars
//! 5. validate
//!
//! Every stage reports problems with individual documents as diagnostics
//! and keeps going, so a single run surfaces as many errors as possible.
//! [`run`] returns them all, sorted, once the last stage finishes.

mod error;
pub mod logging;
mod pipeline;

pub use error::PipelineError;
pub use pipeline::{run, run_with_schema_file, PipelineSummary};

pub use houdini_config::ProjectConfig;
pub use houdini_ir::{Cancellation, IrStore};
pub use houdini_types::{Diagnostic, DiagnosticKind, SourceLocation};
