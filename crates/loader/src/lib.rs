//! # Document Loader
//!
//! Reads the raw documents the extractor stored in the IR, parses them in
//! parallel and writes their definitions, selections, variables, arguments
//! and directives back as rows.
//!
//! Inline component fields are lifted to named fragments while loading.
//! The [`rewrite`] passes then register component fields on their types and
//! swap runtime scalars for schema scalars.

mod insert;
mod load;
mod plan;
pub mod rewrite;

pub use load::{
    load_documents, load_documents_with, LoadOptions, LoadSummary, DEFAULT_CHANNEL_CAPACITY,
};
pub use rewrite::{rewrite_component_fields, rewrite_runtime_scalars};
