//! # Relational IR
//!
//! Schemas and documents are stored as rows in SQLite so that validation
//! can be written as joins across every document and the schema at once.
//!
//! - [`IrStore`] owns a pool of connections and the single-writer gate
//! - [`ddl`] holds the table definitions
//! - [`Cancellation`] stops long-running stages cooperatively
//! - [`insert_raw_document`] and [`register_inline_component_field`] are the
//!   inputs the extractor writes before a run

mod cancel;
pub mod ddl;
mod error;
mod inputs;
mod model;
mod store;

pub use cancel::Cancellation;
pub use ddl::create_tables;
pub use error::{IrError, Result, SqlContext};
pub use inputs::{
    inline_component_fields, insert_raw_document, raw_documents, register_inline_component_field,
    RawDocument,
};
pub use model::{DocumentKind, SelectionKind, TypeKind};
pub use store::{IrStore, PooledConnection};
