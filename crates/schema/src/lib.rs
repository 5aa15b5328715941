//! Schema importer.
//!
//! Parses and validates a schema with `apollo-compiler`, then writes its
//! types, fields, arguments, enum values, possible types, directives and
//! root operation types into the IR. The framework's own definitions are
//! added on top so documents can use them without declaring them.

mod error;
mod framework;
mod import;

pub use error::SchemaError;
pub use framework::{
    component_field_fragment_name, framework_directive_names, COMPONENT_FIELD_DIRECTIVE,
    COMPONENT_FIELD_FRAGMENT_PREFIX, COMPONENT_SCALAR, RUNTIME_SCALAR_DIRECTIVE,
};
pub use import::{import_schema, import_schema_file, SchemaSummary};
