//! # GraphQL Syntax
//!
//! Parsing helpers shared by the loader and the validator:
//!
//! - [`parse_document`] turns the content of a raw document into an
//!   `apollo-compiler` AST and reports syntax errors with positions
//! - [`ParsedDocument`] maps AST node locations to 1-indexed positions
//! - [`parse_value`] re-parses the printed argument values stored in the IR
//! - [`split_type`] splits a type reference into a named type and modifiers

mod document;
mod line_index;
mod types;
mod value;

pub use document::{parse_document, ParsedDocument, SyntaxError};
pub use line_index::LineIndex;
pub use types::split_type;
pub use value::{collect_variables, parse_value, unquote, variables_in};
