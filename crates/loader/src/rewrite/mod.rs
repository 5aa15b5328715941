//! Passes that run once every document is loaded and turn the framework's
//! conventions into plain IR rows.

mod component_fields;
mod runtime_scalars;

pub use component_fields::rewrite_component_fields;
pub use runtime_scalars::rewrite_runtime_scalars;
