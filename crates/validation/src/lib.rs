//! # Validation
//!
//! Semantic checks over a loaded IR. Every rule is a [`ValidationRule`]
//! that queries the IR and turns the matching rows into located
//! diagnostics. Rules only read, so [`validate`] runs them concurrently,
//! each on its own pooled connection.
//!
//! ```text
//! IrStore ──► rule 1 ──┐
//!         ──► rule 2 ──┼──► DiagnosticSink
//!         ──► rule n ──┘
//! ```

mod query;
mod registry;
mod rule;
mod rules;
mod runner;

pub use registry::{all_rule_names, all_rules, rule_by_name};
pub use rule::{RuleContext, ValidationRule};
pub use runner::{validate, validate_with, ValidationSummary};
