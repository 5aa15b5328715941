use super::variable_usage::{declarations, usages_by_document, SpreadGraph};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;
use std::collections::{HashMap, HashSet};

/// Trait implementation for `unused_variables` rule
pub struct UnusedVariablesRuleImpl;

impl ValidationRule for UnusedVariablesRuleImpl {
    fn name(&self) -> &'static str {
        "unused_variables"
    }

    fn description(&self) -> &'static str {
        "Variables declared by an operation must be used by it or a fragment it spreads"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let declarations = declarations(ctx)?;
        if declarations.is_empty() {
            return Ok(Vec::new());
        }

        let usages = usages_by_document(ctx)?;
        let graph = SpreadGraph::load(ctx)?;

        let mut used_by: HashMap<i64, HashSet<&str>> = HashMap::new();
        let mut diagnostics = Vec::new();
        for declaration in &declarations {
            let used = used_by.entry(declaration.document).or_insert_with(|| {
                graph
                    .reachable(declaration.document)
                    .into_iter()
                    .filter_map(|document| usages.get(&document))
                    .flatten()
                    .map(|usage| usage.name.as_str())
                    .collect()
            });
            if !used.contains(declaration.name.as_str()) {
                diagnostics.push(
                    Diagnostic::validation(
                        self.name(),
                        format!(
                            "variable ${} is never used in {}",
                            declaration.name, declaration.operation
                        ),
                    )
                    .with_location(declaration.location.clone()),
                );
            }
        }
        Ok(diagnostics)
    }
}
