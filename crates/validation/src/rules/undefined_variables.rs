use super::variable_usage::{declarations, fragment_arguments, usages_by_document, SpreadGraph};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::{Diagnostic, SourceLocation};
use std::collections::{HashMap, HashSet};

/// Trait implementation for `undefined_variables` rule
pub struct UndefinedVariablesRuleImpl;

const OPERATIONS: &str = "SELECT id, name FROM documents WHERE kind != 'fragment' ORDER BY id";

impl ValidationRule for UndefinedVariablesRuleImpl {
    fn name(&self) -> &'static str {
        "undefined_variables"
    }

    fn description(&self) -> &'static str {
        "Variables used by an operation or the fragments it spreads must be declared by the operation"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let usages = usages_by_document(ctx)?;
        if usages.is_empty() {
            return Ok(Vec::new());
        }

        let mut declared: HashMap<i64, HashSet<String>> = HashMap::new();
        for declaration in declarations(ctx)? {
            declared
                .entry(declaration.document)
                .or_default()
                .insert(declaration.name);
        }
        let fragment_arguments = fragment_arguments(ctx)?;
        let graph = SpreadGraph::load(ctx)?;
        let nothing = HashSet::new();

        // fragments are checked through every operation that spreads them
        let mut diagnostics = Vec::new();
        for (operation_id, operation) in ctx.query(OPERATIONS, [], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })? {
            let declared = declared.get(&operation_id).unwrap_or(&nothing);
            let mut documents: Vec<i64> = graph.reachable(operation_id).into_iter().collect();
            documents.sort_unstable();

            let mut reported: HashSet<(&str, &SourceLocation)> = HashSet::new();
            for document in documents {
                let own_arguments = fragment_arguments.get(&document).unwrap_or(&nothing);
                for usage in usages.get(&document).into_iter().flatten() {
                    if declared.contains(&usage.name)
                        || (document != operation_id && own_arguments.contains(&usage.name))
                    {
                        continue;
                    }
                    if reported.insert((usage.name.as_str(), &usage.location)) {
                        diagnostics.push(
                            Diagnostic::validation(
                                self.name(),
                                format!("variable ${} is not defined by {operation}", usage.name),
                            )
                            .with_location(usage.location.clone()),
                        );
                    }
                }
            }
        }
        Ok(diagnostics)
    }
}
