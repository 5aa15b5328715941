use crate::query::locations_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `duplicate_variables` rule
pub struct DuplicateVariablesRuleImpl;

const QUERY: &str = "
SELECT documents.name, operation_variables.name,
       json_group_array(json_object('filepath', raw.filepath, 'line', operation_variables.row, 'column', operation_variables.column))
FROM operation_variables
JOIN documents ON documents.id = operation_variables.document
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY operation_variables.document, operation_variables.name
HAVING COUNT(*) > 1";

impl ValidationRule for DuplicateVariablesRuleImpl {
    fn name(&self) -> &'static str {
        "duplicate_variables"
    }

    fn description(&self) -> &'static str {
        "An operation cannot declare the same variable twice"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let operation: String = row.get(0)?;
            let variable: String = row.get(1)?;
            Ok(Diagnostic::validation(
                self.name(),
                format!("variable ${variable} is declared more than once in {operation}"),
            )
            .with_locations(locations_at(row, 2)?))
        })
    }
}
