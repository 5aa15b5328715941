use crate::query::{location_at, with_suggestion};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `unknown_directive` rule
pub struct UnknownDirectiveRuleImpl;

/// Directive instances on selections, documents and variables without a definition
const QUERY: &str = "
SELECT directives.directive, raw.filepath, directives.row, directives.column
FROM selection_directives directives
JOIN selection_refs refs ON refs.child_id = directives.selection_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE directives.directive NOT IN (SELECT name FROM directives)
UNION ALL
SELECT directives.directive, raw.filepath, directives.row, directives.column
FROM document_directives directives
JOIN documents ON documents.id = directives.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE directives.directive NOT IN (SELECT name FROM directives)
UNION ALL
SELECT directives.directive, raw.filepath, directives.row, directives.column
FROM operation_variable_directives directives
JOIN operation_variables variables ON variables.id = directives.parent
JOIN documents ON documents.id = variables.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE directives.directive NOT IN (SELECT name FROM directives)";

const DEFINED: &str = "SELECT name FROM directives WHERE visible = 1";

impl ValidationRule for UnknownDirectiveRuleImpl {
    fn name(&self) -> &'static str {
        "unknown_directive"
    }

    fn description(&self) -> &'static str {
        "Directives must be defined by the schema or the framework"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let unknown = ctx.query(QUERY, [], |row| {
            Ok((row.get::<_, String>(0)?, location_at(row, 1)?))
        })?;
        if unknown.is_empty() {
            return Ok(Vec::new());
        }

        let defined = ctx.query(DEFINED, [], |row| row.get::<_, String>(0))?;
        Ok(unknown
            .into_iter()
            .map(|(name, location)| {
                let message = with_suggestion(
                    format!("unknown directive @{name}"),
                    &name,
                    defined.iter().map(String::as_str),
                );
                Diagnostic::validation(self.name(), message).with_location(location)
            })
            .collect())
    }
}
