use crate::query::locations_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `duplicate_document_names` rule
pub struct DuplicateDocumentNamesRuleImpl;

const QUERY: &str = "
SELECT documents.name, COUNT(*),
       json_group_array(json_object('filepath', raw.filepath, 'line', documents.row, 'column', documents.column))
FROM documents
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY documents.name
HAVING COUNT(*) > 1";

impl ValidationRule for DuplicateDocumentNamesRuleImpl {
    fn name(&self) -> &'static str {
        "duplicate_document_names"
    }

    fn description(&self) -> &'static str {
        "Operation and fragment names must be unique across the project"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let name: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok(Diagnostic::validation(
                self.name(),
                format!("document name {name} is used {count} times"),
            )
            .with_locations(locations_at(row, 2)?))
        })
    }
}
