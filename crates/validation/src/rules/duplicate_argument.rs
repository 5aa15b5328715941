use crate::query::locations_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `duplicate_argument` rule
pub struct DuplicateArgumentRuleImpl;

/// Argument names repeated on one field or one directive instance.
/// Directive arguments have no position of their own, so they are located
/// at their directive.
const QUERY: &str = "
SELECT 'field ' || selections.field_name, arguments.name,
       json_group_array(json_object('filepath', raw.filepath, 'line', arguments.row, 'column', arguments.column))
FROM selection_arguments arguments
JOIN selections ON selections.id = arguments.selection_id
JOIN documents ON documents.id = arguments.document
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY arguments.selection_id, arguments.name
HAVING COUNT(*) > 1
UNION ALL
SELECT 'directive @' || directives.directive, arguments.name,
       json_group_array(json_object('filepath', raw.filepath, 'line', directives.row, 'column', directives.column))
FROM selection_directive_arguments arguments
JOIN selection_directives directives ON directives.id = arguments.parent
JOIN selection_refs refs ON refs.child_id = directives.selection_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY arguments.parent, arguments.name
HAVING COUNT(*) > 1
UNION ALL
SELECT 'directive @' || directives.directive, arguments.name,
       json_group_array(json_object('filepath', raw.filepath, 'line', directives.row, 'column', directives.column))
FROM document_directive_arguments arguments
JOIN document_directives directives ON directives.id = arguments.parent
JOIN documents ON documents.id = directives.document
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY arguments.parent, arguments.name
HAVING COUNT(*) > 1";

impl ValidationRule for DuplicateArgumentRuleImpl {
    fn name(&self) -> &'static str {
        "duplicate_argument"
    }

    fn description(&self) -> &'static str {
        "An argument can be provided at most once per field or directive"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let host: String = row.get(0)?;
            let argument: String = row.get(1)?;
            Ok(Diagnostic::validation(
                self.name(),
                format!("argument {argument} is provided more than once to {host}"),
            )
            .with_locations(locations_at(row, 2)?))
        })
    }
}
