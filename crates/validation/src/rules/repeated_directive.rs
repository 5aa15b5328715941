use crate::query::locations_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `repeated_directive` rule
pub struct RepeatedDirectiveRuleImpl;

/// Non-repeatable directives used more than once on the same host
const QUERY: &str = "
SELECT instances.directive,
       json_group_array(json_object('filepath', raw.filepath, 'line', instances.row, 'column', instances.column))
FROM selection_directives instances
JOIN directives ON directives.name = instances.directive AND directives.repeatable = 0
JOIN selection_refs refs ON refs.child_id = instances.selection_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY instances.selection_id, instances.directive
HAVING COUNT(*) > 1
UNION ALL
SELECT instances.directive,
       json_group_array(json_object('filepath', raw.filepath, 'line', instances.row, 'column', instances.column))
FROM document_directives instances
JOIN directives ON directives.name = instances.directive AND directives.repeatable = 0
JOIN documents ON documents.id = instances.document
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY instances.document, instances.directive
HAVING COUNT(*) > 1
UNION ALL
SELECT instances.directive,
       json_group_array(json_object('filepath', raw.filepath, 'line', instances.row, 'column', instances.column))
FROM operation_variable_directives instances
JOIN directives ON directives.name = instances.directive AND directives.repeatable = 0
JOIN operation_variables variables ON variables.id = instances.parent
JOIN documents ON documents.id = variables.document
JOIN raw_documents raw ON raw.id = documents.raw_document
GROUP BY instances.parent, instances.directive
HAVING COUNT(*) > 1";

impl ValidationRule for RepeatedDirectiveRuleImpl {
    fn name(&self) -> &'static str {
        "repeated_directive"
    }

    fn description(&self) -> &'static str {
        "Non-repeatable directives can be used at most once per location"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let name: String = row.get(0)?;
            Ok(Diagnostic::validation(
                self.name(),
                format!("directive @{name} can only be used once at this location"),
            )
            .with_locations(locations_at(row, 1)?))
        })
    }
}
