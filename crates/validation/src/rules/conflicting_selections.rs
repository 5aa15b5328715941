use crate::query::{locations_at, strings_at};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `conflicting_selections` rule
pub struct ConflictingSelectionsRuleImpl;

/// Sibling fields that share a response name but select different fields
/// or resolve to different types
const QUERY: &str = "
SELECT COALESCE(selections.alias, selections.field_name) AS response,
       json_group_array(DISTINCT selections.field_name || ': ' || COALESCE(type_fields.type, '?')),
       json_group_array(json_object('filepath', raw.filepath, 'line', refs.row, 'column', refs.column))
FROM selections
JOIN selection_refs refs ON refs.child_id = selections.id
LEFT JOIN type_fields ON type_fields.id = selections.type
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'field'
GROUP BY refs.document, refs.parent_id, response
HAVING COUNT(DISTINCT selections.field_name) > 1 OR COUNT(DISTINCT type_fields.type) > 1";

impl ValidationRule for ConflictingSelectionsRuleImpl {
    fn name(&self) -> &'static str {
        "conflicting_selections"
    }

    fn description(&self) -> &'static str {
        "Fields sharing a response name must select the same field with the same type"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let response: String = row.get(0)?;
            let fields = strings_at(row, 1)?;
            Ok(Diagnostic::validation(
                self.name(),
                format!(
                    "selections named {response} conflict: {}",
                    fields.join(" and ")
                ),
            )
            .with_locations(locations_at(row, 2)?))
        })
    }
}
