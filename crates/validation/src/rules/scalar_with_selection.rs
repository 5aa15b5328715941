use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `scalar_with_selection` rule
pub struct ScalarWithSelectionRuleImpl;

/// Resolved leaf fields that have children
const QUERY: &str = "
SELECT selections.field_name, type_fields.type, raw.filepath, refs.row, refs.column
FROM selections
JOIN type_fields ON type_fields.id = selections.type
JOIN types ON types.name = type_fields.type
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'field'
  AND types.kind IN ('SCALAR', 'ENUM')
  AND EXISTS (SELECT 1 FROM selection_refs children WHERE children.parent_id = selections.id)";

impl ValidationRule for ScalarWithSelectionRuleImpl {
    fn name(&self) -> &'static str {
        "scalar_with_selection"
    }

    fn description(&self) -> &'static str {
        "Scalar and enum fields cannot have a selection set"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let field: String = row.get(0)?;
            let type_name: String = row.get(1)?;
            Ok(Diagnostic::validation(
                self.name(),
                format!("field {field} of type {type_name} cannot have a selection set"),
            )
            .with_location(location_at(row, 2)?))
        })
    }
}
