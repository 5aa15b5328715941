use crate::query::{location_at, with_suggestion};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `unknown_field` rule
pub struct UnknownFieldRuleImpl;

/// Fields whose enclosing type is known (the loader stored a `Parent.field`
/// id) but that the type does not define. Children of such a field have no
/// id, so only the outermost miss is reported.
const QUERY: &str = "
SELECT selections.field_name,
       substr(selections.type, 1, instr(selections.type, '.') - 1) AS parent,
       EXISTS (SELECT 1 FROM types WHERE types.name = substr(selections.type, 1, instr(selections.type, '.') - 1)),
       raw.filepath, refs.row, refs.column
FROM selections
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'field'
  AND selections.type IS NOT NULL
  AND NOT EXISTS (SELECT 1 FROM type_fields WHERE type_fields.id = selections.type)";

const FIELDS: &str = "SELECT name FROM type_fields WHERE parent = ?1 AND internal = 0";

impl ValidationRule for UnknownFieldRuleImpl {
    fn name(&self) -> &'static str {
        "unknown_field"
    }

    fn description(&self) -> &'static str {
        "Selected fields must be defined on their parent type"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let rows = ctx.query(QUERY, [], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                location_at(row, 3)?,
            ))
        })?;

        let mut diagnostics = Vec::with_capacity(rows.len());
        for (field, parent, parent_exists, location) in rows {
            let message = if parent_exists {
                let candidates = ctx.query(FIELDS, [&parent], |row| row.get::<_, String>(0))?;
                with_suggestion(
                    format!("{parent} has no field {field}"),
                    &field,
                    candidates.iter().map(String::as_str),
                )
            } else {
                format!("cannot select {field}: type {parent} is not defined")
            };
            diagnostics.push(Diagnostic::validation(self.name(), message).with_location(location));
        }
        Ok(diagnostics)
    }
}
