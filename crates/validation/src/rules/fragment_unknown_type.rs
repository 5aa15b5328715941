use crate::query::{location_at, with_suggestion};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `fragment_unknown_type` rule
pub struct FragmentUnknownTypeRuleImpl;

/// Named fragments first, then inline fragments with a type condition
const QUERY: &str = "
SELECT documents.name, documents.type_condition, raw.filepath, documents.row, documents.column
FROM documents
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE documents.kind = 'fragment'
  AND documents.type_condition NOT IN (SELECT name FROM types)
UNION ALL
SELECT NULL, selections.field_name, raw.filepath, refs.row, refs.column
FROM selections
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'inline_fragment'
  AND selections.field_name != 'inline_fragment'
  AND selections.field_name NOT IN (SELECT name FROM types)";

const COMPOSITE_TYPES: &str =
    "SELECT name FROM types WHERE kind IN ('OBJECT', 'INTERFACE', 'UNION') AND internal = 0";

impl ValidationRule for FragmentUnknownTypeRuleImpl {
    fn name(&self) -> &'static str {
        "fragment_unknown_type"
    }

    fn description(&self) -> &'static str {
        "Fragment type conditions must name a type defined by the schema"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let unknown = ctx.query(QUERY, [], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, String>(1)?,
                location_at(row, 2)?,
            ))
        })?;
        if unknown.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = ctx.query(COMPOSITE_TYPES, [], |row| row.get::<_, String>(0))?;
        Ok(unknown
            .into_iter()
            .map(|(fragment, type_condition, location)| {
                let message = match fragment {
                    Some(fragment) => {
                        format!("fragment {fragment} is declared on unknown type {type_condition}")
                    }
                    None => format!("inline fragment is declared on unknown type {type_condition}"),
                };
                let message = with_suggestion(
                    message,
                    &type_condition,
                    candidates.iter().map(String::as_str),
                );
                Diagnostic::validation(self.name(), message).with_location(location)
            })
            .collect())
    }
}
