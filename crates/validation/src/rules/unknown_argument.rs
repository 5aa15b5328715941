use crate::query::{location_at, with_suggestion};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `unknown_argument` rule
pub struct UnknownArgumentRuleImpl;

/// Arguments of resolved fields and known directives that have no
/// definition. The fragment argument directives accept any argument name.
const QUERY: &str = "
SELECT 'field', selections.type, selections.field_name, arguments.name,
       raw.filepath, arguments.row, arguments.column
FROM selection_arguments arguments
JOIN selections ON selections.id = arguments.selection_id
JOIN type_fields ON type_fields.id = selections.type
JOIN documents ON documents.id = arguments.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE NOT EXISTS (
    SELECT 1 FROM field_argument_definitions definitions
    WHERE definitions.field = selections.type AND definitions.name = arguments.name
)
UNION ALL
SELECT 'directive', directives.name, directives.name, arguments.name,
       raw.filepath, instances.row, instances.column
FROM selection_directive_arguments arguments
JOIN selection_directives instances ON instances.id = arguments.parent
JOIN directives ON directives.name = instances.directive
JOIN selection_refs refs ON refs.child_id = instances.selection_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE directives.name NOT IN ('arguments', 'with', 'when', 'when_not')
  AND NOT EXISTS (
      SELECT 1 FROM directive_arguments definitions
      WHERE definitions.parent = directives.name AND definitions.name = arguments.name
  )
UNION ALL
SELECT 'directive', directives.name, directives.name, arguments.name,
       raw.filepath, instances.row, instances.column
FROM document_directive_arguments arguments
JOIN document_directives instances ON instances.id = arguments.parent
JOIN directives ON directives.name = instances.directive
JOIN documents ON documents.id = instances.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE directives.name NOT IN ('arguments', 'with', 'when', 'when_not')
  AND NOT EXISTS (
      SELECT 1 FROM directive_arguments definitions
      WHERE definitions.parent = directives.name AND definitions.name = arguments.name
  )";

const FIELD_ARGUMENTS: &str = "SELECT name FROM field_argument_definitions WHERE field = ?1";
const DIRECTIVE_ARGUMENTS: &str = "SELECT name FROM directive_arguments WHERE parent = ?1";

impl ValidationRule for UnknownArgumentRuleImpl {
    fn name(&self) -> &'static str {
        "unknown_argument"
    }

    fn description(&self) -> &'static str {
        "Arguments must be defined by the field or directive they are passed to"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let rows = ctx.query(QUERY, [], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                location_at(row, 4)?,
            ))
        })?;

        let mut diagnostics = Vec::with_capacity(rows.len());
        for (host, id, name, argument, location) in rows {
            let (message, definitions) = if host == "field" {
                (
                    format!("field {name} has no argument {argument}"),
                    FIELD_ARGUMENTS,
                )
            } else {
                (
                    format!("directive @{name} has no argument {argument}"),
                    DIRECTIVE_ARGUMENTS,
                )
            };
            let candidates = ctx.query(definitions, [&id], |row| row.get::<_, String>(0))?;
            let message = with_suggestion(message, &argument, candidates.iter().map(String::as_str));
            diagnostics.push(Diagnostic::validation(self.name(), message).with_location(location));
        }
        Ok(diagnostics)
    }
}
