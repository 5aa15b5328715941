use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_schema::COMPONENT_FIELD_DIRECTIVE;
use houdini_types::{Diagnostic, TypeModifiers};

/// Trait implementation for `missing_required_argument` rule
pub struct MissingRequiredArgumentRuleImpl;

/// Non-null arguments without a default that a field or directive use omits.
/// `@componentField` is checked by the component field rewrite.
const QUERY: &str = "
SELECT 'field ' || selections.field_name, definitions.name, definitions.type, definitions.type_modifiers,
       raw.filepath, refs.row, refs.column
FROM selections
JOIN field_argument_definitions definitions ON definitions.field = selections.type
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'field'
  AND substr(definitions.type_modifiers, -1) = '!'
  AND definitions.default_value IS NULL
  AND NOT EXISTS (
      SELECT 1 FROM selection_arguments arguments
      WHERE arguments.selection_id = selections.id AND arguments.name = definitions.name
  )
UNION ALL
SELECT 'directive @' || instances.directive, definitions.name, definitions.type, definitions.type_modifiers,
       raw.filepath, instances.row, instances.column
FROM selection_directives instances
JOIN directive_arguments definitions ON definitions.parent = instances.directive
JOIN selection_refs refs ON refs.child_id = instances.selection_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE instances.directive != ?1
  AND substr(definitions.type_modifiers, -1) = '!'
  AND definitions.default_value IS NULL
  AND NOT EXISTS (
      SELECT 1 FROM selection_directive_arguments arguments
      WHERE arguments.parent = instances.id AND arguments.name = definitions.name
  )
UNION ALL
SELECT 'directive @' || instances.directive, definitions.name, definitions.type, definitions.type_modifiers,
       raw.filepath, instances.row, instances.column
FROM document_directives instances
JOIN directive_arguments definitions ON definitions.parent = instances.directive
JOIN documents ON documents.id = instances.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE instances.directive != ?1
  AND substr(definitions.type_modifiers, -1) = '!'
  AND definitions.default_value IS NULL
  AND NOT EXISTS (
      SELECT 1 FROM document_directive_arguments arguments
      WHERE arguments.parent = instances.id AND arguments.name = definitions.name
  )";

impl ValidationRule for MissingRequiredArgumentRuleImpl {
    fn name(&self) -> &'static str {
        "missing_required_argument"
    }

    fn description(&self) -> &'static str {
        "Required arguments without a default must be provided"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [COMPONENT_FIELD_DIRECTIVE], |row| {
            let host: String = row.get(0)?;
            let argument: String = row.get(1)?;
            let type_name: String = row.get(2)?;
            let modifiers: String = row.get(3)?;
            let expected = TypeModifiers::parse(&modifiers)
                .map_or_else(|| format!("{type_name}{modifiers}"), |m| m.wrap(&type_name));
            Ok(Diagnostic::validation(
                self.name(),
                format!("{host} requires argument {argument} of type {expected}"),
            )
            .with_location(location_at(row, 4)?))
        })
    }
}
