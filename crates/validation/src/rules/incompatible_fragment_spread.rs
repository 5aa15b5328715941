use crate::query::{location_at, SchemaIndex, ENCLOSING_TYPES};
use crate::{RuleContext, ValidationRule};
use houdini_ir::{Result, TypeKind};
use houdini_types::Diagnostic;

/// Trait implementation for `incompatible_fragment_spread` rule
pub struct IncompatibleFragmentSpreadRuleImpl;

/// Every spread and typed inline fragment with the type it appears in and
/// the type it asserts
const SELECT: &str = "
SELECT selections.kind, selections.field_name, enclosing.type,
       CASE WHEN selections.kind = 'fragment'
            THEN (SELECT target.type_condition FROM documents target
                  WHERE target.kind = 'fragment' AND target.name = selections.field_name
                  ORDER BY target.id LIMIT 1)
            ELSE selections.field_name
       END,
       raw.filepath, refs.row, refs.column
FROM enclosing
JOIN selections ON selections.id = enclosing.selection
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE enclosing.type IS NOT NULL
  AND (selections.kind = 'fragment'
       OR (selections.kind = 'inline_fragment' AND selections.field_name != 'inline_fragment'))";

impl ValidationRule for IncompatibleFragmentSpreadRuleImpl {
    fn name(&self) -> &'static str {
        "incompatible_fragment_spread"
    }

    fn description(&self) -> &'static str {
        "Fragments can only be spread where their type can apply"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let sql = format!("{ENCLOSING_TYPES}\n{SELECT}");
        let spreads = ctx.query(&sql, [], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                location_at(row, 4)?,
            ))
        })?;
        if spreads.is_empty() {
            return Ok(Vec::new());
        }

        let index = SchemaIndex::load(ctx)?;
        let composite = |name: &str| index.kind(name).is_some_and(TypeKind::is_composite);

        let mut diagnostics = Vec::new();
        for (kind, name, parent, target, location) in spreads {
            // unknown fragments and non-composite types have rules of their own
            let Some(target) = target else { continue };
            if !composite(&parent) || !composite(&target) || index.overlaps(&parent, &target) {
                continue;
            }

            let message = if kind == "fragment" {
                format!(
                    "fragment {name} cannot be spread here: {parent} can never be of type {target}"
                )
            } else {
                format!("inline fragment on {target} can never match type {parent}")
            };
            diagnostics.push(Diagnostic::validation(self.name(), message).with_location(location));
        }
        Ok(diagnostics)
    }
}
