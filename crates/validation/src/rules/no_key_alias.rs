use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `no_key_alias` rule
pub struct NoKeyAliasRuleImpl;

/// Resolved fields aliased to something other than their own name
const QUERY: &str = "
SELECT selections.alias, selections.field_name, type_fields.parent,
       raw.filepath, refs.row, refs.column
FROM selections
JOIN type_fields ON type_fields.id = selections.type
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'field'
  AND selections.alias IS NOT NULL
  AND selections.alias != selections.field_name";

impl ValidationRule for NoKeyAliasRuleImpl {
    fn name(&self) -> &'static str {
        "no_key_alias"
    }

    fn description(&self) -> &'static str {
        "Aliases cannot reuse the name of a key field of the parent type"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let aliased = ctx.query(QUERY, [], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                location_at(row, 3)?,
            ))
        })?;

        let config = ctx.config();
        Ok(aliased
            .into_iter()
            .filter(|(alias, _, parent, _)| config.keys_for_type(parent).contains(alias))
            .map(|(alias, field, parent, location)| {
                Diagnostic::validation(
                    self.name(),
                    format!(
                        "alias {alias} for {parent}.{field} collides with the key field {alias} of {parent}"
                    ),
                )
                .with_location(location)
            })
            .collect())
    }
}
