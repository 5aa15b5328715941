use crate::query::{location_at, with_suggestion};
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `unknown_fragment` rule
pub struct UnknownFragmentRuleImpl;

const QUERY: &str = "
SELECT selections.field_name, raw.filepath, refs.row, refs.column
FROM selections
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'fragment'
  AND NOT EXISTS (
      SELECT 1 FROM documents target
      WHERE target.kind = 'fragment' AND target.name = selections.field_name
  )";

const FRAGMENTS: &str = "SELECT DISTINCT name FROM documents WHERE kind = 'fragment'";

impl ValidationRule for UnknownFragmentRuleImpl {
    fn name(&self) -> &'static str {
        "unknown_fragment"
    }

    fn description(&self) -> &'static str {
        "Fragment spreads must refer to a fragment defined in the project"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let spreads = ctx.query(QUERY, [], |row| {
            Ok((row.get::<_, String>(0)?, location_at(row, 1)?))
        })?;
        if spreads.is_empty() {
            return Ok(Vec::new());
        }

        let fragments = ctx.query(FRAGMENTS, [], |row| row.get::<_, String>(0))?;
        Ok(spreads
            .into_iter()
            .map(|(name, location)| {
                let message = with_suggestion(
                    format!("unknown fragment {name}"),
                    &name,
                    fragments.iter().map(String::as_str),
                );
                Diagnostic::validation(self.name(), message).with_location(location)
            })
            .collect())
    }
}
