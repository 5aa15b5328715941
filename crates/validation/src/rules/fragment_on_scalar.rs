use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `fragment_on_scalar` rule
pub struct FragmentOnScalarRuleImpl;

const QUERY: &str = "
SELECT documents.name, types.name, types.kind, raw.filepath, documents.row, documents.column
FROM documents
JOIN types ON types.name = documents.type_condition
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE documents.kind = 'fragment'
  AND types.kind NOT IN ('OBJECT', 'INTERFACE', 'UNION')
UNION ALL
SELECT NULL, types.name, types.kind, raw.filepath, refs.row, refs.column
FROM selections
JOIN types ON types.name = selections.field_name
JOIN selection_refs refs ON refs.child_id = selections.id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selections.kind = 'inline_fragment'
  AND types.kind NOT IN ('OBJECT', 'INTERFACE', 'UNION')";

impl ValidationRule for FragmentOnScalarRuleImpl {
    fn name(&self) -> &'static str {
        "fragment_on_scalar"
    }

    fn description(&self) -> &'static str {
        "Fragments can only be declared on objects, interfaces and unions"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let fragment: Option<String> = row.get(0)?;
            let type_name: String = row.get(1)?;
            let kind: String = row.get(2)?;
            let subject = match fragment {
                Some(fragment) => format!("fragment {fragment}"),
                None => "inline fragment".to_string(),
            };
            Ok(Diagnostic::validation(
                self.name(),
                format!(
                    "{subject} cannot be declared on {} type {type_name}",
                    kind.to_lowercase()
                ),
            )
            .with_location(location_at(row, 3)?))
        })
    }
}
