use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `subscription_single_root` rule
pub struct SubscriptionSingleRootRuleImpl;

/// Root selections of every subscription, looking through inline fragments
/// and fragment spreads, counted by response name
const QUERY: &str = "
WITH RECURSIVE roots(subscription, selection) AS (
    SELECT documents.id, refs.child_id
    FROM documents
    JOIN selection_refs refs ON refs.document = documents.id AND refs.parent_id IS NULL
    WHERE documents.kind = 'subscription'
    UNION
    SELECT roots.subscription, children.child_id
    FROM roots
    JOIN selections ON selections.id = roots.selection
    JOIN selection_refs children ON children.parent_id = selections.id
    WHERE selections.kind = 'inline_fragment'
    UNION
    SELECT roots.subscription, refs.child_id
    FROM roots
    JOIN selections ON selections.id = roots.selection
    JOIN documents fragments ON fragments.name = selections.field_name AND fragments.kind = 'fragment'
    JOIN selection_refs refs ON refs.document = fragments.id AND refs.parent_id IS NULL
    WHERE selections.kind = 'fragment'
)
SELECT documents.name,
       COUNT(DISTINCT COALESCE(selections.alias, selections.field_name)) AS fields,
       raw.filepath, documents.row, documents.column
FROM documents
JOIN raw_documents raw ON raw.id = documents.raw_document
LEFT JOIN roots ON roots.subscription = documents.id
LEFT JOIN selections ON selections.id = roots.selection AND selections.kind = 'field'
WHERE documents.kind = 'subscription'
GROUP BY documents.id
HAVING fields != 1";

impl ValidationRule for SubscriptionSingleRootRuleImpl {
    fn name(&self) -> &'static str {
        "subscription_single_root"
    }

    fn description(&self) -> &'static str {
        "Subscriptions must select exactly one root field"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let name: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok(Diagnostic::validation(
                self.name(),
                format!("subscription {name} must select exactly one root field, found {count}"),
            )
            .with_location(location_at(row, 2)?))
        })
    }
}
