use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `output_type_as_input` rule
pub struct OutputTypeAsInputRuleImpl;

/// Variables whose type is an output type, or no type at all
const QUERY: &str = "
SELECT operation_variables.name, operation_variables.type, types.kind,
       raw.filepath, operation_variables.row, operation_variables.column
FROM operation_variables
LEFT JOIN types ON types.name = operation_variables.type
JOIN documents ON documents.id = operation_variables.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE types.name IS NULL OR types.kind IN ('OBJECT', 'INTERFACE', 'UNION')";

impl ValidationRule for OutputTypeAsInputRuleImpl {
    fn name(&self) -> &'static str {
        "output_type_as_input"
    }

    fn description(&self) -> &'static str {
        "Variables must be declared with a known input type"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        ctx.query(QUERY, [], |row| {
            let name: String = row.get(0)?;
            let type_name: String = row.get(1)?;
            let kind: Option<String> = row.get(2)?;
            let message = match kind {
                Some(kind) => format!(
                    "variable ${name} cannot be of {} type {type_name}",
                    kind.to_lowercase()
                ),
                None => format!("variable ${name} has unknown type {type_name}"),
            };
            Ok(Diagnostic::validation(self.name(), message).with_location(location_at(row, 3)?))
        })
    }
}
