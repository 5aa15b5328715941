use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use apollo_compiler::ast;
use houdini_ir::Result;
use houdini_syntax::parse_value;
use houdini_types::Diagnostic;
use std::collections::HashSet;

/// Trait implementation for `duplicate_input_object_key` rule
pub struct DuplicateInputObjectKeyRuleImpl;

/// Argument values that contain an object literal
const QUERY: &str = "
SELECT arguments.name, arguments.value, raw.filepath, arguments.row, arguments.column
FROM selection_arguments arguments
JOIN documents ON documents.id = arguments.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE arguments.value LIKE '%{%'
UNION ALL
SELECT arguments.name, arguments.value, raw.filepath, instances.row, instances.column
FROM selection_directive_arguments arguments
JOIN selection_directives instances ON instances.id = arguments.parent
JOIN selection_refs refs ON refs.child_id = instances.selection_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE arguments.value LIKE '%{%'";

/// Paths of keys that appear more than once in the same object
fn duplicate_keys(value: &ast::Value, path: &str, found: &mut Vec<String>) {
    match value {
        ast::Value::Object(fields) => {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            for (name, field_value) in fields {
                let field_path = format!("{path}.{name}");
                if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
                    found.push(field_path.clone());
                }
                duplicate_keys(field_value, &field_path, found);
            }
        }
        ast::Value::List(items) => {
            for (position, item) in items.iter().enumerate() {
                duplicate_keys(item, &format!("{path}[{position}]"), found);
            }
        }
        _ => {}
    }
}

impl ValidationRule for DuplicateInputObjectKeyRuleImpl {
    fn name(&self) -> &'static str {
        "duplicate_input_object_key"
    }

    fn description(&self) -> &'static str {
        "Object literals cannot provide the same key twice"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let values = ctx.query(QUERY, [], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                location_at(row, 2)?,
            ))
        })?;

        let mut diagnostics = Vec::new();
        for (argument, value, location) in values {
            let Some(value) = parse_value(&value) else {
                continue;
            };
            let mut found = Vec::new();
            duplicate_keys(&value, &argument, &mut found);
            for path in found {
                diagnostics.push(
                    Diagnostic::validation(self.name(), format!("key {path} is provided more than once"))
                        .with_location(location.clone()),
                );
            }
        }
        Ok(diagnostics)
    }
}
