use apollo_compiler::ast;
use apollo_compiler::Node;
use std::collections::HashSet;

/// Parse a printed GraphQL value back into an AST value.
///
/// Argument values are stored in the IR in their printed form; rules that
/// need their structure re-parse them here. The text is parsed in the
/// position of a field argument, so variables are accepted.
#[must_use]
pub fn parse_value(text: &str) -> Option<Node<ast::Value>> {
    let wrapper = format!("{{ __value(value: {text}) }}");
    let document = ast::Document::parse(wrapper, "value.graphql").ok()?;
    document.definitions.iter().find_map(|definition| {
        let ast::Definition::OperationDefinition(operation) = definition else {
            return None;
        };
        let ast::Selection::Field(field) = operation.selection_set.first()? else {
            return None;
        };
        field.arguments.first().map(|argument| argument.value.clone())
    })
}

/// Content of a printed string literal (`"Avatar"` -> `Avatar`)
#[must_use]
pub fn unquote(text: &str) -> Option<String> {
    let value = parse_value(text)?;
    match &*value {
        ast::Value::String(value) => Some(value.clone()),
        _ => None,
    }
}

/// Recursively collect variable references from a value
pub fn collect_variables(value: &ast::Value, variables: &mut HashSet<String>) {
    match value {
        ast::Value::Variable(name) => {
            variables.insert(name.to_string());
        }
        ast::Value::List(items) => {
            for item in items {
                collect_variables(item, variables);
            }
        }
        ast::Value::Object(fields) => {
            for (_, field_value) in fields {
                collect_variables(field_value, variables);
            }
        }
        _ => {}
    }
}

/// Variable references inside a printed value
#[must_use]
pub fn variables_in(text: &str) -> HashSet<String> {
    let mut variables = HashSet::new();
    if let Some(value) = parse_value(text) {
        collect_variables(&value, &mut variables);
    }
    variables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar_values() {
        assert!(matches!(parse_value("1").as_deref(), Some(ast::Value::Int(_))));
        assert!(matches!(parse_value("1.5").as_deref(), Some(ast::Value::Float(_))));
        assert!(matches!(parse_value("true").as_deref(), Some(ast::Value::Boolean(true))));
        assert!(matches!(parse_value("null").as_deref(), Some(ast::Value::Null)));
        assert!(matches!(parse_value("RED").as_deref(), Some(ast::Value::Enum(_))));
        assert!(matches!(parse_value("$id").as_deref(), Some(ast::Value::Variable(_))));
    }

    #[test]
    fn test_parse_structured_value() {
        let value = parse_value(r#"{a: 1, b: ["x", $y]}"#).unwrap();
        let ast::Value::Object(fields) = value.as_ref() else {
            panic!("expected an object");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0.as_str(), "a");
    }

    #[test]
    fn test_parse_invalid_value() {
        assert!(parse_value("{a: }").is_none());
        assert!(parse_value("").is_none());
    }

    #[test]
    fn test_printed_value_parses_back() {
        let value = parse_value(r#"{a: [1, 2], b: "c"}"#).unwrap();
        let printed = value.to_string();
        assert_eq!(parse_value(&printed).unwrap().to_string(), printed);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"Avatar\"").as_deref(), Some("Avatar"));
        assert_eq!(unquote("Avatar"), None);
    }

    #[test]
    fn test_variables_in() {
        let variables = variables_in(r#"{filter: {ids: [$a, $b]}, first: $c, name: "$d"}"#);
        let mut names: Vec<_> = variables.into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
