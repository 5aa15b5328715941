use apollo_compiler::ast;
use houdini_types::TypeModifiers;

/// Split a type reference into its named type and its modifier string.
///
/// `[User!]!` becomes `("User", "!]!")`.
#[must_use]
pub fn split_type(ty: &ast::Type) -> (String, TypeModifiers) {
    let mut suffix = String::new();
    push_suffix(ty, &mut suffix);
    let modifiers = TypeModifiers::parse(&suffix).unwrap_or_default();
    (ty.inner_named_type().to_string(), modifiers)
}

fn push_suffix(ty: &ast::Type, suffix: &mut String) {
    match ty {
        ast::Type::Named(_) => {}
        ast::Type::NonNullNamed(_) => suffix.push('!'),
        ast::Type::List(inner) => {
            push_suffix(inner, suffix);
            suffix.push(']');
        }
        ast::Type::NonNullList(inner) => {
            push_suffix(inner, suffix);
            suffix.push_str("]!");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    fn variable_type(source: &str) -> (String, String) {
        let parsed = parse_document(source, "a.graphql").unwrap();
        let ast::Definition::OperationDefinition(operation) = &parsed.ast().definitions[0] else {
            panic!("expected an operation");
        };
        let (base, modifiers) = split_type(&operation.variables[0].ty);
        (base, modifiers.into_string())
    }

    #[test]
    fn test_split_named_types() {
        assert_eq!(variable_type("query A($a: ID) { a }"), ("ID".into(), String::new()));
        assert_eq!(variable_type("query A($a: ID!) { a }"), ("ID".into(), "!".into()));
    }

    #[test]
    fn test_split_list_types() {
        assert_eq!(variable_type("query A($a: [ID!]!) { a }"), ("ID".into(), "!]!".into()));
        assert_eq!(variable_type("query A($a: [ID]!) { a }"), ("ID".into(), "]!".into()));
        assert_eq!(
            variable_type("query A($a: [[Boolean]]!) { a }"),
            ("Boolean".into(), "]]!".into())
        );
    }

    #[test]
    fn test_nested_list_depth() {
        let parsed = parse_document("query A($a: [[Boolean]]!) { a }", "a.graphql").unwrap();
        let ast::Definition::OperationDefinition(operation) = &parsed.ast().definitions[0] else {
            panic!("expected an operation");
        };
        let (_, modifiers) = split_type(&operation.variables[0].ty);
        assert_eq!(modifiers.list_depth(), 2);
        assert!(modifiers.is_non_null());
        assert_eq!(modifiers.wrap("Boolean"), "[[Boolean]]!");
    }
}
