//! Tests for writing schemas into the IR

use houdini_config::ProjectConfig;
use houdini_ir::IrStore;
use houdini_schema::{import_schema, import_schema_file, SchemaError};
use rusqlite::{params, Connection, OptionalExtension};

const SCHEMA: &str = r#"
type Query {
    user(id: ID!, filter: UserFilter): User
    node(id: ID!): Node
    search(term: String = "all"): [SearchResult!]!
}

type Mutation {
    rename(id: ID!, name: String!): User
}

interface Node {
    id: ID!
}

type User implements Node {
    id: ID!
    name: String
    friends(first: Int): [[User]]!
    status: Status
}

type Post implements Node {
    id: ID!
    title: String!
}

union SearchResult = User | Post

enum Status {
    ACTIVE
    BANNED
}

input UserFilter {
    name: String
    status: Status = ACTIVE
    ids: [ID!]
}

directive @tag(name: String!) repeatable on FIELD | QUERY
"#;

fn imported() -> IrStore {
    let store = IrStore::in_memory(1).unwrap();
    import_schema(&store, SCHEMA, "schema.graphql").unwrap();
    store
}

fn field(conn: &Connection, id: &str) -> Option<(String, String, bool)> {
    conn.query_row(
        "SELECT type, type_modifiers, internal FROM type_fields WHERE id = ?1",
        params![id],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .optional()
    .unwrap()
}

fn strings(conn: &Connection, sql: &str) -> Vec<String> {
    let mut stmt = conn.prepare(sql).unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<Vec<String>>>()
        .unwrap()
}

// ============================================================================
// Types and fields
// ============================================================================

#[test]
fn test_type_kinds() {
    let store = imported();
    let conn = store.get().unwrap();

    let kind = |name: &str| -> String {
        conn.query_row("SELECT kind FROM types WHERE name = ?1", params![name], |row| row.get(0))
            .unwrap()
    };
    assert_eq!(kind("User"), "OBJECT");
    assert_eq!(kind("Node"), "INTERFACE");
    assert_eq!(kind("SearchResult"), "UNION");
    assert_eq!(kind("Status"), "ENUM");
    assert_eq!(kind("UserFilter"), "INPUT");
    assert_eq!(kind("ID"), "SCALAR");
}

#[test]
fn test_introspection_types_are_internal() {
    let store = imported();
    let conn = store.get().unwrap();

    let internal: bool = conn
        .query_row("SELECT internal FROM types WHERE name = '__Schema'", [], |row| row.get(0))
        .unwrap();
    assert!(internal);
}

#[test]
fn test_field_modifiers() {
    let store = imported();
    let conn = store.get().unwrap();

    assert_eq!(field(&conn, "User.id"), Some(("ID".into(), "!".into(), false)));
    assert_eq!(field(&conn, "User.name"), Some(("String".into(), String::new(), false)));
    assert_eq!(field(&conn, "User.friends"), Some(("User".into(), "]]!".into(), false)));
    assert_eq!(
        field(&conn, "Query.search"),
        Some(("SearchResult".into(), "!]!".into(), false))
    );
}

#[test]
fn test_modifiers_tell_list_and_item_non_null_apart() {
    let store = IrStore::in_memory(1).unwrap();
    import_schema(
        &store,
        "type Query { a: [ID]! b: [ID!] c: [[Boolean]]! d: [[Int!]!] }",
        "schema.graphql",
    )
    .unwrap();
    let conn = store.get().unwrap();

    let modifiers = strings(
        &conn,
        "SELECT name || '=' || type_modifiers FROM type_fields WHERE parent = 'Query' AND internal = 0 ORDER BY name",
    );
    assert_eq!(modifiers, vec!["a=]!", "b=!]", "c=]]!", "d=!]!]"]);
}

#[test]
fn test_typename_on_composite_types() {
    let store = imported();
    let conn = store.get().unwrap();

    for parent in ["User", "Node", "SearchResult", "Query"] {
        assert_eq!(
            field(&conn, &format!("{parent}.__typename")),
            Some(("String".into(), "!".into(), true)),
            "{parent}"
        );
    }
    assert_eq!(field(&conn, "UserFilter.__typename"), None);
    assert_eq!(field(&conn, "Status.__typename"), None);
}

#[test]
fn test_arguments_and_defaults() {
    let store = imported();
    let conn = store.get().unwrap();

    let (ty, modifiers, default): (String, String, Option<String>) = conn
        .query_row(
            "SELECT type, type_modifiers, default_value FROM field_argument_definitions WHERE field = 'Query.search' AND name = 'term'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(ty, "String");
    assert_eq!(modifiers, "");
    assert_eq!(default.as_deref(), Some("\"all\""));

    let input_default: Option<String> = conn
        .query_row(
            "SELECT default_value FROM type_fields WHERE id = 'UserFilter.status'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(input_default.as_deref(), Some("ACTIVE"));
}

#[test]
fn test_enum_values() {
    let store = imported();
    let conn = store.get().unwrap();

    let values = strings(&conn, "SELECT value FROM enum_values WHERE parent = 'Status' ORDER BY value");
    assert_eq!(values, vec!["ACTIVE", "BANNED"]);
}

// ============================================================================
// Possible types
// ============================================================================

#[test]
fn test_possible_types() {
    let store = imported();
    let conn = store.get().unwrap();

    let node = strings(&conn, "SELECT member FROM possible_types WHERE type = 'Node' ORDER BY member");
    assert_eq!(node, vec!["Post", "User"]);

    let search = strings(
        &conn,
        "SELECT member FROM possible_types WHERE type = 'SearchResult' ORDER BY member",
    );
    assert_eq!(search, vec!["Post", "User"]);
}

// ============================================================================
// Directives and roots
// ============================================================================

#[test]
fn test_user_directive() {
    let store = imported();
    let conn = store.get().unwrap();

    let (repeatable, internal): (bool, bool) = conn
        .query_row(
            "SELECT repeatable, internal FROM directives WHERE name = 'tag'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(repeatable);
    assert!(!internal);

    let locations = strings(
        &conn,
        "SELECT location FROM directive_locations WHERE directive = 'tag' ORDER BY location",
    );
    assert_eq!(locations, vec!["FIELD", "QUERY"]);
}

#[test]
fn test_built_in_directives() {
    let store = imported();
    let conn = store.get().unwrap();

    let names = strings(&conn, "SELECT name FROM directives");
    for expected in ["skip", "include", "deprecated"] {
        assert!(names.iter().any(|name| name == expected), "missing @{expected}");
    }
}

#[test]
fn test_framework_definitions() {
    let store = imported();
    let conn = store.get().unwrap();

    let component: String = conn
        .query_row("SELECT kind FROM types WHERE name = 'Component'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(component, "SCALAR");

    let (internal, visible): (bool, bool) = conn
        .query_row(
            "SELECT internal, visible FROM directives WHERE name = '__houdini__runtimeScalar'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(internal);
    assert!(!visible);

    let arguments = strings(
        &conn,
        "SELECT name || ':' || type || type_modifiers FROM directive_arguments WHERE parent = 'componentField' ORDER BY name",
    );
    assert_eq!(arguments, vec!["field:String!", "prop:String"]);
}

#[test]
fn test_user_definition_wins_over_framework() {
    let schema = "type Query { a: Int }\ndirective @list(name: String) on FIELD";
    let store = IrStore::in_memory(1).unwrap();
    import_schema(&store, schema, "schema.graphql").unwrap();
    let conn = store.get().unwrap();

    let (internal, modifiers): (bool, String) = conn
        .query_row(
            "SELECT d.internal, a.type_modifiers FROM directives d JOIN directive_arguments a ON a.parent = d.name WHERE d.name = 'list'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(!internal);
    assert_eq!(modifiers, "");
}

#[test]
fn test_schema_without_boolean_or_int() {
    // the framework directives take Boolean and Int arguments
    let store = IrStore::in_memory(1).unwrap();
    import_schema(&store, "type Query { a: String }", "schema.graphql").unwrap();
    let conn = store.get().unwrap();

    let scalars = strings(
        &conn,
        "SELECT name FROM types WHERE name IN ('Int', 'Float', 'String', 'Boolean', 'ID') AND kind = 'SCALAR' ORDER BY name",
    );
    assert_eq!(scalars, vec!["Boolean", "Float", "ID", "Int", "String"]);

    let loading = strings(
        &conn,
        "SELECT name || ':' || type FROM directive_arguments WHERE parent = 'loading' ORDER BY name",
    );
    assert_eq!(loading, vec!["cascade:Boolean", "count:Int"]);
}

#[test]
fn test_minimal_user_schema() {
    let schema = "type Query { user(id: ID!): User }\ntype User { id: ID name: String }";
    let store = IrStore::in_memory(1).unwrap();
    import_schema(&store, schema, "schema.graphql").unwrap();
    let conn = store.get().unwrap();

    assert_eq!(
        field(&conn, "User.name"),
        Some(("String".to_string(), String::new(), false))
    );
    let boolean: bool = conn
        .query_row("SELECT internal FROM types WHERE name = 'Boolean'", [], |row| row.get(0))
        .unwrap();
    assert!(!boolean);
}

#[test]
fn test_operation_types() {
    let store = imported();
    let conn = store.get().unwrap();

    let roots = strings(
        &conn,
        "SELECT operation || '=' || type FROM operation_types ORDER BY operation",
    );
    assert_eq!(roots, vec!["mutation=Mutation", "query=Query"]);
}

#[test]
fn test_custom_root_types() {
    let schema = "schema { query: Root }\ntype Root { a: Int }";
    let store = IrStore::in_memory(1).unwrap();
    import_schema(&store, schema, "schema.graphql").unwrap();
    let conn = store.get().unwrap();

    let root: String = conn
        .query_row("SELECT type FROM operation_types WHERE operation = 'query'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(root, "Root");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_invalid_schema_is_reported() {
    let store = IrStore::in_memory(1).unwrap();
    let result = import_schema(&store, "type Query { a: Missing }", "schema.graphql");
    assert!(matches!(result, Err(SchemaError::Invalid(_))));

    // nothing was written
    let count: i64 = store
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM types", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_import_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("schema.graphql"), "type Query { a: Int }").unwrap();

    let store = IrStore::in_memory(1).unwrap();
    let summary = import_schema_file(&store, &ProjectConfig::new(dir.path())).unwrap();
    assert!(summary.types > 0);
    assert!(summary.fields >= 1);
}

#[test]
fn test_missing_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = IrStore::in_memory(1).unwrap();
    let result = import_schema_file(&store, &ProjectConfig::new(dir.path()));
    assert!(matches!(result, Err(SchemaError::Io { .. })));
}
