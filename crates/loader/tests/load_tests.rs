//! Tests for loading raw documents into the IR

use houdini_ir::{insert_raw_document, register_inline_component_field, Cancellation, IrStore};
use houdini_loader::{load_documents, load_documents_with, LoadOptions};
use houdini_schema::import_schema;
use houdini_types::{DiagnosticKind, DiagnosticSink, SourceOffset};
use rusqlite::{params, Connection};

const SCHEMA: &str = r"
type Query {
    user(id: ID!): User
    users(first: Int): [User!]!
}

type User {
    id: ID!
    name: String
    avatar: String
    friends: [User!]!
}
";

fn store(documents: &[(&str, &str, SourceOffset)]) -> IrStore {
    let store = IrStore::in_memory(4).unwrap();
    import_schema(&store, SCHEMA, "schema.graphql").unwrap();
    let conn = store.get().unwrap();
    for (filepath, content, offset) in documents {
        insert_raw_document(&conn, filepath, content, *offset).unwrap();
    }
    store
}

fn load(store: &IrStore) -> DiagnosticSink {
    let sink = DiagnosticSink::new();
    load_documents(store, &Cancellation::new(), &sink).unwrap();
    sink
}

/// Selections as `parent -> name@index`, in ref insertion order
fn tree(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT COALESCE(parent.field_name, '<root>'), child.field_name, child.path_index
             FROM selection_refs refs
             JOIN selections child ON child.id = refs.child_id
             LEFT JOIN selections parent ON parent.id = refs.parent_id
             ORDER BY refs.id",
        )
        .unwrap();
    stmt.query_map([], |row| {
        Ok(format!(
            "{} -> {}@{}",
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?
        ))
    })
    .unwrap()
    .collect::<rusqlite::Result<_>>()
    .unwrap()
}

// ============================================================================
// Documents and selections
// ============================================================================

#[test]
fn test_query_with_variable() {
    let store = store(&[(
        "src/routes/+page.gql",
        "query T($id: ID!){ user(id: $id){ id name } }",
        SourceOffset::default(),
    )]);
    let sink = load(&store);
    assert!(sink.is_empty(), "{:?}", sink.snapshot());

    let conn = store.get().unwrap();
    let (name, kind): (String, String) = conn
        .query_row("SELECT name, kind FROM documents", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!((name.as_str(), kind.as_str()), ("T", "query"));

    let variable: (String, String, String) = conn
        .query_row(
            "SELECT name, type, type_modifiers FROM operation_variables",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(variable, ("id".into(), "ID".into(), "!".into()));

    assert_eq!(
        tree(&conn),
        vec!["<root> -> user@0", "user -> id@0", "user -> name@1"]
    );

    let types: Vec<String> = conn
        .prepare("SELECT type FROM selections ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(types, vec!["Query.user", "User.id", "User.name"]);

    let argument: (String, String) = conn
        .query_row("SELECT name, value FROM selection_arguments", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(argument, ("id".into(), "$id".into()));
}

#[test]
fn test_fragments_inline_fragments_and_spreads() {
    let store = store(&[(
        "a.graphql",
        "fragment Info on User { id ... on User { name } ...More }\nfragment More on User { avatar }",
        SourceOffset::default(),
    )]);
    let sink = load(&store);
    assert!(sink.is_empty(), "{:?}", sink.snapshot());

    let conn = store.get().unwrap();
    assert_eq!(
        tree(&conn),
        vec![
            "<root> -> id@0",
            "<root> -> User@1",
            "User -> name@0",
            "<root> -> More@2",
            "<root> -> avatar@0",
        ]
    );

    let kinds: Vec<(String, Option<String>)> = conn
        .prepare("SELECT kind, type FROM selections ORDER BY id")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(kinds[1], ("inline_fragment".into(), None));
    assert_eq!(kinds[2], ("field".into(), Some("User.name".into())));
    assert_eq!(kinds[3], ("fragment".into(), None));
}

#[test]
fn test_aliases_and_directives() {
    let store = store(&[(
        "a.graphql",
        "query Q @cache(policy: \"CacheOnly\") { me: user(id: \"1\") @include(if: true) { id } }",
        SourceOffset::default(),
    )]);
    load(&store);
    let conn = store.get().unwrap();

    let alias: Option<String> = conn
        .query_row("SELECT alias FROM selections WHERE field_name = 'user'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(alias.as_deref(), Some("me"));

    let selection_directive: (String, String, String) = conn
        .query_row(
            "SELECT d.directive, a.name, a.value FROM selection_directives d
             JOIN selection_directive_arguments a ON a.parent = d.id",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(selection_directive, ("include".into(), "if".into(), "true".into()));

    let document_directive: (String, String) = conn
        .query_row(
            "SELECT d.directive, a.value FROM document_directives d
             JOIN document_directive_arguments a ON a.parent = d.id",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(document_directive, ("cache".into(), "\"CacheOnly\"".into()));
}

#[test]
fn test_unknown_field_keeps_id_and_stops_resolving() {
    let store = store(&[(
        "a.graphql",
        "query Q { ghost { name } }",
        SourceOffset::default(),
    )]);
    let sink = load(&store);
    assert!(sink.is_empty());

    let conn = store.get().unwrap();
    let types: Vec<Option<String>> = conn
        .prepare("SELECT type FROM selections ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(types, vec![Some("Query.ghost".to_string()), None]);
}

#[test]
fn test_nested_list_variable() {
    let store = store(&[(
        "a.graphql",
        "query Q($ids: [[ID!]]!, $first: Int = 10) { users(first: $first) { id } }",
        SourceOffset::default(),
    )]);
    load(&store);
    let conn = store.get().unwrap();

    let variables: Vec<(String, String, Option<String>)> = conn
        .prepare("SELECT type, type_modifiers, default_value FROM operation_variables ORDER BY id")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(
        variables,
        vec![
            ("ID".into(), "!]]!".into(), None),
            ("Int".into(), String::new(), Some("10".into())),
        ]
    );
}

// ============================================================================
// Locations
// ============================================================================

#[test]
fn test_locations_are_shifted_by_offset() {
    let store = store(&[(
        "src/lib/User.svelte",
        "query Q {\n  user(id: \"1\") { id }\n}",
        SourceOffset::new(20, 30),
    )]);
    load(&store);
    let conn = store.get().unwrap();

    let document: (u32, u32) = conn
        .query_row("SELECT row, column FROM documents", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(document, (21, 31));

    let user: (u32, u32) = conn
        .query_row(
            "SELECT refs.row, refs.column FROM selection_refs refs
             JOIN selections s ON s.id = refs.child_id WHERE s.field_name = 'user'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(user, (22, 3));
}

#[test]
fn test_parse_errors_are_collected() {
    let store = store(&[
        ("broken.graphql", "query A {\n  user(id: \"1\") {\n}", SourceOffset::new(4, 0)),
        ("fine.graphql", "query B { users { id } }", SourceOffset::default()),
    ]);
    let sink = load(&store);

    let diagnostics = sink.snapshot();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::Parse));
    let location = diagnostics[0].primary_location().unwrap();
    assert_eq!(location.filepath, "broken.graphql");
    assert!(location.line > 4);

    let names: Vec<String> = store
        .get()
        .unwrap()
        .prepare("SELECT name FROM documents")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(names, vec!["B"]);
}

#[test]
fn test_empty_inline_fragment_is_a_parse_error() {
    let store = store(&[(
        "a.graphql",
        "query Q { user(id: \"1\") { ... on User { } } }",
        SourceOffset::default(),
    )]);
    let sink = load(&store);

    let diagnostics = sink.snapshot();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::Parse));
    assert_eq!(diagnostics[0].primary_location().unwrap().filepath, "a.graphql");

    let conn = store.get().unwrap();
    let documents: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
        .unwrap();
    assert_eq!(documents, 0);
    assert!(tree(&conn).is_empty());
}

#[test]
fn test_anonymous_operation_is_reported() {
    let store = store(&[("a.graphql", "{ users { id } }", SourceOffset::default())]);
    let sink = load(&store);

    let diagnostics = sink.snapshot();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Validation);
    assert_eq!(diagnostics[0].message, "operations must have a name");
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_many_documents_across_workers() {
    let contents: Vec<String> = (0..60)
        .map(|i| format!("query Q{i} {{ users {{ id name }} }}"))
        .collect();
    let documents: Vec<_> = contents
        .iter()
        .map(|content| ("a.graphql", content.as_str(), SourceOffset::default()))
        .collect();
    let store = store(&documents);

    let sink = DiagnosticSink::new();
    let summary = load_documents_with(
        &store,
        LoadOptions {
            workers: 4,
            channel_capacity: 2,
        },
        &Cancellation::new(),
        &sink,
    )
    .unwrap();
    assert!(sink.is_empty());
    assert_eq!(summary.documents, 60);
    assert_eq!(summary.selections, 180);

    let count: i64 = store
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM selection_refs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 180);
}

#[test]
fn test_cancelled_load_writes_nothing() {
    let store = store(&[("a.graphql", "query A { users { id } }", SourceOffset::default())]);
    let cancel = Cancellation::new();
    cancel.cancel();

    let result = load_documents(&store, &cancel, &DiagnosticSink::new());
    assert!(result.is_err());

    let count: i64 = store
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

// ============================================================================
// Inline component fields
// ============================================================================

#[test]
fn test_inline_component_field_is_lifted() {
    let store = store(&[]);
    {
        let conn = store.get().unwrap();
        let raw = insert_raw_document(
            &conn,
            "src/lib/Avatar.svelte",
            r#"{ ... on User @componentField(field: "Avatar") { avatar } }"#,
            SourceOffset::default(),
        )
        .unwrap();
        register_inline_component_field(&conn, raw, Some("user")).unwrap();
    }
    let sink = load(&store);
    assert!(sink.is_empty(), "{:?}", sink.snapshot());

    let conn = store.get().unwrap();
    let (name, kind, condition): (String, String, String) = conn
        .query_row("SELECT name, kind, type_condition FROM documents", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .unwrap();
    assert_eq!(name, "__componentField__User_Avatar");
    assert_eq!(kind, "fragment");
    assert_eq!(condition, "User");
    assert_eq!(tree(&conn), vec!["<root> -> avatar@0"]);

    let arguments: Vec<(String, String)> = conn
        .prepare(
            "SELECT a.name, a.value FROM document_directives d
             JOIN document_directive_arguments a ON a.parent = d.id
             WHERE d.directive = 'componentField' ORDER BY a.name",
        )
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(
        arguments,
        vec![
            ("field".to_string(), "\"Avatar\"".to_string()),
            ("prop".to_string(), "\"user\"".to_string()),
        ]
    );
}

#[test]
fn test_inline_component_field_with_siblings_is_reported() {
    let store = store(&[]);
    {
        let conn = store.get().unwrap();
        let raw = insert_raw_document(
            &conn,
            "a.svelte",
            r#"{ ... on User @componentField(field: "Avatar") { avatar } id }"#,
            SourceOffset::default(),
        )
        .unwrap();
        register_inline_component_field(&conn, raw, Some("user")).unwrap();
    }
    let sink = load(&store);

    let diagnostics = sink.snapshot();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Validation);
    assert!(diagnostics[0].message.contains("found 2"));

    let count: i64 = store
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM documents", params![], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
