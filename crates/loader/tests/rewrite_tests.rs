//! Tests for the component field and runtime scalar rewrites

use houdini_config::ProjectConfig;
use houdini_ir::{insert_raw_document, register_inline_component_field, Cancellation, IrStore};
use houdini_loader::{load_documents, rewrite_component_fields, rewrite_runtime_scalars};
use houdini_schema::import_schema;
use houdini_types::{DiagnosticSink, SourceOffset};
use rusqlite::OptionalExtension;

const SCHEMA: &str = r"
type Query {
    user(id: ID!): User
}

type User {
    id: ID!
    name: String
    avatar: String
}
";

struct Fixture {
    store: IrStore,
    sink: DiagnosticSink,
    cancel: Cancellation,
}

impl Fixture {
    fn new() -> Self {
        let store = IrStore::in_memory(2).unwrap();
        import_schema(&store, SCHEMA, "schema.graphql").unwrap();
        Self {
            store,
            sink: DiagnosticSink::new(),
            cancel: Cancellation::new(),
        }
    }

    fn document(&self, filepath: &str, content: &str) -> i64 {
        insert_raw_document(&self.store.get().unwrap(), filepath, content, SourceOffset::default())
            .unwrap()
    }

    fn load(&self) {
        load_documents(&self.store, &self.cancel, &self.sink).unwrap();
    }
}

// ============================================================================
// Component fields
// ============================================================================

#[test]
fn test_named_component_field_fragment() {
    let fixture = Fixture::new();
    let raw = fixture.document(
        "src/lib/UserAvatar.svelte",
        r#"fragment UserAvatar on User @componentField(field: "Avatar", prop: "user") { avatar }"#,
    );
    fixture.load();

    let registered =
        rewrite_component_fields(&fixture.store, &fixture.cancel, &fixture.sink).unwrap();
    assert_eq!(registered, 1);
    assert!(fixture.sink.is_empty(), "{:?}", fixture.sink.snapshot());

    let conn = fixture.store.get().unwrap();
    let row: (String, Option<String>, String, bool, String) = conn
        .query_row(
            "SELECT type, prop, field, inline, fragment FROM component_fields WHERE document = ?1",
            [raw],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )
        .unwrap();
    assert_eq!(
        row,
        (
            "User".into(),
            Some("user".into()),
            "Avatar".into(),
            false,
            "UserAvatar".into()
        )
    );

    let field: (String, String, bool) = conn
        .query_row(
            "SELECT parent, type, internal FROM type_fields WHERE id = 'User.Avatar'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(field, ("User".into(), "Component".into(), true));
}

#[test]
fn test_inline_component_field_keeps_inline_flag() {
    let fixture = Fixture::new();
    let raw = fixture.document(
        "src/lib/Avatar.svelte",
        r#"{ ... on User @componentField(field: "Avatar") { avatar } }"#,
    );
    register_inline_component_field(&fixture.store.get().unwrap(), raw, Some("user")).unwrap();
    fixture.load();
    rewrite_component_fields(&fixture.store, &fixture.cancel, &fixture.sink).unwrap();
    assert!(fixture.sink.is_empty(), "{:?}", fixture.sink.snapshot());

    let conn = fixture.store.get().unwrap();
    let row: (bool, Option<String>, Option<String>, Option<String>) = conn
        .query_row(
            "SELECT inline, prop, field, fragment FROM component_fields WHERE document = ?1",
            [raw],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();
    assert_eq!(
        row,
        (
            true,
            Some("user".into()),
            Some("Avatar".into()),
            Some("__componentField__User_Avatar".into())
        )
    );

    let exists: Option<i64> = conn
        .query_row("SELECT 1 FROM type_fields WHERE id = 'User.Avatar'", [], |row| row.get(0))
        .optional()
        .unwrap();
    assert!(exists.is_some());
}

#[test]
fn test_component_field_without_field_argument() {
    let fixture = Fixture::new();
    fixture.document(
        "a.svelte",
        r#"fragment UserAvatar on User @componentField(prop: "user") { avatar }"#,
    );
    fixture.load();

    let registered =
        rewrite_component_fields(&fixture.store, &fixture.cancel, &fixture.sink).unwrap();
    assert_eq!(registered, 0);

    let diagnostics = fixture.sink.snapshot();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("requires a string field argument"));
    assert_eq!(diagnostics[0].rule.as_deref(), Some("component_field"));
}

#[test]
fn test_component_field_conflicting_with_schema_field() {
    let fixture = Fixture::new();
    fixture.document(
        "a.svelte",
        r#"fragment UserName on User @componentField(field: "name") { name }"#,
    );
    fixture.load();
    rewrite_component_fields(&fixture.store, &fixture.cancel, &fixture.sink).unwrap();

    let diagnostics = fixture.sink.snapshot();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("conflicts"));
}

#[test]
fn test_component_field_on_unknown_type_commits() {
    let fixture = Fixture::new();
    fixture.document(
        "a.svelte",
        r#"fragment GhostAvatar on Ghost @componentField(field: "Avatar") { avatar }"#,
    );
    fixture.load();

    // the fragment's type is reported by validation, the rewrite itself succeeds
    let registered =
        rewrite_component_fields(&fixture.store, &fixture.cancel, &fixture.sink).unwrap();
    assert_eq!(registered, 1);

    let count: i64 = fixture
        .store
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM type_fields WHERE parent = 'Ghost'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(count, 0);
}

// ============================================================================
// Runtime scalars
// ============================================================================

#[test]
fn test_runtime_scalar_is_rewritten() {
    let fixture = Fixture::new();
    fixture.document("a.graphql", "query Q($user: UserFromSession!){ user(id: $user) { id } }");
    fixture.load();

    let mut config = ProjectConfig::new(".");
    config
        .runtime_scalars
        .insert("UserFromSession".into(), "ID".into());
    let rewritten = rewrite_runtime_scalars(&fixture.store, &config, &fixture.cancel).unwrap();
    assert_eq!(rewritten, 1);

    let conn = fixture.store.get().unwrap();
    let variable: (String, String) = conn
        .query_row(
            "SELECT type, type_modifiers FROM operation_variables WHERE name = 'user'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(variable, ("ID".into(), "!".into()));

    let directive: (String, String, String) = conn
        .query_row(
            "SELECT d.directive, a.name, a.value FROM operation_variable_directives d
             JOIN operation_variable_directive_arguments a ON a.parent = d.id",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(
        directive,
        (
            "__houdini__runtimeScalar".into(),
            "type".into(),
            "\"UserFromSession\"".into()
        )
    );
}

#[test]
fn test_runtime_scalars_leave_other_variables_alone() {
    let fixture = Fixture::new();
    fixture.document("a.graphql", "query Q($id: ID!){ user(id: $id) { id } }");
    fixture.load();

    let mut config = ProjectConfig::new(".");
    config
        .runtime_scalars
        .insert("UserFromSession".into(), "ID".into());
    let rewritten = rewrite_runtime_scalars(&fixture.store, &config, &fixture.cancel).unwrap();
    assert_eq!(rewritten, 0);

    let count: i64 = fixture
        .store
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM operation_variable_directives", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(count, 0);
}
