//! Table definitions of the IR.
//!
//! Foreign keys are `DEFERRABLE INITIALLY DEFERRED` so rows can be inserted
//! in any order inside a transaction and are only checked at commit.
//!
//! Some references are deliberately left unconstrained because validation
//! rules report them: a selection's field id, a document's type condition,
//! a directive instance's name and an operation variable's type. Likewise
//! duplicate variables, arguments and directive instances are accepted.
//!
//! `type_modifiers` columns hold the text that follows the named type in a
//! type reference, read from the inside out: `[[Boolean]]!` is stored as
//! `]]!`, `[ID!]` as `!]` and `[ID]!` as `]!`. The number of `]` gives the
//! list depth, and a `!` right after a `]` marks that list level non-null.
//! A leading `!` marks the named type itself. `houdini_types::TypeModifiers`
//! parses and renders this form.

use crate::{Result, SqlContext};
use rusqlite::Connection;

pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS types (
    name TEXT NOT NULL PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('OBJECT', 'INTERFACE', 'UNION', 'ENUM', 'SCALAR', 'INPUT')),
    description TEXT,
    internal BOOLEAN NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS type_fields (
    id TEXT NOT NULL PRIMARY KEY,
    parent TEXT NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    type_modifiers TEXT NOT NULL DEFAULT '',
    default_value TEXT,
    description TEXT,
    internal BOOLEAN NOT NULL DEFAULT 0,
    FOREIGN KEY (parent) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (type) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED,
    UNIQUE (parent, name)
);

CREATE TABLE IF NOT EXISTS field_argument_definitions (
    id TEXT NOT NULL PRIMARY KEY,
    field TEXT NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    type_modifiers TEXT NOT NULL DEFAULT '',
    default_value TEXT,
    FOREIGN KEY (field) REFERENCES type_fields(id) DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (type) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED,
    UNIQUE (field, name)
);

CREATE TABLE IF NOT EXISTS enum_values (
    parent TEXT NOT NULL,
    value TEXT NOT NULL,
    description TEXT,
    FOREIGN KEY (parent) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED,
    UNIQUE (parent, value)
);

CREATE TABLE IF NOT EXISTS possible_types (
    type TEXT NOT NULL,
    member TEXT NOT NULL,
    FOREIGN KEY (type) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (member) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED,
    PRIMARY KEY (type, member)
);

CREATE TABLE IF NOT EXISTS directives (
    name TEXT NOT NULL PRIMARY KEY,
    repeatable BOOLEAN NOT NULL DEFAULT 0,
    internal BOOLEAN NOT NULL DEFAULT 0,
    visible BOOLEAN NOT NULL DEFAULT 1,
    description TEXT
);

CREATE TABLE IF NOT EXISTS directive_arguments (
    parent TEXT NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    type_modifiers TEXT NOT NULL DEFAULT '',
    default_value TEXT,
    FOREIGN KEY (parent) REFERENCES directives(name) DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (type) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED,
    UNIQUE (parent, name)
);

CREATE TABLE IF NOT EXISTS directive_locations (
    directive TEXT NOT NULL,
    location TEXT NOT NULL CHECK (location IN (
        'QUERY', 'MUTATION', 'SUBSCRIPTION', 'FIELD', 'FRAGMENT_DEFINITION',
        'FRAGMENT_SPREAD', 'INLINE_FRAGMENT', 'VARIABLE_DEFINITION', 'SCHEMA',
        'SCALAR', 'OBJECT', 'FIELD_DEFINITION', 'ARGUMENT_DEFINITION', 'INTERFACE',
        'UNION', 'ENUM', 'ENUM_VALUE', 'INPUT_OBJECT', 'INPUT_FIELD_DEFINITION'
    )),
    FOREIGN KEY (directive) REFERENCES directives(name) DEFERRABLE INITIALLY DEFERRED,
    UNIQUE (directive, location)
);

CREATE TABLE IF NOT EXISTS operation_types (
    operation TEXT NOT NULL PRIMARY KEY CHECK (operation IN ('query', 'mutation', 'subscription')),
    type TEXT NOT NULL,
    FOREIGN KEY (type) REFERENCES types(name) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS raw_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filepath TEXT NOT NULL,
    content TEXT NOT NULL,
    offset_line INTEGER NOT NULL DEFAULT 0,
    offset_column INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    raw_document INTEGER NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('query', 'mutation', 'subscription', 'fragment')),
    type_condition TEXT,
    row INTEGER NOT NULL,
    column INTEGER NOT NULL,
    FOREIGN KEY (raw_document) REFERENCES raw_documents(id) DEFERRABLE INITIALLY DEFERRED,
    CHECK (kind != 'fragment' OR type_condition IS NOT NULL)
);

CREATE TABLE IF NOT EXISTS operation_variables (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document INTEGER NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    type_modifiers TEXT NOT NULL DEFAULT '',
    default_value TEXT,
    row INTEGER NOT NULL,
    column INTEGER NOT NULL,
    FOREIGN KEY (document) REFERENCES documents(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS selections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    field_name TEXT NOT NULL,
    alias TEXT,
    path_index INTEGER NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('field', 'fragment', 'inline_fragment')),
    type TEXT
);

CREATE TABLE IF NOT EXISTS selection_refs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    parent_id INTEGER,
    child_id INTEGER NOT NULL,
    document INTEGER NOT NULL,
    row INTEGER NOT NULL,
    column INTEGER NOT NULL,
    FOREIGN KEY (parent_id) REFERENCES selections(id) DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (child_id) REFERENCES selections(id) DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (document) REFERENCES documents(id) DEFERRABLE INITIALLY DEFERRED,
    UNIQUE (document, child_id)
);

CREATE TABLE IF NOT EXISTS selection_arguments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    selection_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    row INTEGER NOT NULL,
    column INTEGER NOT NULL,
    document INTEGER NOT NULL,
    FOREIGN KEY (selection_id) REFERENCES selections(id) DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (document) REFERENCES documents(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS selection_directives (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    selection_id INTEGER NOT NULL,
    directive TEXT NOT NULL,
    row INTEGER NOT NULL,
    column INTEGER NOT NULL,
    FOREIGN KEY (selection_id) REFERENCES selections(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS selection_directive_arguments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    parent INTEGER NOT NULL,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    FOREIGN KEY (parent) REFERENCES selection_directives(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS document_directives (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document INTEGER NOT NULL,
    directive TEXT NOT NULL,
    row INTEGER NOT NULL,
    column INTEGER NOT NULL,
    FOREIGN KEY (document) REFERENCES documents(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS document_directive_arguments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    parent INTEGER NOT NULL,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    FOREIGN KEY (parent) REFERENCES document_directives(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS operation_variable_directives (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    parent INTEGER NOT NULL,
    directive TEXT NOT NULL,
    row INTEGER NOT NULL,
    column INTEGER NOT NULL,
    FOREIGN KEY (parent) REFERENCES operation_variables(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS operation_variable_directive_arguments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    parent INTEGER NOT NULL,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    FOREIGN KEY (parent) REFERENCES operation_variable_directives(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE TABLE IF NOT EXISTS component_fields (
    document INTEGER NOT NULL PRIMARY KEY,
    type TEXT,
    prop TEXT,
    field TEXT,
    inline BOOLEAN NOT NULL DEFAULT 0,
    fragment TEXT,
    FOREIGN KEY (document) REFERENCES raw_documents(id) DEFERRABLE INITIALLY DEFERRED
);

CREATE INDEX IF NOT EXISTS idx_selection_refs_parent ON selection_refs(parent_id);
CREATE INDEX IF NOT EXISTS idx_selection_refs_child ON selection_refs(child_id);
CREATE INDEX IF NOT EXISTS idx_selection_refs_document ON selection_refs(document);
CREATE INDEX IF NOT EXISTS idx_type_fields_parent ON type_fields(parent);
CREATE INDEX IF NOT EXISTS idx_selection_directives_selection ON selection_directives(selection_id);
CREATE INDEX IF NOT EXISTS idx_selection_arguments_selection ON selection_arguments(selection_id);
CREATE INDEX IF NOT EXISTS idx_possible_types_type ON possible_types(type);
CREATE INDEX IF NOT EXISTS idx_possible_types_member ON possible_types(member);
CREATE INDEX IF NOT EXISTS idx_enum_values_parent ON enum_values(parent);
CREATE INDEX IF NOT EXISTS idx_documents_name ON documents(name);
CREATE INDEX IF NOT EXISTS idx_documents_raw_document ON documents(raw_document);
CREATE INDEX IF NOT EXISTS idx_operation_variables_document ON operation_variables(document);
CREATE INDEX IF NOT EXISTS idx_document_directives_document ON document_directives(document);
CREATE INDEX IF NOT EXISTS idx_field_argument_definitions_field ON field_argument_definitions(field);
";

/// Create every table and index. Safe to run on an initialised database.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)
        .sql_context("could not create IR tables", CREATE_TABLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let tables = table_names(&conn);
        for expected in [
            "types",
            "type_fields",
            "documents",
            "selections",
            "selection_refs",
            "component_fields",
            "operation_types",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_fragment_requires_type_condition() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute(
            "INSERT INTO raw_documents (filepath, content) VALUES ('a.graphql', '')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO documents (name, raw_document, kind, row, column) VALUES ('F', 1, 'fragment', 1, 1)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_foreign_keys_are_deferred() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        create_tables(&conn).unwrap();

        // the field arrives before its types
        let tx = conn.transaction().unwrap();
        tx.execute(
            "INSERT INTO type_fields (id, parent, name, type) VALUES ('User.id', 'User', 'id', 'ID')",
            [],
        )
        .unwrap();
        tx.execute("INSERT INTO types (name, kind) VALUES ('User', 'OBJECT'), ('ID', 'SCALAR')", [])
            .unwrap();
        tx.commit().unwrap();

        // a dangling reference fails at commit
        let tx = conn.transaction().unwrap();
        tx.execute(
            "INSERT INTO type_fields (id, parent, name, type) VALUES ('Ghost.id', 'Ghost', 'id', 'ID')",
            [],
        )
        .unwrap();
        assert!(tx.commit().is_err());
    }
}
