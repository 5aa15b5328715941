//! Test project builder.
//!
//! A [`TestProject`] collects a schema, a config and the raw documents an
//! extractor would have written, then runs the pipeline over a fresh
//! in-memory store. The [`TestRun`] it returns keeps the store so tests can
//! look at the IR afterwards.

use houdini_config::ProjectConfig;
use houdini_core::{run, Cancellation, IrStore, PipelineError, PipelineSummary};
use houdini_ir::{insert_raw_document, register_inline_component_field, PooledConnection};
use houdini_types::{Diagnostic, SourceOffset};
use rusqlite::OptionalExtension;
use std::fmt::Write;

const POOL_SIZE: usize = 4;

struct TestDocument {
    filepath: String,
    content: String,
    offset: SourceOffset,
    /// `Some` for inline component fields, holding the registered prop
    inline: Option<Option<String>>,
}

/// Builder for a project run against an in-memory IR.
///
/// # Example
///
/// ```ignore
/// use houdini_test_utils::TestProject;
///
/// let run = TestProject::new("type Query { me: User } type User { id: ID! }")
///     .with_document("src/routes/+page.gql", "query Me { me { id } }")
///     .run();
/// assert!(run.diagnostics().is_empty());
/// ```
pub struct TestProject {
    schema: String,
    config: ProjectConfig,
    documents: Vec<TestDocument>,
}

impl TestProject {
    /// Create a project with a schema and the default config
    pub fn new(schema: &str) -> Self {
        Self {
            schema: schema.to_string(),
            config: ProjectConfig::new("."),
            documents: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ProjectConfig) -> Self {
        self.config = config;
        self
    }

    /// Map a custom scalar to the schema scalar it is sent as
    pub fn with_runtime_scalar(mut self, name: &str, scalar: &str) -> Self {
        self.config
            .runtime_scalars
            .insert(name.to_string(), scalar.to_string());
        self
    }

    /// Add a document that makes up a whole file
    pub fn with_document(self, filepath: &str, content: &str) -> Self {
        self.with_document_at(filepath, content, 0, 0)
    }

    /// Add a document embedded in a host file at a 0-indexed line and column
    pub fn with_document_at(mut self, filepath: &str, content: &str, line: u32, column: u32) -> Self {
        self.documents.push(TestDocument {
            filepath: filepath.to_string(),
            content: content.to_string(),
            offset: SourceOffset::new(line, column),
            inline: None,
        });
        self
    }

    /// Add a document the extractor marked as an inline component field
    pub fn with_inline_component_field(
        mut self,
        filepath: &str,
        content: &str,
        prop: Option<&str>,
    ) -> Self {
        self.documents.push(TestDocument {
            filepath: filepath.to_string(),
            content: content.to_string(),
            offset: SourceOffset::default(),
            inline: Some(prop.map(str::to_string)),
        });
        self
    }

    /// Write the raw documents and run the pipeline
    pub fn run(self) -> TestRun {
        let store = IrStore::in_memory(POOL_SIZE).unwrap();
        {
            let conn = store.get().unwrap();
            for document in &self.documents {
                let id = insert_raw_document(
                    &conn,
                    &document.filepath,
                    &document.content,
                    document.offset,
                )
                .unwrap();
                if let Some(prop) = &document.inline {
                    register_inline_component_field(&conn, id, prop.as_deref()).unwrap();
                }
            }
        }

        let result = run(&store, &self.config, &self.schema, &Cancellation::new());
        let (summary, diagnostics) = match result {
            Ok(summary) => (Some(summary), Vec::new()),
            Err(error @ PipelineError::Diagnostics(_)) => (None, error.into_diagnostics()),
            Err(error) => panic!("pipeline failed: {error}"),
        };
        TestRun {
            store,
            summary,
            diagnostics,
        }
    }
}

/// The outcome of [`TestProject::run`]
pub struct TestRun {
    store: IrStore,
    summary: Option<PipelineSummary>,
    diagnostics: Vec<Diagnostic>,
}

impl TestRun {
    /// Every diagnostic, sorted by location
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics reported by one rule
    pub fn rule(&self, rule: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.rule.as_deref() == Some(rule))
            .collect()
    }

    /// The summary of a run that reported nothing
    pub fn summary(&self) -> Option<&PipelineSummary> {
        self.summary.as_ref()
    }

    pub fn store(&self) -> &IrStore {
        &self.store
    }

    pub fn conn(&self) -> PooledConnection {
        self.store.get().unwrap()
    }

    /// Run a query returning a single integer (usually a `COUNT(*)`)
    pub fn count(&self, sql: &str) -> i64 {
        self.conn().query_row(sql, [], |row| row.get(0)).unwrap()
    }

    /// Run a query returning one text column
    pub fn strings(&self, sql: &str) -> Vec<String> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql).unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    /// Rebuild a document's selection tree from the IR, one selection per
    /// line in `path_index` order, children indented under their parent.
    ///
    /// Fields render as `alias: name` (or `name`), inline fragments as
    /// `... on Type` and spreads as `...Name`.
    pub fn selection_tree(&self, document: &str) -> String {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "SELECT id FROM documents WHERE name = ?1",
                [document],
                |row| row.get(0),
            )
            .optional()
            .unwrap()
            .unwrap_or_else(|| panic!("no document named {document}"));

        let mut tree = String::new();
        write_children(&conn, id, None, 0, &mut tree);
        tree
    }
}

fn write_children(conn: &rusqlite::Connection, document: i64, parent: Option<i64>, depth: usize, out: &mut String) {
    let mut stmt = conn
        .prepare(
            "SELECT selections.id, selections.kind, selections.field_name, selections.alias
             FROM selection_refs refs
             JOIN selections ON selections.id = refs.child_id
             WHERE refs.document = ?1 AND refs.parent_id IS ?2
             ORDER BY selections.path_index",
        )
        .unwrap();
    let children: Vec<(i64, String, String, Option<String>)> = stmt
        .query_map(rusqlite::params![document, parent], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();

    for (id, kind, name, alias) in children {
        let label = match (kind.as_str(), alias) {
            ("field", Some(alias)) => format!("{alias}: {name}"),
            ("field", None) => name,
            ("inline_fragment", _) if name == "inline_fragment" => "...".to_string(),
            ("inline_fragment", _) => format!("... on {name}"),
            _ => format!("...{name}"),
        };
        writeln!(out, "{}{label}", "  ".repeat(depth)).unwrap();
        write_children(conn, document, Some(id), depth + 1, out);
    }
}
