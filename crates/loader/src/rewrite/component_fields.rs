use houdini_ir::{Cancellation, IrError, IrStore, Result, SqlContext};
use houdini_schema::{COMPONENT_FIELD_DIRECTIVE, COMPONENT_SCALAR};
use houdini_syntax::unquote;
use houdini_types::{Diagnostic, DiagnosticSink, SourceLocation};
use rusqlite::{params, OptionalExtension, Transaction};
use std::collections::HashMap;

/// A fragment carrying `@componentField`, with its directive arguments
#[derive(Debug)]
struct ComponentFragment {
    raw_document: i64,
    fragment: String,
    type_name: String,
    directive: i64,
    location: SourceLocation,
}

/// Register every fragment marked `@componentField` as a component field.
///
/// Each one gets a `component_fields` row keyed by its raw document and a
/// synthetic `Component` field on its type, so selections of the field
/// resolve like any other. Returns how many were registered.
#[tracing::instrument(skip_all)]
pub fn rewrite_component_fields(
    store: &IrStore,
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> std::result::Result<usize, IrError> {
    let mut conn = store.get_cancellable(cancel)?;
    let registered = store.write(&mut conn, |tx| {
        let mut registered = 0;
        for fragment in component_fragments(tx)? {
            if cancel.is_cancelled() {
                return Err(IrError::Cancelled);
            }
            match register(tx, &fragment)? {
                Ok(()) => registered += 1,
                Err(diagnostic) => sink.push(diagnostic),
            }
        }
        Ok(registered)
    })?;

    tracing::debug!(registered, "Component fields registered");
    Ok(registered)
}

fn component_fragments(tx: &Transaction<'_>) -> Result<Vec<ComponentFragment>> {
    const SQL: &str = "
        SELECT documents.raw_document, documents.name, documents.type_condition,
               document_directives.id, raw_documents.filepath,
               document_directives.row, document_directives.column
        FROM document_directives
        JOIN documents ON documents.id = document_directives.document
        JOIN raw_documents ON raw_documents.id = documents.raw_document
        WHERE document_directives.directive = ?1 AND documents.kind = 'fragment'
        ORDER BY documents.id";

    let mut stmt = tx
        .prepare_cached(SQL)
        .sql_context("could not read component fragments", SQL)?;
    let rows = stmt
        .query_map(params![COMPONENT_FIELD_DIRECTIVE], |row| {
            Ok(ComponentFragment {
                raw_document: row.get(0)?,
                fragment: row.get(1)?,
                type_name: row.get(2)?,
                directive: row.get(3)?,
                location: SourceLocation::new(
                    row.get::<_, String>(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ),
            })
        })
        .sql_context("could not read component fragments", SQL)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("could not read component fragments", SQL)
}

fn directive_arguments(tx: &Transaction<'_>, directive: i64) -> Result<HashMap<String, String>> {
    const SQL: &str = "SELECT name, value FROM document_directive_arguments WHERE parent = ?1";
    let mut stmt = tx
        .prepare_cached(SQL)
        .sql_context("could not read directive arguments", SQL)?;
    let rows = stmt
        .query_map(params![directive], |row| Ok((row.get(0)?, row.get(1)?)))
        .sql_context("could not read directive arguments", SQL)?;
    rows.collect::<rusqlite::Result<HashMap<_, _>>>()
        .sql_context("could not read directive arguments", SQL)
}

/// The outer result fails the whole rewrite; the inner one is a problem
/// with this fragment only.
fn register(
    tx: &Transaction<'_>,
    fragment: &ComponentFragment,
) -> Result<std::result::Result<(), Diagnostic>> {
    const UPSERT: &str = "
        INSERT INTO component_fields (document, type, prop, field, fragment, inline)
        VALUES (?1, ?2, ?3, ?4, ?5, 0)
        ON CONFLICT (document) DO UPDATE SET
            type = excluded.type, prop = excluded.prop,
            field = excluded.field, fragment = excluded.fragment";
    const FIELD: &str = "INSERT OR IGNORE INTO type_fields (id, parent, name, type, internal) VALUES (?1, ?2, ?3, ?4, 1)";
    const EXISTING: &str = "SELECT type, internal FROM type_fields WHERE id = ?1";
    const KNOWN_TYPE: &str = "SELECT 1 FROM types WHERE name = ?1";

    let invalid = |message: String| -> Result<std::result::Result<(), Diagnostic>> {
        Ok(Err(Diagnostic::validation("component_field", message)
            .with_location(fragment.location.clone())))
    };

    let arguments = directive_arguments(tx, fragment.directive)?;
    let Some(field) = arguments.get("field").and_then(|value| unquote(value)) else {
        return invalid(format!(
            "@{COMPONENT_FIELD_DIRECTIVE} on fragment {} requires a string field argument",
            fragment.fragment
        ));
    };
    let prop = match arguments.get("prop") {
        Some(value) => match unquote(value) {
            Some(prop) => Some(prop),
            None => {
                return invalid(format!(
                    "the prop argument of @{COMPONENT_FIELD_DIRECTIVE} must be a string, found {value}"
                ))
            }
        },
        None => None,
    };

    tx.prepare_cached(UPSERT)
        .and_then(|mut stmt| {
            stmt.execute(params![
                fragment.raw_document,
                fragment.type_name,
                prop,
                field,
                fragment.fragment
            ])
        })
        .sql_context("could not register component field", UPSERT)?;

    // type_fields checks its parent at commit, so only types that exist get one
    let known: Option<i64> = tx
        .prepare_cached(KNOWN_TYPE)
        .and_then(|mut stmt| stmt.query_row(params![fragment.type_name], |row| row.get(0)).optional())
        .sql_context("could not look up type", KNOWN_TYPE)?;
    if known.is_none() {
        tracing::debug!(fragment = %fragment.fragment, "Component field on unknown type");
        return Ok(Ok(()));
    }

    let id = format!("{}.{field}", fragment.type_name);
    let existing: Option<(String, bool)> = tx
        .prepare_cached(EXISTING)
        .and_then(|mut stmt| {
            stmt.query_row(params![id], |row| Ok((row.get(0)?, row.get(1)?)))
                .optional()
        })
        .sql_context("could not look up field", EXISTING)?;
    match existing {
        Some((ty, internal)) if !(internal && ty == COMPONENT_SCALAR) => invalid(format!(
            "component field {field} conflicts with the field {field} of {}",
            fragment.type_name
        )),
        _ => {
            tx.prepare_cached(FIELD)
                .and_then(|mut stmt| {
                    stmt.execute(params![id, fragment.type_name, field, COMPONENT_SCALAR])
                })
                .sql_context("could not insert component field", FIELD)?;
            Ok(Ok(()))
        }
    }
}
