//! Rows written by the extractor before the pipeline runs, and the readers
//! the loader uses to pick them up.

use crate::{Result, SqlContext};
use houdini_types::SourceOffset;
use rusqlite::{params, Connection};
use std::collections::HashMap;

/// A GraphQL document as extracted from a host source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub id: i64,
    pub filepath: String,
    pub content: String,
    pub offset: SourceOffset,
}

/// Store an extracted document; returns its id
pub fn insert_raw_document(
    conn: &Connection,
    filepath: &str,
    content: &str,
    offset: SourceOffset,
) -> Result<i64> {
    const SQL: &str = "INSERT INTO raw_documents (filepath, content, offset_line, offset_column) VALUES (?1, ?2, ?3, ?4)";
    conn.prepare_cached(SQL)
        .and_then(|mut stmt| stmt.insert(params![filepath, content, offset.line, offset.column]))
        .sql_context("could not insert raw document", SQL)
}

/// Mark a raw document as an inline component field.
///
/// `prop` is the prop name the extractor found next to the document, if any.
pub fn register_inline_component_field(
    conn: &Connection,
    raw_document: i64,
    prop: Option<&str>,
) -> Result<()> {
    const SQL: &str = "INSERT INTO component_fields (document, prop, inline) VALUES (?1, ?2, 1)
        ON CONFLICT (document) DO UPDATE SET prop = excluded.prop, inline = 1";
    conn.prepare_cached(SQL)
        .and_then(|mut stmt| stmt.execute(params![raw_document, prop]))
        .sql_context("could not register inline component field", SQL)?;
    Ok(())
}

/// Every raw document, in insertion order
pub fn raw_documents(conn: &Connection) -> Result<Vec<RawDocument>> {
    const SQL: &str =
        "SELECT id, filepath, content, offset_line, offset_column FROM raw_documents ORDER BY id";
    let mut stmt = conn
        .prepare_cached(SQL)
        .sql_context("could not read raw documents", SQL)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RawDocument {
                id: row.get(0)?,
                filepath: row.get(1)?,
                content: row.get(2)?,
                offset: SourceOffset::new(row.get(3)?, row.get(4)?),
            })
        })
        .sql_context("could not read raw documents", SQL)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("could not read raw documents", SQL)
}

/// Raw documents marked as inline component fields, with their registered prop
pub fn inline_component_fields(conn: &Connection) -> Result<HashMap<i64, Option<String>>> {
    const SQL: &str = "SELECT document, prop FROM component_fields WHERE inline = 1";
    let mut stmt = conn
        .prepare_cached(SQL)
        .sql_context("could not read component fields", SQL)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .sql_context("could not read component fields", SQL)?;
    rows.collect::<rusqlite::Result<HashMap<_, _>>>()
        .sql_context("could not read component fields", SQL)
}
