use houdini_config::ProjectConfig;
use houdini_ir::{Cancellation, IrError, IrStore, Result, SqlContext};
use houdini_schema::RUNTIME_SCALAR_DIRECTIVE;
use rusqlite::{params, Transaction};
use std::collections::BTreeMap;

/// Replace runtime scalars in variable types with their schema scalar.
///
/// Every rewritten variable gets `@__houdini__runtimeScalar(type: "...")`
/// recording the name it was declared with. Modifiers are untouched. The
/// whole rewrite is one transaction. Returns how many variables changed.
#[tracing::instrument(skip_all, fields(scalars = config.runtime_scalars.len()))]
pub fn rewrite_runtime_scalars(
    store: &IrStore,
    config: &ProjectConfig,
    cancel: &Cancellation,
) -> std::result::Result<usize, IrError> {
    if config.runtime_scalars.is_empty() {
        return Ok(0);
    }

    // sorted so ids come out the same on every run
    let scalars: BTreeMap<&str, &str> = config
        .runtime_scalars
        .iter()
        .map(|(custom, target)| (custom.as_str(), target.as_str()))
        .collect();

    let mut conn = store.get_cancellable(cancel)?;
    let rewritten = store.write(&mut conn, |tx| {
        let mut rewritten = 0;
        for (custom, target) in &scalars {
            if cancel.is_cancelled() {
                return Err(IrError::Cancelled);
            }
            rewritten += rewrite_scalar(tx, custom, target)?;
        }
        Ok(rewritten)
    })?;

    tracing::debug!(rewritten, "Runtime scalars rewritten");
    Ok(rewritten)
}

fn rewrite_scalar(tx: &Transaction<'_>, custom: &str, target: &str) -> Result<usize> {
    const VARIABLES: &str =
        "SELECT id, row, column FROM operation_variables WHERE type = ?1 ORDER BY id";
    const UPDATE: &str = "UPDATE operation_variables SET type = ?2 WHERE id = ?1";
    const DIRECTIVE: &str = "INSERT INTO operation_variable_directives (parent, directive, row, column) VALUES (?1, ?2, ?3, ?4)";
    const ARGUMENT: &str = "INSERT INTO operation_variable_directive_arguments (parent, name, value) VALUES (?1, 'type', ?2)";

    let variables: Vec<(i64, u32, u32)> = {
        let mut stmt = tx
            .prepare_cached(VARIABLES)
            .sql_context("could not read operation variables", VARIABLES)?;
        let rows = stmt
            .query_map(params![custom], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .sql_context("could not read operation variables", VARIABLES)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .sql_context("could not read operation variables", VARIABLES)?
    };

    let original = format!("\"{custom}\"");
    for (variable, row, column) in &variables {
        tx.prepare_cached(UPDATE)
            .and_then(|mut stmt| stmt.execute(params![variable, target]))
            .sql_context("could not rewrite variable type", UPDATE)?;
        let directive = tx
            .prepare_cached(DIRECTIVE)
            .and_then(|mut stmt| {
                stmt.insert(params![variable, RUNTIME_SCALAR_DIRECTIVE, row, column])
            })
            .sql_context("could not insert runtime scalar directive", DIRECTIVE)?;
        tx.prepare_cached(ARGUMENT)
            .and_then(|mut stmt| stmt.execute(params![directive, original]))
            .sql_context("could not insert runtime scalar argument", ARGUMENT)?;
        tracing::trace!(variable, custom, target, "Rewrote runtime scalar");
    }
    Ok(variables.len())
}
