use houdini_config::ProjectConfig;
use houdini_ir::{Cancellation, IrError, Result, SqlContext};
use houdini_types::Diagnostic;
use rusqlite::{Connection, Params, Row};

/// A validation rule.
///
/// Rules only read the IR. Each one runs on its own connection and thread,
/// so a rule must not depend on another rule's results.
pub trait ValidationRule: Send + Sync {
    /// Unique identifier for this rule (e.g., `"fragment_cycles"`)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Query the IR and report every violation found
    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>>;
}

/// What a rule can see while it runs
pub struct RuleContext<'a> {
    conn: &'a Connection,
    config: &'a ProjectConfig,
    cancel: &'a Cancellation,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection, config: &'a ProjectConfig, cancel: &'a Cancellation) -> Self {
        Self {
            conn,
            config,
            cancel,
        }
    }

    #[must_use]
    pub const fn conn(&self) -> &'a Connection {
        self.conn
    }

    #[must_use]
    pub const fn config(&self) -> &'a ProjectConfig {
        self.config
    }

    /// Fail with [`IrError::Cancelled`] once the run has been cancelled
    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(IrError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run a query and map every row, stopping early on cancellation
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.check_cancelled()?;
        let mut stmt = self
            .conn
            .prepare_cached(sql)
            .sql_context("could not prepare rule query", sql)?;
        let rows = stmt
            .query_map(params, map)
            .sql_context("could not run rule query", sql)?;

        let mut mapped = Vec::new();
        for row in rows {
            self.check_cancelled()?;
            mapped.push(row.sql_context("could not read rule query row", sql)?);
        }
        Ok(mapped)
    }
}
