use houdini_types::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IrError>;

/// Errors raised by the IR store.
#[derive(Debug, Error)]
pub enum IrError {
    /// A statement failed. `sql` holds the statement text when known.
    #[error("{message}: {source}")]
    Sqlite {
        message: String,
        sql: Option<String>,
        #[source]
        source: rusqlite::Error,
    },

    /// The surrounding work was cancelled before the operation could run
    #[error("operation cancelled")]
    Cancelled,

    /// Every pooled connection was dropped along with the store
    #[error("connection pool is closed")]
    PoolClosed,

    /// A stored value could not be interpreted
    #[error("corrupt IR row: {0}")]
    Corrupt(String),
}

impl IrError {
    /// Build a corruption error from any displayable message
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The statement that failed, if any
    #[must_use]
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Sqlite { sql, .. } => sql.as_deref(),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for IrError {
    fn from(source: rusqlite::Error) -> Self {
        Self::Sqlite {
            message: "IR statement failed".to_string(),
            sql: None,
            source,
        }
    }
}

impl From<IrError> for Diagnostic {
    fn from(error: IrError) -> Self {
        let diagnostic = Self::internal(error.to_string());
        match error.sql() {
            Some(sql) => diagnostic.with_detail(sql.trim()),
            None => diagnostic,
        }
    }
}

/// Attach the originating message and statement to a rusqlite result
pub trait SqlContext<T> {
    fn sql_context(self, message: &str, sql: &str) -> Result<T>;
}

impl<T> SqlContext<T> for rusqlite::Result<T> {
    fn sql_context(self, message: &str, sql: &str) -> Result<T> {
        self.map_err(|source| IrError::Sqlite {
            message: message.to_string(),
            sql: Some(sql.to_string()),
            source,
        })
    }
}
