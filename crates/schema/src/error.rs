use houdini_ir::IrError;
use houdini_types::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("could not read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema failed to parse or validate; the message is the parser's report
    #[error("invalid schema: {0}")]
    Invalid(String),

    #[error(transparent)]
    Ir(#[from] IrError),
}

impl From<SchemaError> for Diagnostic {
    fn from(error: SchemaError) -> Self {
        let message = error.to_string();
        match error {
            SchemaError::Ir(error) => error.into(),
            SchemaError::Invalid(report) => Self::parse("invalid schema").with_detail(report),
            SchemaError::Io { .. } => Self::parse(message),
        }
    }
}
