use houdini_ir::IrError;
use houdini_schema::SchemaError;
use houdini_types::Diagnostic;
use thiserror::Error;

/// Why a pipeline run did not succeed
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The schema could not be read or imported; nothing else ran
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The run finished and reported problems, sorted by location
    #[error("{} problem(s) found", .0.len())]
    Diagnostics(Vec<Diagnostic>),

    #[error("pipeline cancelled")]
    Cancelled,

    /// The IR itself failed in a way no stage could recover from
    #[error(transparent)]
    Ir(IrError),
}

impl PipelineError {
    /// Diagnostics carried by the error; a schema failure is reported as one
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            Self::Diagnostics(diagnostics) => diagnostics,
            Self::Schema(error) => vec![error.into()],
            Self::Ir(error) => vec![error.into()],
            Self::Cancelled => Vec::new(),
        }
    }
}

impl From<IrError> for PipelineError {
    fn from(error: IrError) -> Self {
        match error {
            IrError::Cancelled => Self::Cancelled,
            other => Self::Ir(other),
        }
    }
}
