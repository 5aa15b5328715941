use crate::PipelineError;
use houdini_config::ProjectConfig;
use houdini_ir::{Cancellation, IrStore};
use houdini_loader::{
    load_documents, rewrite_component_fields, rewrite_runtime_scalars, LoadSummary,
};
use houdini_schema::{import_schema, import_schema_file, SchemaSummary};
use houdini_types::{Diagnostic, DiagnosticSink};
use houdini_validation::{validate, ValidationSummary};

/// What a successful run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub schema: SchemaSummary,
    pub load: LoadSummary,
    pub component_fields: usize,
    pub runtime_scalars: usize,
    pub validation: ValidationSummary,
}

/// Import `schema_source`, then process every raw document in the store.
#[tracing::instrument(skip_all)]
pub fn run(
    store: &IrStore,
    config: &ProjectConfig,
    schema_source: &str,
    cancel: &Cancellation,
) -> Result<PipelineSummary, PipelineError> {
    let path = config.resolved_schema_path();
    let schema = import_schema(store, schema_source, &path.display().to_string())?;
    process_documents(store, config, schema, cancel)
}

/// Like [`run`], reading the schema from the path in `config`
#[tracing::instrument(skip_all)]
pub fn run_with_schema_file(
    store: &IrStore,
    config: &ProjectConfig,
    cancel: &Cancellation,
) -> Result<PipelineSummary, PipelineError> {
    let schema = import_schema_file(store, config)?;
    process_documents(store, config, schema, cancel)
}

fn process_documents(
    store: &IrStore,
    config: &ProjectConfig,
    schema: SchemaSummary,
    cancel: &Cancellation,
) -> Result<PipelineSummary, PipelineError> {
    let sink = DiagnosticSink::new();
    let mut summary = PipelineSummary {
        schema,
        ..PipelineSummary::default()
    };

    summary.load = load_documents(store, cancel, &sink)?;
    summary.component_fields = rewrite_component_fields(store, cancel, &sink)?;
    summary.runtime_scalars = rewrite_runtime_scalars(store, config, cancel)?;
    summary.validation = validate(store, config, cancel, &sink)?;

    let mut diagnostics = sink.take();
    if diagnostics.is_empty() {
        tracing::debug!(
            documents = summary.load.documents,
            rules = summary.validation.rules,
            "Pipeline finished cleanly"
        );
        return Ok(summary);
    }

    sort_diagnostics(&mut diagnostics);
    tracing::debug!(diagnostics = diagnostics.len(), "Pipeline finished with problems");
    Err(PipelineError::Diagnostics(diagnostics))
}

/// Order by file, line, column, then message
fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
