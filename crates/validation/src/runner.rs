use crate::{all_rules, RuleContext, ValidationRule};
use houdini_config::ProjectConfig;
use houdini_ir::{Cancellation, IrError, IrStore};
use houdini_types::{Diagnostic, DiagnosticSink};
use std::sync::Arc;
use threadpool::ThreadPool;

/// What a validation run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Rules that ran to completion
    pub rules: usize,
    /// Diagnostics those rules reported
    pub diagnostics: usize,
}

/// Run every registered rule
pub fn validate(
    store: &IrStore,
    config: &ProjectConfig,
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> Result<ValidationSummary, IrError> {
    validate_with(store, config, all_rules(), cancel, sink)
}

/// Run `rules` concurrently against the IR.
///
/// Each rule runs on its own thread with its own pooled connection and
/// pushes what it finds into `sink`. A rule that fails is reported as an
/// internal diagnostic and does not stop the others. When `cancel` fires,
/// rules stop at their next query and whatever was already reported stays
/// in the sink.
#[tracing::instrument(skip_all, fields(rules = rules.len()))]
pub fn validate_with(
    store: &IrStore,
    config: &ProjectConfig,
    rules: &[Arc<dyn ValidationRule>],
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> Result<ValidationSummary, IrError> {
    let config = Arc::new(config.clone());
    let (report_sender, reports) = crossbeam_channel::unbounded::<usize>();

    let workers = store.pool_size().clamp(1, rules.len().max(1));
    let pool = ThreadPool::with_name("houdini-validation".to_string(), workers);
    for rule in rules {
        let rule = Arc::clone(rule);
        let store = store.clone();
        let config = Arc::clone(&config);
        let cancel = cancel.clone();
        let sink = sink.clone();
        let report_sender = report_sender.clone();
        pool.execute(move || {
            if let Some(found) = run_rule(rule.as_ref(), &store, &config, &cancel, &sink) {
                let _ = report_sender.send(found);
            }
        });
    }
    drop(report_sender);
    pool.join();

    if pool.panic_count() > 0 {
        sink.push(Diagnostic::internal(format!(
            "{} validation rule(s) panicked",
            pool.panic_count()
        )));
    }
    if cancel.is_cancelled() {
        return Err(IrError::Cancelled);
    }

    let mut summary = ValidationSummary::default();
    for found in reports.try_iter() {
        summary.rules += 1;
        summary.diagnostics += found;
    }
    tracing::debug!(
        rules = summary.rules,
        diagnostics = summary.diagnostics,
        "Validation finished"
    );
    Ok(summary)
}

/// Run one rule. Returns how many diagnostics it reported, or `None` if it
/// did not finish.
fn run_rule(
    rule: &dyn ValidationRule,
    store: &IrStore,
    config: &ProjectConfig,
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> Option<usize> {
    let _span = tracing::debug_span!("rule", name = rule.name()).entered();

    let result = store.get_cancellable(cancel).and_then(|conn| {
        let ctx = RuleContext::new(&conn, config, cancel);
        rule.check(&ctx)
    });
    match result {
        Ok(diagnostics) => {
            let found = diagnostics.len();
            tracing::trace!(found, "Rule finished");
            sink.extend(diagnostics);
            Some(found)
        }
        Err(IrError::Cancelled) => {
            tracing::trace!("Rule cancelled");
            None
        }
        Err(error) => {
            tracing::warn!(%error, "Rule failed");
            let mut diagnostic = Diagnostic::from(error);
            diagnostic.message = format!("rule {} failed: {}", rule.name(), diagnostic.message);
            diagnostic.rule = Some(rule.name().to_string());
            sink.push(diagnostic);
            None
        }
    }
}
