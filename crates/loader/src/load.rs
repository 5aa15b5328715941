use crate::insert::insert_document;
use crate::plan::{prepare, InlineMarker, PreparedDocument, WorkItem};
use crossbeam_channel::Receiver;
use houdini_ir::{
    inline_component_fields, raw_documents, Cancellation, IrError, IrStore, SqlContext,
};
use houdini_types::{Diagnostic, DiagnosticSink, Position};
use std::num::NonZeroUsize;
use threadpool::ThreadPool;

/// Items the producer may queue before it waits on the workers
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// How the loader spreads its work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub workers: usize,
    pub channel_capacity: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// What a load wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub documents: usize,
    pub selections: usize,
}

impl std::ops::AddAssign for LoadSummary {
    fn add_assign(&mut self, other: Self) {
        self.documents += other.documents;
        self.selections += other.selections;
    }
}

/// Load every raw document with the default options
pub fn load_documents(
    store: &IrStore,
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> Result<LoadSummary, IrError> {
    load_documents_with(store, LoadOptions::default(), cancel, sink)
}

/// Parse every raw document and write it into the IR.
///
/// One producer feeds a bounded channel; a pool of workers parses what it
/// receives and, once the channel closes, writes everything it parsed in a
/// single transaction. Problems with individual documents are pushed to
/// `sink` and never stop the load. The error is reserved for failures to
/// read the raw documents and for cancellation.
#[tracing::instrument(skip_all, fields(workers = options.workers))]
pub fn load_documents_with(
    store: &IrStore,
    options: LoadOptions,
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> Result<LoadSummary, IrError> {
    let (documents, markers) = {
        let conn = store.get_cancellable(cancel)?;
        (raw_documents(&conn)?, inline_component_fields(&conn)?)
    };
    tracing::debug!(documents = documents.len(), inline = markers.len(), "Loading documents");

    let workers = options.workers.max(1);
    let (sender, receiver) = crossbeam_channel::bounded::<WorkItem>(options.channel_capacity);
    let (report_sender, reports) = crossbeam_channel::unbounded::<LoadSummary>();

    let pool = ThreadPool::with_name("houdini-loader".to_string(), workers);
    for _ in 0..workers {
        let receiver = receiver.clone();
        let store = store.clone();
        let cancel = cancel.clone();
        let sink = sink.clone();
        let report_sender = report_sender.clone();
        pool.execute(move || {
            let summary = run_worker(&store, &receiver, &cancel, &sink);
            let _ = report_sender.send(summary);
        });
    }
    drop(receiver);
    drop(report_sender);

    for raw in documents {
        let inline = markers.get(&raw.id).map(|prop| InlineMarker { prop: prop.clone() });
        let item = WorkItem { raw, inline };
        crossbeam_channel::select! {
            send(sender, item) -> sent => {
                if sent.is_err() {
                    tracing::warn!("Every loader worker has stopped");
                    break;
                }
            }
            recv(cancel.receiver()) -> _ => {
                tracing::debug!("Load cancelled, no more documents will be queued");
                break;
            }
        }
    }
    drop(sender);
    pool.join();

    if pool.panic_count() > 0 {
        sink.push(Diagnostic::internal(format!(
            "{} loader worker(s) panicked",
            pool.panic_count()
        )));
    }
    if cancel.is_cancelled() {
        return Err(IrError::Cancelled);
    }

    let mut summary = LoadSummary::default();
    for report in reports.try_iter() {
        summary += report;
    }
    tracing::debug!(
        documents = summary.documents,
        selections = summary.selections,
        "Documents loaded"
    );
    Ok(summary)
}

fn run_worker(
    store: &IrStore,
    receiver: &Receiver<WorkItem>,
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> LoadSummary {
    // drain even when cancelled so the producer never blocks on a full channel
    let mut prepared = Vec::new();
    for item in receiver {
        let (document, diagnostics) = prepare(item);
        sink.extend(diagnostics);
        prepared.extend(document);
    }

    if prepared.is_empty() || cancel.is_cancelled() {
        return LoadSummary::default();
    }
    match write_batch(store, &prepared, cancel, sink) {
        Ok(summary) => summary,
        Err(IrError::Cancelled) => LoadSummary::default(),
        Err(error) => {
            tracing::warn!(%error, documents = prepared.len(), "Loader batch rolled back");
            sink.push(error.into());
            LoadSummary::default()
        }
    }
}

/// Write one worker's documents in a single transaction. Each document gets
/// a savepoint, so a document that fails to insert is dropped on its own.
fn write_batch(
    store: &IrStore,
    prepared: &[PreparedDocument],
    cancel: &Cancellation,
    sink: &DiagnosticSink,
) -> Result<LoadSummary, IrError> {
    const UNDO: &str = "ROLLBACK TO document; RELEASE document";

    let mut conn = store.get_cancellable(cancel)?;
    store.write(&mut conn, |tx| {
        let mut summary = LoadSummary::default();
        for document in prepared {
            if cancel.is_cancelled() {
                return Err(IrError::Cancelled);
            }

            tx.execute_batch("SAVEPOINT document")
                .sql_context("could not open savepoint", "SAVEPOINT document")?;
            match insert_document(tx, document) {
                Ok(inserted) => {
                    tx.execute_batch("RELEASE document")
                        .sql_context("could not release savepoint", "RELEASE document")?;
                    summary += inserted;
                }
                Err(error) => {
                    tx.execute_batch(UNDO)
                        .sql_context("could not roll back savepoint", UNDO)?;
                    let diagnostic: Diagnostic = error.into();
                    sink.push(diagnostic.with_location(document.locate(Position::new(1, 1))));
                }
            }
        }
        Ok(summary)
    })
}
