//! Diagnostics reported by every stage of the pipeline.

use crate::SourceLocation;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Anything that doesn't fit another category
    Generic,
    /// A validation rule (or a loader convention check) matched
    Validation,
    /// A schema or document could not be parsed
    Parse,
    /// An IR operation failed unexpectedly
    Internal,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::Validation => write!(f, "validation"),
            Self::Parse => write!(f, "parse"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// A user-facing error with one or more source locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    pub kind: DiagnosticKind,
    /// Extra context (the failing SQL statement, the parser's raw output, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub locations: Vec<SourceLocation>,
    /// Rule identifier for validation diagnostics (e.g., `"fragment_cycles"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic without locations
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            detail: None,
            locations: Vec::new(),
            rule: None,
        }
    }

    /// Create a validation diagnostic attributed to a rule
    #[must_use]
    pub fn validation(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: Some(rule.into()),
            ..Self::new(DiagnosticKind::Validation, message)
        }
    }

    /// Create a parse diagnostic
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Parse, message)
    }

    /// Create an internal diagnostic
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Internal, message)
    }

    /// Attach a single location
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// Attach several locations
    #[must_use]
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = SourceLocation>) -> Self {
        self.locations.extend(locations);
        self
    }

    /// Attach extra detail
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The first location, which is where editors jump to
    #[must_use]
    pub fn primary_location(&self) -> Option<&SourceLocation> {
        self.locations.first()
    }

    /// Ordering key used to present diagnostics deterministically
    #[must_use]
    pub fn sort_key(&self) -> (Option<&SourceLocation>, &str) {
        (self.primary_location(), self.message.as_str())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.primary_location() {
            Some(location) => write!(f, "{location}: {}: {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Shared, append-only list of diagnostics.
///
/// Cloning the sink clones the handle, not the contents, so it can be handed
/// to every worker thread of a stage.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    inner: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.inner.lock().push(diagnostic);
    }

    pub fn extend(&self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.inner.lock().extend(diagnostics);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of everything collected so far
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.inner.lock().clone()
    }

    /// Move everything collected so far out of the sink
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.inner.lock())
    }
}
