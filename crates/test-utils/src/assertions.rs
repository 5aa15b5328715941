//! Snapshot formatting for diagnostics
//!
//! Diagnostics are formatted consistently for readable snapshots.

use houdini_types::Diagnostic;

/// Format diagnostics one per line with their location, kind and rule.
///
/// # Example
///
/// ```ignore
/// use houdini_test_utils::{format_diagnostics, TestProject};
///
/// let run = TestProject::new(SCHEMA).with_document("a.graphql", "query { me }").run();
/// insta::assert_snapshot!(format_diagnostics(run.diagnostics()));
/// ```
pub fn format_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> String {
    let lines: Vec<String> = diagnostics
        .into_iter()
        .enumerate()
        .map(|(i, diagnostic)| {
            let mut line = format!("[{}] {diagnostic}", i + 1);
            if let Some(rule) = &diagnostic.rule {
                line.push_str(" (");
                line.push_str(rule);
                line.push(')');
            }
            line
        })
        .collect();

    if lines.is_empty() {
        String::from("(no diagnostics)")
    } else {
        lines.join("\n")
    }
}

/// Format diagnostics with their messages only (without position info).
/// Useful when you only care about the error messages, not positions.
pub fn format_diagnostic_messages<'a>(
    diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
) -> String {
    let lines: Vec<String> = diagnostics
        .into_iter()
        .enumerate()
        .map(|(i, diagnostic)| format!("[{}] {}", i + 1, diagnostic.message))
        .collect();

    if lines.is_empty() {
        String::from("(no diagnostics)")
    } else {
        lines.join("\n")
    }
}
