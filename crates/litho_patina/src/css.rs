//! Stylesheet validation for `css` literals and `<style>` bodies.
//!
//! Validation is delegated to lightning-css: a document that fails to parse
//! yields one `no-invalid-css` diagnostic at the reported position.
//! Interpolation placeholders are runs of `_`, which parse as identifiers,
//! so `${value}` holes never produce errors of their own.

use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use litho_carton::SourceRange;
use litho_stencil::VirtualDocument;

use crate::config::{RuleSettings, RuleSeverity};
use crate::diagnostic::{DiagnosticKind, DiagnosticPayload, DocumentRef, TemplateDiagnostic};
use crate::rule::RuleMeta;

pub static META: RuleMeta = RuleMeta {
    name: "no-invalid-css",
    description: "Disallow stylesheets that fail to parse",
    default: RuleSeverity::Warn,
    strict: RuleSeverity::Error,
};

/// Validate a stylesheet document.
pub fn check_stylesheet(document: &VirtualDocument, settings: &RuleSettings) -> Vec<TemplateDiagnostic> {
    let Some(severity) = META.severity(settings) else {
        return Vec::new();
    };

    let source = document.text();
    let error = match StyleSheet::parse(source, ParserOptions::default()) {
        Ok(_) => return Vec::new(),
        Err(error) => error,
    };

    // lightning-css reports zero-based lines and one-based columns.
    let (line, column) = error
        .loc
        .as_ref()
        .map(|loc| (loc.line, loc.column.saturating_sub(1)))
        .unwrap_or((0, 0));
    let offset = line_column_to_offset(source, line, column);
    let end = (offset + 1).min(source.len() as u32);

    tracing::debug!(
        file = document.file_name(),
        line,
        column,
        "stylesheet failed to parse"
    );

    vec![TemplateDiagnostic::new(
        META.name,
        severity,
        DocumentRef::of(document),
        SourceRange::new(offset, end.max(offset)),
        error.kind.to_string(),
    )
    .with_kind(DiagnosticKind::Stylesheet)
    .with_payload(DiagnosticPayload::Css { line, column })]
}

/// Byte offset of a zero-based line and column, clamped to the text.
fn line_column_to_offset(source: &str, line: u32, column: u32) -> u32 {
    let bytes = source.as_bytes();
    let line_start = if line == 0 {
        0
    } else {
        memchr::memchr_iter(b'\n', bytes)
            .nth(line as usize - 1)
            .map(|newline| newline + 1)
            .unwrap_or(bytes.len())
    };
    let line_end = memchr::memchr(b'\n', &bytes[line_start..])
        .map(|i| line_start + i)
        .unwrap_or(bytes.len());
    (line_start + column as usize).min(line_end) as u32
}
