//! Diagnostic types for litho_patina.
//!
//! Uses `CompactString` for efficient small string storage.

use litho_canon::SimpleType;
use litho_carton::{CompactString, SourceRange};
use litho_stencil::VirtualDocument;
use serde::Serialize;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A markup rule
    Template,
    /// Stylesheet validation
    Stylesheet,
    /// The component discovery collaborator
    Discovery,
}

/// The document a diagnostic belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub file_name: CompactString,
    /// Host range of the document
    pub location: SourceRange,
}

impl DocumentRef {
    pub fn of(document: &VirtualDocument) -> Self {
        Self {
            file_name: document.file_name().into(),
            location: document.location(),
        }
    }
}

/// Structured data attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiagnosticPayload {
    None,
    #[serde(rename_all = "camelCase")]
    TypeMismatch {
        target_type: SimpleType,
        value_type: SimpleType,
    },
    #[serde(rename_all = "camelCase")]
    UnknownTarget {
        name: CompactString,
        suggested_name: Option<CompactString>,
    },
    #[serde(rename_all = "camelCase")]
    InvalidSlot { valid_slot_names: Vec<CompactString> },
    #[serde(rename_all = "camelCase")]
    MissingImport {
        tag_name: CompactString,
        declaration_file: CompactString,
    },
    /// Stylesheet parse error position, zero-based line and column
    Css { line: u32, column: u32 },
}

/// A diagnostic produced for a template or stylesheet document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDiagnostic {
    /// Rule that triggered this diagnostic
    pub rule: &'static str,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Range relative to the document text
    pub range: SourceRange,
    pub document: DocumentRef,
    pub message: CompactString,
    pub help: Option<CompactString>,
    pub payload: DiagnosticPayload,
}

impl TemplateDiagnostic {
    #[inline]
    pub fn new(
        rule: &'static str,
        severity: Severity,
        document: DocumentRef,
        range: SourceRange,
        message: impl Into<CompactString>,
    ) -> Self {
        Self {
            rule,
            kind: DiagnosticKind::Template,
            severity,
            range,
            document,
            message: message.into(),
            help: None,
            payload: DiagnosticPayload::None,
        }
    }

    /// Add a help message
    #[inline]
    pub fn with_help(mut self, help: impl Into<CompactString>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[inline]
    pub fn with_payload(mut self, payload: DiagnosticPayload) -> Self {
        self.payload = payload;
        self
    }

    #[inline]
    pub fn with_kind(mut self, kind: DiagnosticKind) -> Self {
        self.kind = kind;
        self
    }

    /// Range in the host file.
    #[inline]
    pub fn host_range(&self) -> SourceRange {
        self.range.shift(self.document.location.start)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Format slot names for messages, e.g. `"" | "right"`.
pub fn format_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(" | ")
}
