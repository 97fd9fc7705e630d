//! Rule context for rule execution.

use litho_carton::{CompactString, FxHashSet, SourceRange};
use litho_croquis::{BindingTypeResolver, HtmlKnowledgeBase};
use litho_relief::TemplateDocument;
use litho_stencil::VirtualDocument;

use crate::config::RuleSettings;
use crate::diagnostic::{DocumentRef, Severity, TemplateDiagnostic};

/// Rule context provides what rules read and collects what they report.
pub struct RuleContext<'a> {
    /// Document being checked
    pub document: &'a VirtualDocument,
    pub tree: &'a TemplateDocument,
    pub knowledge: &'a HtmlKnowledgeBase,
    pub resolver: &'a BindingTypeResolver<'a>,
    pub settings: &'a RuleSettings,
    /// Files whose component declarations are visible from this document.
    /// `None` when the host cannot answer import queries.
    pub visible_files: Option<&'a FxHashSet<CompactString>>,
    document_ref: DocumentRef,
    diagnostics: Vec<TemplateDiagnostic>,
    /// Current rule name (set by the engine before calling rule methods)
    current_rule: &'static str,
    current_severity: Severity,
}

impl<'a> RuleContext<'a> {
    /// Initial capacity for diagnostics vector
    const INITIAL_DIAGNOSTICS_CAPACITY: usize = 8;

    pub fn new(
        document: &'a VirtualDocument,
        tree: &'a TemplateDocument,
        knowledge: &'a HtmlKnowledgeBase,
        resolver: &'a BindingTypeResolver<'a>,
        settings: &'a RuleSettings,
        visible_files: Option<&'a FxHashSet<CompactString>>,
    ) -> Self {
        Self {
            document,
            tree,
            knowledge,
            resolver,
            settings,
            visible_files,
            document_ref: DocumentRef::of(document),
            diagnostics: Vec::with_capacity(Self::INITIAL_DIAGNOSTICS_CAPACITY),
            current_rule: "",
            current_severity: Severity::Warning,
        }
    }

    /// Select the rule subsequent reports belong to.
    #[inline]
    pub(crate) fn enter_rule(&mut self, rule: &'static str, severity: Severity) {
        self.current_rule = rule;
        self.current_severity = severity;
    }

    /// A diagnostic for the current rule, not yet reported.
    #[inline]
    pub fn diagnostic(&self, range: SourceRange, message: impl Into<CompactString>) -> TemplateDiagnostic {
        TemplateDiagnostic::new(
            self.current_rule,
            self.current_severity,
            self.document_ref.clone(),
            range,
            message,
        )
    }

    #[inline]
    pub fn report(&mut self, diagnostic: TemplateDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report a plain message at a range.
    #[inline]
    pub fn report_at(&mut self, range: SourceRange, message: impl Into<CompactString>) {
        let diagnostic = self.diagnostic(range, message);
        self.report(diagnostic);
    }

    /// Source text of a document range.
    #[inline]
    pub fn text(&self, range: SourceRange) -> &'a str {
        range.slice(self.document.text()).unwrap_or_default()
    }

    #[inline]
    pub fn diagnostics(&self) -> &[TemplateDiagnostic] {
        &self.diagnostics
    }

    #[inline]
    pub fn into_diagnostics(self) -> Vec<TemplateDiagnostic> {
        self.diagnostics
    }
}
