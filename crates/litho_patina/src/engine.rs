//! Rule engine entry point.
//!
//! Walks a parsed template in pre-order and feeds every node, attribute and
//! assignment to the enabled rules. Rules run in registration order for
//! each hook and every diagnostic they report is kept.

use litho_carton::{CompactString, FxHashSet};
use litho_croquis::{BindingTypeCache, BindingTypeResolver, HtmlKnowledgeBase, TypeProvider};
use litho_relief::{NodeKind, TemplateDocument};
use litho_stencil::VirtualDocument;

use crate::config::RuleSettings;
use crate::context::RuleContext;
use crate::diagnostic::{Severity, TemplateDiagnostic};
use crate::rule::{Rule, RuleRegistry};

/// Everything one markup check reads.
pub struct MarkupInput<'a> {
    pub document: &'a VirtualDocument,
    pub tree: &'a TemplateDocument,
    pub knowledge: &'a HtmlKnowledgeBase,
    pub types: &'a dyn TypeProvider,
    /// Binding type memo belonging to `tree`
    pub cache: &'a BindingTypeCache,
    pub settings: &'a RuleSettings,
    /// Files visible from the document's file, if known
    pub visible_files: Option<&'a FxHashSet<CompactString>>,
}

/// Check result for a single document
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub diagnostics: Vec<TemplateDiagnostic>,
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
}

impl CheckResult {
    pub fn new(diagnostics: Vec<TemplateDiagnostic>) -> Self {
        let error_count = diagnostics.iter().filter(|d| d.is_error()).count();
        Self {
            warning_count: diagnostics.len() - error_count,
            error_count,
            diagnostics,
        }
    }

    /// Check if there are any errors
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Runs registered rules over parsed templates.
pub struct RuleEngine {
    registry: RuleRegistry,
}

impl RuleEngine {
    /// Create an engine with every rule registered
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::with_all())
    }

    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Check a markup document.
    pub fn check_markup(&self, input: MarkupInput<'_>) -> CheckResult {
        let enabled: Vec<(&dyn Rule, Severity)> = self
            .registry
            .rules()
            .iter()
            .filter_map(|rule| {
                rule.meta()
                    .severity(input.settings)
                    .map(|severity| (rule.as_ref(), severity))
            })
            .collect();
        if enabled.is_empty() {
            return CheckResult::default();
        }

        let resolver = BindingTypeResolver::new(
            input.knowledge,
            input.types,
            input.document.file_name(),
            input.tree,
            input.cache,
        );
        let mut ctx = RuleContext::new(
            input.document,
            input.tree,
            input.knowledge,
            &resolver,
            input.settings,
            input.visible_files,
        );

        let tree = input.tree;
        for id in tree.walk() {
            let node = tree.node(id);
            for (rule, severity) in &enabled {
                ctx.enter_rule(rule.meta().name, *severity);
                rule.on_node(&mut ctx, node);
            }

            // Style and svg content is not validated against HTML knowledge.
            if node.kind != NodeKind::Element {
                continue;
            }

            for attribute in tree.attributes_of(id) {
                for (rule, severity) in &enabled {
                    ctx.enter_rule(rule.meta().name, *severity);
                    rule.on_attribute(&mut ctx, node, attribute);
                }

                let Some(assignment) = attribute.assignment.map(|a| tree.assignment(a)) else {
                    continue;
                };
                let types = resolver.resolve(assignment);
                for (rule, severity) in &enabled {
                    ctx.enter_rule(rule.meta().name, *severity);
                    rule.on_assignment(&mut ctx, node, attribute, assignment, &types);
                }
            }
        }

        let diagnostics = ctx.into_diagnostics();
        tracing::debug!(
            file = input.document.file_name(),
            count = diagnostics.len(),
            "checked markup document"
        );
        CheckResult::new(diagnostics)
    }

    /// Check a stylesheet document.
    pub fn check_stylesheet(&self, document: &VirtualDocument, settings: &RuleSettings) -> CheckResult {
        CheckResult::new(crate::css::check_stylesheet(document, settings))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
