//! Rule trait and registry for template rules.

use litho_croquis::BindingTypes;
use litho_relief::{AttributeAssignment, NodeAttribute, TemplateNode};

use crate::config::{RuleSettings, RuleSeverity};
use crate::context::RuleContext;
use crate::diagnostic::Severity;

/// Rule metadata
pub struct RuleMeta {
    /// Rule name (e.g., "no-unknown-tag-name")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Severity when the rule is not configured
    pub default: RuleSeverity,
    /// Severity under the strict preset
    pub strict: RuleSeverity,
}

impl RuleMeta {
    /// Effective severity under the given settings.
    #[inline]
    pub fn severity(&self, settings: &RuleSettings) -> Option<Severity> {
        settings.severity(self.name, self.default, self.strict)
    }
}

/// Rule trait for implementing template rules
///
/// Rules implement hook methods that are called during the tree walk.
/// Each method receives a mutable reference to RuleContext for reporting diagnostics.
pub trait Rule: Send + Sync {
    /// Get rule metadata
    fn meta(&self) -> &'static RuleMeta;

    /// Called for every node in pre-order
    #[allow(unused_variables)]
    fn on_node(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode) {}

    /// Called for every attribute of an element node
    #[allow(unused_variables)]
    fn on_attribute(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode, attribute: &NodeAttribute) {
    }

    /// Called for every attribute assignment of an element node, with its
    /// resolved binding types
    #[allow(unused_variables)]
    fn on_assignment(
        &self,
        ctx: &mut RuleContext<'_>,
        node: &TemplateNode,
        attribute: &NodeAttribute,
        assignment: &AttributeAssignment,
        types: &BindingTypes,
    ) {
    }
}

/// Registry holding the markup rules, in registration order
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|rule| rule.meta().name == name)
            .map(|rule| rule.as_ref())
    }

    /// Create registry with every markup rule.
    ///
    /// Whether a rule runs is decided per request from [`RuleSettings`];
    /// the registration order below is the order diagnostics come out in.
    pub fn with_all() -> Self {
        let mut registry = Self::new();

        // ============================================
        // Tree rules
        // ============================================

        registry.register(Box::new(crate::rules::NoUnknownTagName));
        registry.register(Box::new(crate::rules::NoMissingImport));
        registry.register(Box::new(crate::rules::NoUnclosedTag));

        // ============================================
        // Name rules
        // ============================================

        registry.register(Box::new(crate::rules::NoUnknownAttribute));
        registry.register(Box::new(crate::rules::NoUnknownProperty));
        registry.register(Box::new(crate::rules::NoUnknownEvent));
        registry.register(Box::new(crate::rules::NoUnknownSlot));

        // ============================================
        // Binding rules
        // ============================================

        registry.register(Box::new(crate::rules::NoInvalidBooleanBinding));
        registry.register(Box::new(crate::rules::NoExpressionlessPropertyBinding));
        registry.register(Box::new(crate::rules::NoNoncallableEventBinding));
        registry.register(Box::new(crate::rules::NoComplexAttributeBinding));
        registry.register(Box::new(crate::rules::NoNullableAttributeBinding));
        registry.register(Box::new(crate::rules::NoIncompatibleTypeBinding));
        registry.register(Box::new(crate::rules::NoInvalidDirectiveBinding));

        registry
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
