//! Binding type resolution.
//!
//! For every attribute assignment the resolver computes the type the binding
//! target accepts and the type the bound value has. Results are memoized per
//! [`AssignmentId`] in a [`BindingTypeCache`] owned by the caller, so the
//! memo lives exactly as long as the parsed document it belongs to.

use std::cell::RefCell;
use std::rc::Rc;

use litho_canon::SimpleType;
use litho_carton::FxHashMap;
use litho_relief::{
    AssignmentId, AssignmentKind, AttributeAssignment, BindingKind, NodeAttribute,
    TemplateDocument,
};
use serde::Serialize;

use crate::directive::{recognize_directive, DirectiveInfo};
use crate::host::TypeProvider;
use crate::knowledge::HtmlKnowledgeBase;

/// Resolved types of one binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingTypes {
    /// Type the target accepts. `any` when the target is unknown.
    pub target: SimpleType,
    pub target_found: bool,
    /// Value type after directive overrides
    pub value: SimpleType,
    /// Value type as written
    pub raw_value: SimpleType,
    pub directive: Option<DirectiveInfo>,
}

/// Per-document memo of resolved binding types.
#[derive(Debug, Default)]
pub struct BindingTypeCache {
    entries: RefCell<FxHashMap<AssignmentId, Rc<BindingTypes>>>,
}

impl BindingTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Resolves binding types for one parsed document.
pub struct BindingTypeResolver<'a> {
    knowledge: &'a HtmlKnowledgeBase,
    types: &'a dyn TypeProvider,
    file_name: &'a str,
    tree: &'a TemplateDocument,
    cache: &'a BindingTypeCache,
}

impl<'a> BindingTypeResolver<'a> {
    pub fn new(
        knowledge: &'a HtmlKnowledgeBase,
        types: &'a dyn TypeProvider,
        file_name: &'a str,
        tree: &'a TemplateDocument,
        cache: &'a BindingTypeCache,
    ) -> Self {
        Self {
            knowledge,
            types,
            file_name,
            tree,
            cache,
        }
    }

    pub fn knowledge(&self) -> &'a HtmlKnowledgeBase {
        self.knowledge
    }

    pub fn file_name(&self) -> &'a str {
        self.file_name
    }

    /// Resolve an assignment, memoized by its id.
    pub fn resolve(&self, assignment: &AttributeAssignment) -> Rc<BindingTypes> {
        if let Some(cached) = self.cache.entries.borrow().get(&assignment.id) {
            return cached.clone();
        }

        let attribute = self.tree.attribute(assignment.attribute);
        let resolved = Rc::new(self.compute(attribute, assignment));
        self.cache
            .entries
            .borrow_mut()
            .insert(assignment.id, resolved.clone());
        resolved
    }

    /// Type an attribute's target accepts, and whether the target is known.
    pub fn target_type(&self, attribute: &NodeAttribute) -> (SimpleType, bool) {
        let tag = self.tree.node(attribute.node).lower_name();
        let name = attribute.name.as_str();
        let found = match attribute.kind {
            BindingKind::Plain | BindingKind::BooleanPresence => self
                .knowledge
                .attribute(&tag, name)
                .map(|d| d.get_type().clone()),
            BindingKind::PropertyBinding => self
                .knowledge
                .property(&tag, name)
                .or_else(|| self.knowledge.attribute(&tag, name))
                .map(|d| d.get_type().clone()),
            BindingKind::EventListener => self
                .knowledge
                .event(&tag, name)
                .map(|d| d.get_type().clone()),
        };
        match found {
            Some(ty) => (ty, true),
            None => (SimpleType::Any, false),
        }
    }

    fn compute(&self, attribute: &NodeAttribute, assignment: &AttributeAssignment) -> BindingTypes {
        let (target, target_found) = self.target_type(attribute);

        let raw_value = match &assignment.kind {
            AssignmentKind::StringLiteral(value) => SimpleType::StringLiteral(value.clone()),
            AssignmentKind::BooleanPresence => SimpleType::BooleanLiteral(true),
            AssignmentKind::Expression(expr) => self.types.type_of(self.file_name, &expr.expression),
            AssignmentKind::Mixed(_) => match (attribute.kind, assignment.kind.first_expression()) {
                (BindingKind::EventListener, Some(expr)) => {
                    self.types.type_of(self.file_name, &expr.expression)
                }
                _ => SimpleType::String,
            },
        };

        let directive = match &assignment.kind {
            AssignmentKind::Expression(expr) => {
                recognize_directive(self.types, self.file_name, expr, &raw_value)
            }
            _ => None,
        };
        let value = directive
            .as_ref()
            .and_then(|d| d.actual_type.clone())
            .unwrap_or_else(|| raw_value.clone());

        tracing::trace!(
            attribute = %attribute.name,
            %target,
            %value,
            "resolved binding"
        );

        BindingTypes {
            target,
            target_found,
            value,
            raw_value,
            directive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::builtin_collection;
    use crate::layer::KnowledgeLayer;
    use litho_carton::FxHashMap;
    use litho_stencil::{extract_documents, HostExpression, LiteralTags};

    struct Types(FxHashMap<&'static str, SimpleType>);

    impl TypeProvider for Types {
        fn type_of(&self, _file_name: &str, expression: &HostExpression) -> SimpleType {
            self.0
                .get(expression.text.as_str())
                .cloned()
                .unwrap_or(SimpleType::Unknown)
        }
    }

    fn types() -> Types {
        let mut map = FxHashMap::default();
        map.insert("n", SimpleType::Number);
        map.insert(
            "maybe",
            SimpleType::union([SimpleType::String, SimpleType::Undefined]),
        );
        map.insert("onClick", SimpleType::function(vec![], SimpleType::Void));
        Types(map)
    }

    fn resolve_all(source: &str) -> Vec<(String, BindingTypes)> {
        let mut knowledge = HtmlKnowledgeBase::new();
        knowledge.absorb(KnowledgeLayer::BuiltIn, builtin_collection());
        let docs = extract_documents("a.ts", source, &LiteralTags::default()).unwrap();
        let tree = litho_armature::parse(&docs[0]);
        let types = types();
        let cache = BindingTypeCache::new();
        let resolver = BindingTypeResolver::new(&knowledge, &types, "a.ts", &tree, &cache);
        tree.assignments()
            .iter()
            .map(|a| {
                let name = tree.attribute(a.attribute).name.to_string();
                (name, (*resolver.resolve(a)).clone())
            })
            .collect()
    }

    #[test]
    fn test_literal_and_presence_values() {
        let resolved = resolve_all(r#"html`<input maxlength="50" disabled>`"#);
        assert_eq!(resolved[0].1.target, SimpleType::Number);
        assert_eq!(resolved[0].1.value, SimpleType::string_literal("50"));
        assert_eq!(resolved[1].1.value, SimpleType::BooleanLiteral(true));
        assert!(resolved[1].1.target_found);
    }

    #[test]
    fn test_property_falls_back_to_attribute() {
        let resolved = resolve_all(r#"html`<input .maxLength=${n} .size=${n}>`"#);
        assert_eq!(resolved[0].1.target, SimpleType::Number);
        assert!(resolved[1].1.target_found);
    }

    #[test]
    fn test_unknown_target_is_any() {
        let resolved = resolve_all(r#"html`<x-el .foo=${n}>`"#);
        assert!(!resolved[0].1.target_found);
        assert_eq!(resolved[0].1.target, SimpleType::Any);
        assert_eq!(resolved[0].1.value, SimpleType::Number);
    }

    #[test]
    fn test_directive_override() {
        let resolved = resolve_all(r#"html`<a href="${ifDefined(maybe)}">`"#);
        let types = &resolved[0].1;
        assert_eq!(types.value, SimpleType::String);
        assert!(types.raw_value.is_opaque());
        assert!(types.directive.is_some());
    }

    #[test]
    fn test_mixed_values() {
        let resolved = resolve_all(r#"html`<div title="a ${n}" @click="${onClick} ">`"#);
        assert_eq!(resolved[0].1.value, SimpleType::String);
        assert!(resolved[1].1.value.is_callable());
    }

    #[test]
    fn test_resolved_types_display() {
        let resolved = resolve_all(r#"html`<input maxlength="50" ?disabled=${maybe} .foo=${n}>`"#);
        let lines: Vec<String> = resolved
            .iter()
            .map(|(name, types)| format!("{}: {} <- {}", name, types.target, types.value))
            .collect();
        insta::assert_snapshot!(lines.join("\n"), @r#"
        maxlength: number <- "50"
        disabled: boolean <- string | undefined
        foo: any <- number
        "#);
    }

    #[test]
    fn test_resolution_is_memoized() {
        let mut knowledge = HtmlKnowledgeBase::new();
        knowledge.absorb(KnowledgeLayer::BuiltIn, builtin_collection());
        let docs =
            extract_documents("a.ts", "html`<input .value=${n}>`", &LiteralTags::default()).unwrap();
        let tree = litho_armature::parse(&docs[0]);
        let types = types();
        let cache = BindingTypeCache::new();
        let resolver = BindingTypeResolver::new(&knowledge, &types, "a.ts", &tree, &cache);

        let assignment = &tree.assignments()[0];
        let first = resolver.resolve(assignment);
        let second = resolver.resolve(assignment);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
