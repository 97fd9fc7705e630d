//! # litho_patina
//!
//! Patina - Diagnostic rules for Litho templates.
//!
//! ## Name Origin
//!
//! **Patina** is the thin layer that forms on the surface of a stone or
//! bronze print over time, revealing its character. `litho_patina` brings out
//! what is wrong with a template: unknown names, bindings whose values do not
//! fit their targets, unclosed tags and broken stylesheets.
//!
//! ## Rules
//!
//! | Rule | Default | Strict |
//! |------|---------|--------|
//! | `no-unknown-tag-name` | warn | warn |
//! | `no-missing-import` | off | warn |
//! | `no-unclosed-tag` | warn | error |
//! | `no-unknown-attribute` | off | warn |
//! | `no-unknown-property` | warn | warn |
//! | `no-unknown-event` | off | warn |
//! | `no-unknown-slot` | warn | warn |
//! | `no-invalid-boolean-binding` | error | error |
//! | `no-expressionless-property-binding` | error | error |
//! | `no-noncallable-event-binding` | error | error |
//! | `no-complex-attribute-binding` | error | error |
//! | `no-nullable-attribute-binding` | error | error |
//! | `no-incompatible-type-binding` | error | error |
//! | `no-invalid-directive-binding` | error | error |
//! | `no-invalid-css` | warn | error |
//!
//! ## Architecture
//!
//! ```text
//!  litho_croquis (Knowledge + Types)
//!        ↓
//!  litho_patina (Rules)  ← This crate
//!        ↓
//!      litho (Session)
//! ```

pub mod config;
pub mod context;
pub mod css;
pub mod diagnostic;
pub mod engine;
pub mod rule;
pub mod rules;

pub use config::{
    RuleSettings, RuleSeverity, SecurityOverrides, SecuritySystem, DEFAULT_SUGGESTION_DISTANCE,
};
pub use context::RuleContext;
pub use diagnostic::{
    format_names, DiagnosticKind, DiagnosticPayload, DocumentRef, Severity, TemplateDiagnostic,
};
pub use engine::{CheckResult, MarkupInput, RuleEngine};
pub use rule::{Rule, RuleMeta, RuleRegistry};

#[cfg(test)]
pub(crate) mod test_utils {
    use litho_canon::SimpleType;
    use litho_carton::{CompactString, FxHashMap, FxHashSet};
    use litho_croquis::builtins::{builtin_collection, extension_collection};
    use litho_croquis::{
        BindingTypeCache, HtmlCollection, HtmlKnowledgeBase, KnowledgeLayer, TypeProvider,
    };
    use litho_stencil::{extract_documents, HostExpression, LiteralTags};

    use crate::config::{RuleSettings, RuleSeverity};
    use crate::engine::{CheckResult, MarkupInput, RuleEngine};
    use crate::rule::{Rule, RuleRegistry};

    /// Types keyed by expression text.
    #[derive(Default)]
    pub struct Types(pub FxHashMap<CompactString, SimpleType>);

    impl TypeProvider for Types {
        fn type_of(&self, _file_name: &str, expression: &HostExpression) -> SimpleType {
            self.0
                .get(expression.text.trim())
                .cloned()
                .unwrap_or(SimpleType::Unknown)
        }
    }

    pub struct Fixture {
        pub knowledge: HtmlKnowledgeBase,
        pub types: Types,
        pub settings: RuleSettings,
        pub visible_files: Option<FxHashSet<CompactString>>,
    }

    impl Fixture {
        pub fn new() -> Self {
            let mut knowledge = HtmlKnowledgeBase::new();
            knowledge.absorb(KnowledgeLayer::BuiltIn, builtin_collection());
            knowledge.absorb(KnowledgeLayer::DeclaredExtension, extension_collection());
            let mut types = Types::default();
            types.0.insert("n".into(), SimpleType::Number);
            types.0.insert("s".into(), SimpleType::String);
            types.0.insert("b".into(), SimpleType::Boolean);
            Self {
                knowledge,
                types,
                settings: RuleSettings::default(),
                visible_files: None,
            }
        }

        pub fn with_type(mut self, text: &str, ty: SimpleType) -> Self {
            self.types.0.insert(text.into(), ty);
            self
        }

        pub fn with_components(mut self, collection: HtmlCollection) -> Self {
            self.knowledge
                .absorb(KnowledgeLayer::StaticallyDiscovered, collection);
            self
        }

        /// Run every registered rule.
        pub fn check_all(&self, source: &str) -> CheckResult {
            self.run(&RuleEngine::new(), &self.settings, source)
        }

        /// Run a single rule, enabling it if it is off by default.
        pub fn check(&self, rule: impl Rule + 'static, source: &str) -> CheckResult {
            let meta = rule.meta();
            let mut settings = self.settings.clone();
            if meta.default == RuleSeverity::Off && !settings.rules.contains_key(meta.name) {
                settings.rules.insert(meta.name.into(), meta.strict);
            }
            let mut registry = RuleRegistry::new();
            registry.register(Box::new(rule));
            self.run(&RuleEngine::with_registry(registry), &settings, source)
        }

        fn run(&self, engine: &RuleEngine, settings: &RuleSettings, source: &str) -> CheckResult {
            let docs = extract_documents("test.ts", source, &LiteralTags::default()).unwrap();
            let document = &docs[0];
            let tree = litho_armature::parse(document);
            let cache = BindingTypeCache::new();
            engine.check_markup(MarkupInput {
                document,
                tree: &tree,
                knowledge: &self.knowledge,
                types: &self.types,
                cache: &cache,
                settings,
                visible_files: self.visible_files.as_ref(),
            })
        }
    }
}
