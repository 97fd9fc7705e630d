//! no-unknown-property
//!
//! Disallow property bindings to properties a known element does not have.
//!
//! A property binding may also target an attribute of the same name, since
//! many elements reflect attributes into same-named properties.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <input .valeu=${value}>
//! ```
//!
//! ### Valid
//! ```html
//! <input .value=${value}>
//! ```

use litho_relief::{BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};
use crate::rules::{suggest, unknown_target};

static META: RuleMeta = RuleMeta {
    name: "no-unknown-property",
    description: "Disallow unknown properties",
    default: RuleSeverity::Warn,
    strict: RuleSeverity::Warn,
};

/// Disallow unknown properties
pub struct NoUnknownProperty;

impl Rule for NoUnknownProperty {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_attribute(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode, attribute: &NodeAttribute) {
        if attribute.kind != BindingKind::PropertyBinding || !ctx.knowledge.has_tag(&node.tag_name) {
            return;
        }
        let tag = node.lower_name();
        let properties = ctx.knowledge.properties_for_tag(&tag);
        let attributes = ctx.knowledge.attributes_for_tag(&tag);
        if properties.contains(&attribute.name) || attributes.contains(&attribute.name) {
            return;
        }

        let suggested = suggest(
            ctx,
            &attribute.name,
            properties.names().chain(attributes.names()),
        );
        let (payload, help) = unknown_target(&attribute.name, suggested, |s| format!(".{}", s));
        let mut diagnostic = ctx
            .diagnostic(
                attribute.location.name,
                format!("Unknown property '{}' on <{}>.", attribute.name, node.tag_name),
            )
            .with_payload(payload);
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(help);
        }
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticPayload;
    use crate::test_utils::Fixture;
    use litho_canon::SimpleType;
    use litho_carton::SourceRange;
    use litho_croquis::discovery::definitions_to_collection;
    use litho_croquis::{ComponentDefinition, ComponentMember, DeclarationRef};

    fn fixture() -> Fixture {
        let mut definition = ComponentDefinition::new(
            "x-el",
            DeclarationRef {
                file_name: "x-el.ts".into(),
                range: SourceRange::new(0, 10),
            },
        );
        definition
            .members
            .push(ComponentMember::property("food", SimpleType::String));
        Fixture::new().with_components(definitions_to_collection(&[definition]))
    }

    #[test]
    fn test_valid_properties() {
        let result = fixture().check(
            NoUnknownProperty,
            "html`<input .value=${s} .maxLength=${n} .hidden=${b}><x-el .food=${s}></x-el>`",
        );
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_valid_attribute_fallback() {
        let result = fixture().check(NoUnknownProperty, "html`<input .size=${n}>`");
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_invalid_with_suggestion() {
        let result = fixture().check(NoUnknownProperty, "html`<x-el .foo=${s}></x-el>`");
        assert_eq!(result.warning_count, 1);
        let diagnostic = &result.diagnostics[0];
        insta::assert_snapshot!(diagnostic.message, @"Unknown property 'foo' on <x-el>.");
        assert_eq!(
            diagnostic.payload,
            DiagnosticPayload::UnknownTarget {
                name: "foo".into(),
                suggested_name: Some("food".into()),
            }
        );
    }

    #[test]
    fn test_unknown_tags_are_skipped() {
        let result = fixture().check(NoUnknownProperty, "html`<y-el .foo=${s}></y-el>`");
        assert_eq!(result.warning_count, 0);
    }
}
