//! no-unknown-tag-name
//!
//! Disallow elements the knowledge base does not know.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <my-elemnt></my-elemnt>
//! ```
//!
//! ### Valid
//! ```html
//! <my-element></my-element>
//! ```

use litho_relief::{NodeKind, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};
use crate::rules::{suggest, unknown_target};

static META: RuleMeta = RuleMeta {
    name: "no-unknown-tag-name",
    description: "Disallow unknown tag names",
    default: RuleSeverity::Warn,
    strict: RuleSeverity::Warn,
};

/// Disallow unknown tag names
pub struct NoUnknownTagName;

impl Rule for NoUnknownTagName {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_node(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode) {
        if node.kind != NodeKind::Element || ctx.knowledge.has_tag(&node.tag_name) {
            return;
        }

        let name = node.lower_name();
        let tags = ctx.knowledge.all_tags();
        let suggested = suggest(ctx, &name, tags.iter().map(|t| t.name.as_str()));
        let (payload, help) = unknown_target(&node.tag_name, suggested, |s| format!("<{}>", s));

        let mut diagnostic = ctx
            .diagnostic(node.location.name, format!("Unknown tag <{}>.", node.tag_name))
            .with_payload(payload);
        diagnostic = match help {
            Some(help) => diagnostic.with_help(help),
            None => diagnostic.with_help(
                "Check that the element is defined and declared in the tag name map.",
            ),
        };
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticPayload;
    use crate::test_utils::Fixture;
    use litho_canon::SimpleType;
    use litho_croquis::{ComponentDefinition, DeclarationRef};
    use litho_croquis::discovery::definitions_to_collection;
    use litho_carton::SourceRange;

    fn fixture() -> Fixture {
        let definition = ComponentDefinition::new(
            "my-element",
            DeclarationRef {
                file_name: "my-element.ts".into(),
                range: SourceRange::new(0, 10),
            },
        );
        Fixture::new()
            .with_type("n", SimpleType::Number)
            .with_components(definitions_to_collection(&[definition]))
    }

    #[test]
    fn test_valid_known_tags() {
        let result = fixture().check(NoUnknownTagName, "html`<div><my-element></my-element></div>`");
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_valid_case_insensitive() {
        let result = fixture().check(NoUnknownTagName, "html`<DIV></DIV>`");
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_invalid_with_suggestion() {
        let result = fixture().check(NoUnknownTagName, "html`<my-elemnt></my-elemnt>`");
        assert_eq!(result.warning_count, 1);
        let diagnostic = &result.diagnostics[0];
        insta::assert_snapshot!(diagnostic.message, @"Unknown tag <my-elemnt>.");
        assert_eq!(
            diagnostic.payload,
            DiagnosticPayload::UnknownTarget {
                name: "my-elemnt".into(),
                suggested_name: Some("my-element".into()),
            }
        );
        assert_eq!(diagnostic.help.as_deref(), Some("Did you mean '<my-element>'?"));
    }

    #[test]
    fn test_declared_extension_is_not_a_tag() {
        let result = fixture().check(NoUnknownTagName, "html`<htmlelement></htmlelement>`");
        assert_eq!(result.warning_count, 1);
    }

    #[test]
    fn test_svg_children_are_skipped() {
        let result = fixture().check(NoUnknownTagName, "html`<svg><circle></circle></svg>`");
        assert_eq!(result.warning_count, 0);
    }
}
