//! no-unknown-attribute
//!
//! Disallow attributes a known element does not declare.
//!
//! `data-*` attributes are always allowed. Elements the knowledge base does
//! not know are left to `no-unknown-tag-name`.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <input maxlenght="10">
//! ```
//!
//! ### Valid
//! ```html
//! <input maxlength="10" data-id="1">
//! ```

use litho_relief::{BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};
use crate::rules::{suggest, unknown_target};

static META: RuleMeta = RuleMeta {
    name: "no-unknown-attribute",
    description: "Disallow unknown attributes",
    default: RuleSeverity::Off,
    strict: RuleSeverity::Warn,
};

/// Disallow unknown attributes
pub struct NoUnknownAttribute;

impl Rule for NoUnknownAttribute {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_attribute(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode, attribute: &NodeAttribute) {
        if !matches!(
            attribute.kind,
            BindingKind::Plain | BindingKind::BooleanPresence
        ) {
            return;
        }
        let name = attribute.lower_name();
        if name.starts_with("data-") || !ctx.knowledge.has_tag(&node.tag_name) {
            return;
        }
        let tag = node.lower_name();
        let attributes = ctx.knowledge.attributes_for_tag(&tag);
        if attributes.contains(&name) {
            return;
        }

        let suggested = suggest(ctx, &name, attributes.names());
        let (payload, help) = unknown_target(&attribute.name, suggested, str::to_string);
        let mut diagnostic = ctx
            .diagnostic(
                attribute.location.name,
                format!("Unknown attribute '{}' on <{}>.", attribute.name, node.tag_name),
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
    use crate::test_utils::Fixture;

    #[test]
    fn test_valid_known_and_data_attributes() {
        let result = Fixture::new().check(
            NoUnknownAttribute,
            r#"html`<input maxlength="10" data-id="1" ?disabled=${b} aria-label="x">`"#,
        );
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_invalid_with_suggestion() {
        let result = Fixture::new().check(NoUnknownAttribute, r#"html`<input maxlenght="10">`"#);
        assert_eq!(result.warning_count, 1);
        let diagnostic = &result.diagnostics[0];
        insta::assert_snapshot!(diagnostic.message, @"Unknown attribute 'maxlenght' on <input>.");
        assert_eq!(diagnostic.help.as_deref(), Some("Did you mean 'maxlength'?"));
    }

    #[test]
    fn test_unknown_tags_are_skipped() {
        let result = Fixture::new().check(NoUnknownAttribute, r#"html`<x-el foo="1"></x-el>`"#);
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_property_bindings_are_ignored() {
        let result = Fixture::new().check(NoUnknownAttribute, r#"html`<input .foo=${n}>`"#);
        assert_eq!(result.warning_count, 0);
    }
}
