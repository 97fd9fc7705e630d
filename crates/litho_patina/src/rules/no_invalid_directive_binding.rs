//! no-invalid-directive-binding
//!
//! Disallow directives used where they cannot work.
//!
//! - Built-in directives called with the wrong number or kind of arguments.
//! - `classMap` outside a plain `class` attribute.
//! - `styleMap` outside a plain `style` attribute.
//! - `unsafeHTML` in any attribute binding.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <div title=${classMap({ active })}></div>
//! ```
//!
//! ### Valid
//! ```html
//! <div class=${classMap({ active })}></div>
//! ```

use litho_croquis::{BindingTypes, DirectiveKind};
use litho_relief::{AttributeAssignment, BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-invalid-directive-binding",
    description: "Disallow directives in bindings they do not support",
    default: RuleSeverity::Error,
    strict: RuleSeverity::Error,
};

/// Disallow directives in bindings they do not support
pub struct NoInvalidDirectiveBinding;

impl Rule for NoInvalidDirectiveBinding {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_assignment(
        &self,
        ctx: &mut RuleContext<'_>,
        _node: &TemplateNode,
        attribute: &NodeAttribute,
        _assignment: &AttributeAssignment,
        types: &BindingTypes,
    ) {
        let Some(directive) = &types.directive else {
            return;
        };
        let name = directive.kind.name();
        let plain_named = |expected: &str| {
            attribute.kind == BindingKind::Plain && attribute.lower_name() == expected
        };

        let message = if directive.shape_mismatch {
            format!("Invalid arguments for the '{}' directive.", name)
        } else {
            match directive.kind {
                DirectiveKind::ClassMap if !plain_named("class") => {
                    format!("The '{}' directive can only be used in the 'class' attribute.", name)
                }
                DirectiveKind::StyleMap if !plain_named("style") => {
                    format!("The '{}' directive can only be used in the 'style' attribute.", name)
                }
                DirectiveKind::UnsafeHtml => {
                    format!("The '{}' directive can only be used in text content.", name)
                }
                _ => return,
            }
        };
        ctx.report_at(attribute.location.whole, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn messages(source: &str) -> Vec<String> {
        Fixture::new()
            .check(NoInvalidDirectiveBinding, source)
            .diagnostics
            .iter()
            .map(|d| d.message.to_string())
            .collect()
    }

    #[test]
    fn test_valid_placements() {
        assert!(messages("html`<div class=${classMap(classes)} style=${styleMap(styles)}></div>`").is_empty());
        assert!(messages("html`<a href=${ifDefined(s)}></a>`").is_empty());
    }

    #[test]
    fn test_invalid_class_map_placement() {
        insta::assert_debug_snapshot!(messages("html`<div title=${classMap(classes)}></div>`"), @r#"
        [
            "The 'classMap' directive can only be used in the 'class' attribute.",
        ]
        "#);
        assert_eq!(messages("html`<div .className=${classMap(classes)}></div>`").len(), 1);
    }

    #[test]
    fn test_invalid_style_map_placement() {
        assert_eq!(messages("html`<div class=${styleMap(styles)}></div>`").len(), 1);
    }

    #[test]
    fn test_invalid_unsafe_html_in_attribute() {
        assert_eq!(messages("html`<div title=${unsafeHTML(s)}></div>`").len(), 1);
    }

    #[test]
    fn test_invalid_arity() {
        insta::assert_debug_snapshot!(messages("html`<a href=${ifDefined(s, n)}></a>`"), @r#"
        [
            "Invalid arguments for the 'ifDefined' directive.",
        ]
        "#);
    }
}
