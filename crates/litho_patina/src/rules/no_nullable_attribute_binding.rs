//! no-nullable-attribute-binding
//!
//! Disallow `null` and `undefined` in attribute bindings.
//!
//! An attribute binding renders `null` and `undefined` as the literal
//! strings `"null"` and `"undefined"`. Wrap the value in `ifDefined()` to
//! remove the attribute instead.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <a href=${maybeUrl}>
//! ```
//!
//! ### Valid
//! ```html
//! <a href=${ifDefined(maybeUrl)}>
//! ```

use litho_canon::SimpleType;
use litho_croquis::BindingTypes;
use litho_relief::{AssignmentKind, AttributeAssignment, BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-nullable-attribute-binding",
    description: "Disallow nullable values in attribute bindings",
    default: RuleSeverity::Error,
    strict: RuleSeverity::Error,
};

/// Disallow nullable values in attribute bindings
pub struct NoNullableAttributeBinding;

impl Rule for NoNullableAttributeBinding {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_assignment(
        &self,
        ctx: &mut RuleContext<'_>,
        _node: &TemplateNode,
        attribute: &NodeAttribute,
        assignment: &AttributeAssignment,
        types: &BindingTypes,
    ) {
        if attribute.kind != BindingKind::Plain
            || !matches!(assignment.kind, AssignmentKind::Expression(_))
            || types.directive.is_some()
            || !types.value.is_nullable()
        {
            return;
        }

        let members = types.value.members();
        let nullish = match (
            members.contains(&SimpleType::Null),
            members.contains(&SimpleType::Undefined),
        ) {
            (true, true) => "'null' and 'undefined'",
            (true, false) => "'null'",
            _ => "'undefined'",
        };
        let diagnostic = ctx
            .diagnostic(
                attribute.location.whole,
                format!(
                    "This attribute binds the type '{}' which can be {}.",
                    types.value, nullish
                ),
            )
            .with_help("Use the ifDefined directive to remove the attribute instead.");
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn fixture() -> Fixture {
        Fixture::new()
            .with_type(
                "maybe",
                SimpleType::union([SimpleType::String, SimpleType::Undefined]),
            )
            .with_type("nothing", SimpleType::Null)
    }

    #[test]
    fn test_valid_non_nullable() {
        let result = fixture().check(NoNullableAttributeBinding, "html`<a href=${s}></a>`");
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_valid_if_defined() {
        let result = fixture().check(NoNullableAttributeBinding, "html`<a href=${ifDefined(maybe)}></a>`");
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_valid_property_binding() {
        let result = fixture().check(NoNullableAttributeBinding, "html`<input .value=${maybe}>`");
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_invalid_undefined() {
        let result = fixture().check(NoNullableAttributeBinding, "html`<a href=${maybe}></a>`");
        assert_eq!(result.error_count, 1);
        insta::assert_snapshot!(
            result.diagnostics[0].message,
            @"This attribute binds the type 'string | undefined' which can be 'undefined'."
        );
    }

    #[test]
    fn test_invalid_null() {
        let result = fixture().check(NoNullableAttributeBinding, "html`<a href=${nothing}></a>`");
        assert_eq!(result.error_count, 1);
    }
}
