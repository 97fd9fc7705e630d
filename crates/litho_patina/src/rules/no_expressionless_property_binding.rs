//! no-expressionless-property-binding
//!
//! Require property bindings to bind an expression.
//!
//! `.value="text"` sets the property to the literal string, which is almost
//! always a mistake for a missing `${}`.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <input .value="text">
//! ```
//!
//! ### Valid
//! ```html
//! <input .value=${text}>
//! ```

use litho_croquis::BindingTypes;
use litho_relief::{AssignmentKind, AttributeAssignment, BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-expressionless-property-binding",
    description: "Require an expression in property bindings",
    default: RuleSeverity::Error,
    strict: RuleSeverity::Error,
};

/// Require an expression in property bindings
pub struct NoExpressionlessPropertyBinding;

impl Rule for NoExpressionlessPropertyBinding {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_assignment(
        &self,
        ctx: &mut RuleContext<'_>,
        _node: &TemplateNode,
        attribute: &NodeAttribute,
        assignment: &AttributeAssignment,
        _types: &BindingTypes,
    ) {
        if attribute.kind != BindingKind::PropertyBinding {
            return;
        }
        if !matches!(
            assignment.kind,
            AssignmentKind::StringLiteral(_) | AssignmentKind::BooleanPresence
        ) {
            return;
        }

        let diagnostic = ctx
            .diagnostic(
                attribute.location.whole,
                "You are using a property binding without an expression.",
            )
            .with_help(format!(
                "Bind an expression with .{}=${{...}} or use a plain attribute.",
                attribute.name
            ));
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    #[test]
    fn test_valid_expression() {
        let result = Fixture::new().check(
            NoExpressionlessPropertyBinding,
            r#"html`<input .value=${s} .title="a ${s}">`"#,
        );
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_invalid_string_literal() {
        let result = Fixture::new().check(NoExpressionlessPropertyBinding, r#"html`<input .value="text">`"#);
        assert_eq!(result.error_count, 1);
    }

    #[test]
    fn test_invalid_presence() {
        let result = Fixture::new().check(NoExpressionlessPropertyBinding, r#"html`<input .value>`"#);
        assert_eq!(result.error_count, 1);
    }
}
