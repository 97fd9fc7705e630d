//! no-invalid-boolean-binding
//!
//! Disallow `?` bindings to targets that do not accept a boolean.
//!
//! A boolean attribute binding toggles the attribute's presence, which only
//! makes sense for attributes whose type includes `boolean`.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <input ?maxlength=${flag}>
//! ```
//!
//! ### Valid
//! ```html
//! <input ?disabled=${flag}>
//! ```

use litho_canon::{is_assignable, SimpleType};
use litho_croquis::BindingTypes;
use litho_relief::{AttributeAssignment, BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::diagnostic::DiagnosticPayload;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-invalid-boolean-binding",
    description: "Disallow boolean bindings to non-boolean targets",
    default: RuleSeverity::Error,
    strict: RuleSeverity::Error,
};

/// Disallow boolean bindings to non-boolean targets
pub struct NoInvalidBooleanBinding;

impl Rule for NoInvalidBooleanBinding {
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
        if attribute.kind != BindingKind::BooleanPresence || !types.target_found {
            return;
        }
        if is_assignable(&types.target, &SimpleType::Boolean) {
            return;
        }

        let diagnostic = ctx
            .diagnostic(
                attribute.location.whole,
                format!(
                    "The '{}' attribute is of type '{}', not a boolean.",
                    attribute.name, types.target
                ),
            )
            .with_help(format!("Bind it with {}=${{...}} instead.", attribute.name))
            .with_payload(DiagnosticPayload::TypeMismatch {
                target_type: types.target.clone(),
                value_type: SimpleType::Boolean,
            });
        ctx.report(diagnostic);
    }
}
