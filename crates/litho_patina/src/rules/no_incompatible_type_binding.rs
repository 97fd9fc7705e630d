//! no-incompatible-type-binding
//!
//! Disallow binding values whose type does not fit the target.
//!
//! Checks run in this order and the first that decides wins:
//!
//! 1. Event bindings are left to `no-noncallable-event-binding`.
//! 2. An empty attribute value counts as `true`.
//! 3. A security override for the tag and attribute replaces every other
//!    check. Directives and literal text are exempt.
//! 4. Complex values or targets in plain attributes are left to
//!    `no-complex-attribute-binding`.
//! 5. Numeric targets accept numeric strings.
//! 6. `?` bindings take `boolean`, `null` or `undefined`.
//! 7. Plain attributes accept a value whose rendered string fits the target.
//!    Property bindings require plain assignability.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <input maxlength="abc">
//! <input .maxLength=${"ten"}>
//! ```
//!
//! ### Valid
//! ```html
//! <input maxlength="50" disabled="">
//! <input .maxLength=${10}>
//! <input .maxLength=${"10"}>
//! ```

use litho_canon::{is_assignable, matches_nominal, SimpleType};
use litho_croquis::BindingTypes;
use litho_relief::{AssignmentKind, AttributeAssignment, BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::diagnostic::DiagnosticPayload;
use crate::rule::{Rule, RuleMeta};
use crate::rules::no_complex_attribute_binding::is_complex_target;
use crate::rules::value_is_checkable;

static META: RuleMeta = RuleMeta {
    name: "no-incompatible-type-binding",
    description: "Disallow values whose type does not fit the binding target",
    default: RuleSeverity::Error,
    strict: RuleSeverity::Error,
};

/// Disallow values whose type does not fit the binding target
pub struct NoIncompatibleTypeBinding;

fn is_numeric_string(value: &SimpleType) -> bool {
    match value {
        SimpleType::StringLiteral(text) => {
            let text = text.trim();
            !text.is_empty() && text.parse::<f64>().is_ok()
        }
        _ => false,
    }
}

fn report_mismatch(
    ctx: &mut RuleContext<'_>,
    attribute: &NodeAttribute,
    target: &SimpleType,
    value: &SimpleType,
) {
    let diagnostic = ctx
        .diagnostic(
            attribute.location.whole,
            format!("Type '{}' is not assignable to '{}'.", value, target),
        )
        .with_payload(DiagnosticPayload::TypeMismatch {
            target_type: target.clone(),
            value_type: value.clone(),
        });
    ctx.report(diagnostic);
}

impl Rule for NoIncompatibleTypeBinding {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_assignment(
        &self,
        ctx: &mut RuleContext<'_>,
        node: &TemplateNode,
        attribute: &NodeAttribute,
        assignment: &AttributeAssignment,
        types: &BindingTypes,
    ) {
        if attribute.kind == BindingKind::EventListener || !value_is_checkable(types) {
            return;
        }
        let target = &types.target;
        let mut value = types.value.clone();

        if attribute.kind == BindingKind::Plain {
            match &assignment.kind {
                // A bare attribute only toggles presence.
                AssignmentKind::BooleanPresence => return,
                AssignmentKind::StringLiteral(text) if text.is_empty() => {
                    value = SimpleType::BooleanLiteral(true);
                }
                AssignmentKind::Expression(_) if types.directive.is_none() => {
                    // Nullish members are reported by no-nullable-attribute-binding.
                    let stripped = value.strip_nullable();
                    if stripped != SimpleType::Never {
                        value = stripped;
                    }
                }
                _ => {}
            }
        }

        if types.directive.is_none() && matches!(assignment.kind, AssignmentKind::Expression(_)) {
            let settings = ctx.settings;
            if let Some(allowed) = settings.security.lookup(&node.tag_name, &attribute.name) {
                if !matches_nominal(&value, allowed) {
                    let diagnostic = ctx
                        .diagnostic(
                            attribute.location.whole,
                            format!(
                                "Type '{}' is not allowed in '{}'. Allowed types are {}.",
                                value,
                                attribute.name,
                                allowed.join(" | ")
                            ),
                        )
                        .with_payload(DiagnosticPayload::TypeMismatch {
                            target_type: SimpleType::union(
                                allowed.iter().map(|name| SimpleType::named(name.as_str())),
                            ),
                            value_type: value.clone(),
                        });
                    ctx.report(diagnostic);
                }
                return;
            }
        }

        if attribute.kind == BindingKind::Plain
            && (value.is_complex()
                || (types.target_found && is_complex_target(target) && value.is_primitive()))
        {
            return;
        }

        if is_numeric_string(&value) && is_assignable(target, &SimpleType::Number) {
            return;
        }

        let fits = match attribute.kind {
            BindingKind::BooleanPresence => is_assignable(
                &SimpleType::union([SimpleType::Boolean, SimpleType::Null, SimpleType::Undefined]),
                &value,
            ),
            BindingKind::Plain => {
                is_assignable(target, &value) || is_assignable(target, &value.to_attribute_string())
            }
            BindingKind::PropertyBinding => is_assignable(target, &value),
            BindingKind::EventListener => true,
        };
        if !fits {
            let target = match attribute.kind {
                BindingKind::BooleanPresence => SimpleType::Boolean,
                _ => target.clone(),
            };
            report_mismatch(ctx, attribute, &target, &value);
        }
    }
}
