//! no-complex-attribute-binding
//!
//! Disallow objects, arrays and functions in plain attribute bindings.
//!
//! Attribute values are always strings, so a complex value would render as
//! `[object Object]`. A complex target cannot be set from an attribute
//! string either. Both cases call for a property binding.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <my-list items=${[1, 2, 3]}></my-list>
//! ```
//!
//! ### Valid
//! ```html
//! <my-list .items=${[1, 2, 3]}></my-list>
//! ```

use litho_canon::SimpleType;
use litho_croquis::BindingTypes;
use litho_relief::{AssignmentKind, AttributeAssignment, BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::diagnostic::DiagnosticPayload;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-complex-attribute-binding",
    description: "Disallow complex values in attribute bindings",
    default: RuleSeverity::Error,
    strict: RuleSeverity::Error,
};

/// Disallow complex values in attribute bindings
pub struct NoComplexAttributeBinding;

/// Check if a target accepts no primitive at all.
pub(crate) fn is_complex_target(target: &SimpleType) -> bool {
    target.members().iter().all(SimpleType::is_complex)
}

impl Rule for NoComplexAttributeBinding {
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
        if attribute.kind != BindingKind::Plain || types.directive.is_some() {
            return;
        }
        // Security overrides decide what an expression may bind.
        if matches!(assignment.kind, AssignmentKind::Expression(_))
            && ctx
                .settings
                .security
                .lookup(&node.tag_name, &attribute.name)
                .is_some()
        {
            return;
        }

        let message = if types.value.is_complex() {
            format!(
                "You are binding a non-primitive type '{}'. This could result in binding the string \"[object Object]\".",
                types.value
            )
        } else if types.target_found && is_complex_target(&types.target) && types.value.is_primitive() {
            format!(
                "The '{}' attribute is of non-primitive type '{}' and cannot be set from a string.",
                attribute.name, types.target
            )
        } else {
            return;
        };

        let diagnostic = ctx
            .diagnostic(attribute.location.whole, message)
            .with_help(format!("Use a property binding: .{}=${{...}}", attribute.name))
            .with_payload(DiagnosticPayload::TypeMismatch {
                target_type: types.target.clone(),
                value_type: types.value.clone(),
            });
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;
    use litho_carton::SourceRange;
    use litho_croquis::discovery::definitions_to_collection;
    use litho_croquis::{ComponentDefinition, ComponentMember, DeclarationRef};

    fn fixture() -> Fixture {
        let mut definition = ComponentDefinition::new(
            "my-list",
            DeclarationRef {
                file_name: "my-list.ts".into(),
                range: SourceRange::new(0, 10),
            },
        );
        definition.members.push(
            ComponentMember::property("items", SimpleType::array(SimpleType::Number))
                .with_attribute("items"),
        );
        Fixture::new()
            .with_type("list", SimpleType::array(SimpleType::Number))
            .with_components(definitions_to_collection(&[definition]))
    }

    #[test]
    fn test_valid_primitive_values() {
        let result = fixture().check(NoComplexAttributeBinding, r#"html`<input value=${s} maxlength=${n}>`"#);
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_valid_property_binding() {
        let result = fixture().check(NoComplexAttributeBinding, "html`<my-list .items=${list}></my-list>`");
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_invalid_complex_value() {
        let result = fixture().check(NoComplexAttributeBinding, "html`<div title=${list}></div>`");
        assert_eq!(result.error_count, 1);
        insta::assert_snapshot!(
            result.diagnostics[0].message,
            @r#"You are binding a non-primitive type 'number[]'. This could result in binding the string "[object Object]"."#
        );
    }

    #[test]
    fn test_security_override_allows_objects() {
        let mut fixture = fixture().with_type("safe", SimpleType::named("SafeUrl"));
        fixture.settings.security = crate::config::SecurityOverrides::preset(
            crate::config::SecuritySystem::ClosureSafeTypes,
        );
        let result = fixture.check(NoComplexAttributeBinding, "html`<a href=${safe}></a>`");
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_invalid_complex_target() {
        let result = fixture().check(NoComplexAttributeBinding, r#"html`<my-list items="1,2"></my-list>`"#);
        assert_eq!(result.error_count, 1);
    }
}
