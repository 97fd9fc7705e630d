//! no-noncallable-event-binding
//!
//! Require event listeners to be functions or `handleEvent` objects.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <button @click=${count}>
//! <button @click="onClick">
//! ```
//!
//! ### Valid
//! ```html
//! <button @click=${onClick}>
//! <button @click=${{ handleEvent: () => {} }}>
//! ```

use litho_croquis::BindingTypes;
use litho_relief::{AttributeAssignment, BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-noncallable-event-binding",
    description: "Disallow non-callable values in event bindings",
    default: RuleSeverity::Error,
    strict: RuleSeverity::Error,
};

/// Disallow non-callable values in event bindings
pub struct NoNoncallableEventBinding;

impl Rule for NoNoncallableEventBinding {
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
        if attribute.kind != BindingKind::EventListener || types.directive.is_some() {
            return;
        }
        if types.value.is_callable() || types.value.has_handle_event() {
            return;
        }

        let diagnostic = ctx
            .diagnostic(
                attribute.location.whole,
                format!(
                    "You are setting up an event listener with a non-callable type '{}'.",
                    types.value
                ),
            )
            .with_help("Bind a function or an object with a handleEvent method.");
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;
    use litho_canon::{Member, ObjectType, SimpleType};

    fn fixture() -> Fixture {
        let handler = SimpleType::function(vec![], SimpleType::Void);
        Fixture::new()
            .with_type("onClick", handler.clone())
            .with_type(
                "listener",
                SimpleType::Object(ObjectType::named("Listener").with_member(Member::new("handleEvent", handler))),
            )
    }

    #[test]
    fn test_valid_callables() {
        let result = fixture().check(
            NoNoncallableEventBinding,
            "html`<button @click=${onClick} @focus=${listener} @blur=${unknownThing}></button>`",
        );
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_invalid_number() {
        let result = fixture().check(NoNoncallableEventBinding, "html`<button @click=${n}></button>`");
        assert_eq!(result.error_count, 1);
        insta::assert_snapshot!(
            result.diagnostics[0].message,
            @"You are setting up an event listener with a non-callable type 'number'."
        );
    }

    #[test]
    fn test_invalid_string_literal() {
        let result = fixture().check(NoNoncallableEventBinding, r#"html`<button @click="onClick"></button>`"#);
        assert_eq!(result.error_count, 1);
    }
}
