//! Template rules.
//!
//! Tree rules look at nodes, name rules at attribute names and binding
//! rules at the resolved types of attribute assignments.

// Tree rules
mod no_missing_import;
mod no_unclosed_tag;
mod no_unknown_tag_name;

// Name rules
mod no_unknown_attribute;
mod no_unknown_event;
mod no_unknown_property;
mod no_unknown_slot;

// Binding rules
mod no_complex_attribute_binding;
mod no_expressionless_property_binding;
mod no_incompatible_type_binding;
mod no_invalid_boolean_binding;
mod no_invalid_directive_binding;
mod no_noncallable_event_binding;
mod no_nullable_attribute_binding;

pub use no_missing_import::NoMissingImport;
pub use no_unclosed_tag::NoUnclosedTag;
pub use no_unknown_tag_name::NoUnknownTagName;

pub use no_unknown_attribute::NoUnknownAttribute;
pub use no_unknown_event::NoUnknownEvent;
pub use no_unknown_property::NoUnknownProperty;
pub use no_unknown_slot::NoUnknownSlot;

pub use no_complex_attribute_binding::NoComplexAttributeBinding;
pub use no_expressionless_property_binding::NoExpressionlessPropertyBinding;
pub use no_incompatible_type_binding::NoIncompatibleTypeBinding;
pub use no_invalid_boolean_binding::NoInvalidBooleanBinding;
pub use no_invalid_directive_binding::NoInvalidDirectiveBinding;
pub use no_noncallable_event_binding::NoNoncallableEventBinding;
pub use no_nullable_attribute_binding::NoNullableAttributeBinding;

use litho_carton::{fuzzy, CompactString};
use litho_croquis::BindingTypes;

use crate::context::RuleContext;
use crate::diagnostic::DiagnosticPayload;

/// Check if a binding's value type may be compared against its target.
///
/// A directive that renders something other than its call type, but whose
/// rendered type is unknown, makes the comparison meaningless. So does a
/// directive called with the wrong arguments.
pub(crate) fn value_is_checkable(types: &BindingTypes) -> bool {
    match &types.directive {
        Some(directive) => !directive.shape_mismatch && directive.actual_type.is_some(),
        None => true,
    }
}

/// Closest candidate within the configured edit distance.
pub(crate) fn suggest<'c>(
    ctx: &RuleContext<'_>,
    name: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> Option<CompactString> {
    fuzzy::suggest(name, candidates, ctx.settings.max_suggestion_distance).map(CompactString::from)
}

/// Payload and help text for an unknown name.
pub(crate) fn unknown_target(
    name: &str,
    suggested_name: Option<CompactString>,
    render: impl Fn(&str) -> String,
) -> (DiagnosticPayload, Option<String>) {
    let help = suggested_name
        .as_deref()
        .map(|suggested| format!("Did you mean '{}'?", render(suggested)));
    (
        DiagnosticPayload::UnknownTarget {
            name: name.into(),
            suggested_name,
        },
        help,
    )
}
