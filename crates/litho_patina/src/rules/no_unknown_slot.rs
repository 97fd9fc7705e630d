//! no-unknown-slot
//!
//! Require `slot` attributes to name a slot the parent element declares.
//!
//! Slot names are compared case-sensitively. When every slot of the parent
//! is named, children must pick one with a `slot` attribute.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <!-- <x-card> declares the slots "" and "right" -->
//! <x-card><div slot="nope"></div></x-card>
//! ```
//!
//! ### Valid
//! ```html
//! <x-card><div slot="right"></div><span></span></x-card>
//! ```

use std::rc::Rc;

use litho_carton::CompactString;
use litho_croquis::{DescriptorMap, SlotDescriptor};
use litho_relief::{AssignmentKind, BindingKind, NodeAttribute, NodeKind, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::diagnostic::{format_names, DiagnosticPayload};
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-unknown-slot",
    description: "Disallow unknown slot names",
    default: RuleSeverity::Warn,
    strict: RuleSeverity::Warn,
};

/// Disallow unknown slot names
pub struct NoUnknownSlot;

/// Slots of the element containing `node`, when it declares any.
fn parent_slots(
    ctx: &RuleContext<'_>,
    node: &TemplateNode,
) -> Option<(CompactString, Rc<DescriptorMap<SlotDescriptor>>)> {
    let parent = ctx.tree.parent(node.id)?;
    if parent.kind != NodeKind::Element {
        return None;
    }
    let slots = ctx.knowledge.slots_for_tag(&parent.tag_name);
    if slots.is_empty() {
        return None;
    }
    Some((parent.tag_name.clone(), slots))
}

fn valid_names(slots: &DescriptorMap<SlotDescriptor>) -> Vec<CompactString> {
    slots.iter().map(|slot| slot.name.clone()).collect()
}

impl Rule for NoUnknownSlot {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_node(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode) {
        if node.kind != NodeKind::Element || ctx.tree.find_attribute(node.id, "slot").is_some() {
            return;
        }
        let Some((parent, slots)) = parent_slots(ctx, node) else {
            return;
        };
        if slots.iter().any(|slot| slot.name.is_empty()) {
            return;
        }

        let names = valid_names(&slots);
        let diagnostic = ctx
            .diagnostic(
                node.location.name,
                format!("Elements inside <{}> must be assigned to a named slot.", parent),
            )
            .with_help(format!(
                "Add a slot attribute. Valid slot names are {}.",
                format_names(names.iter().map(CompactString::as_str))
            ))
            .with_payload(DiagnosticPayload::InvalidSlot {
                valid_slot_names: names,
            });
        ctx.report(diagnostic);
    }

    fn on_attribute(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode, attribute: &NodeAttribute) {
        if !matches!(
            attribute.kind,
            BindingKind::Plain | BindingKind::BooleanPresence
        ) || attribute.lower_name() != "slot"
        {
            return;
        }
        let tree = ctx.tree;
        let value: &str = match attribute.assignment.map(|a| &tree.assignment(a).kind) {
            Some(AssignmentKind::StringLiteral(value)) => value,
            Some(AssignmentKind::BooleanPresence) | None => "",
            Some(_) => return,
        };
        let Some((_, slots)) = parent_slots(ctx, node) else {
            return;
        };
        if slots.iter().any(|slot| slot.name == value) {
            return;
        }

        let names = valid_names(&slots);
        let listed = format_names(names.iter().map(CompactString::as_str));
        let diagnostic = ctx
            .diagnostic(
                attribute.location.whole,
                format!("Invalid slot name '{}'. Valid slot names are {}.", value, listed),
            )
            .with_payload(DiagnosticPayload::InvalidSlot {
                valid_slot_names: names,
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
    use litho_croquis::{ComponentDefinition, ComponentSlot, DeclarationRef};

    fn definition(tag: &str, slots: &[&str]) -> ComponentDefinition {
        let mut definition = ComponentDefinition::new(
            tag,
            DeclarationRef {
                file_name: "components.ts".into(),
                range: SourceRange::new(0, 10),
            },
        );
        definition.slots = slots
            .iter()
            .map(|name| ComponentSlot {
                name: (*name).into(),
                description: None,
            })
            .collect();
        definition
    }

    fn fixture() -> Fixture {
        Fixture::new().with_components(definitions_to_collection(&[
            definition("x-card", &["", "right"]),
            definition("x-split", &["left", "right"]),
        ]))
    }

    #[test]
    fn test_valid_slots() {
        let result = fixture().check(
            NoUnknownSlot,
            r#"html`<x-card><div slot="right"></div><span></span></x-card>`"#,
        );
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_invalid_slot_name() {
        let result = fixture().check(NoUnknownSlot, r#"html`<x-card><div slot="nope"></div></x-card>`"#);
        assert_eq!(result.warning_count, 1);
        let diagnostic = &result.diagnostics[0];
        insta::assert_snapshot!(
            diagnostic.message,
            @r#"Invalid slot name 'nope'. Valid slot names are "" | "right"."#
        );
        assert_eq!(
            diagnostic.payload,
            DiagnosticPayload::InvalidSlot {
                valid_slot_names: vec!["".into(), "right".into()],
            }
        );
    }

    #[test]
    fn test_slot_names_are_case_sensitive() {
        let result = fixture().check(NoUnknownSlot, r#"html`<x-card><div slot="Right"></div></x-card>`"#);
        assert_eq!(result.warning_count, 1);
    }

    #[test]
    fn test_missing_slot_under_named_slots() {
        let result = fixture().check(
            NoUnknownSlot,
            r#"html`<x-split><div slot="left"></div><p></p></x-split>`"#,
        );
        assert_eq!(result.warning_count, 1);
        insta::assert_snapshot!(
            result.diagnostics[0].message,
            @"Elements inside <x-split> must be assigned to a named slot."
        );
    }

    #[test]
    fn test_parent_without_slots_is_skipped() {
        let result = fixture().check(NoUnknownSlot, r#"html`<div><span slot="x"></span></div>`"#);
        assert_eq!(result.warning_count, 0);
    }
}
