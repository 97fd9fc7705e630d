//! no-unknown-event
//!
//! Disallow listeners for events the element is not known to dispatch.
//!
//! Elements that declare no events of their own accept every known event,
//! since events bubble up from their children.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <input @chnage=${onChange}>
//! ```
//!
//! ### Valid
//! ```html
//! <input @change=${onChange}>
//! ```

use litho_relief::{BindingKind, NodeAttribute, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};
use crate::rules::{suggest, unknown_target};

static META: RuleMeta = RuleMeta {
    name: "no-unknown-event",
    description: "Disallow unknown events",
    default: RuleSeverity::Off,
    strict: RuleSeverity::Warn,
};

/// Disallow unknown events
pub struct NoUnknownEvent;

impl Rule for NoUnknownEvent {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_attribute(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode, attribute: &NodeAttribute) {
        if attribute.kind != BindingKind::EventListener {
            return;
        }
        let events = ctx.knowledge.events_for_tag(&node.tag_name);
        if events.contains(&attribute.name) {
            return;
        }

        let suggested = suggest(ctx, &attribute.name, events.names());
        let (payload, help) = unknown_target(&attribute.name, suggested, |s| format!("@{}", s));
        let mut diagnostic = ctx
            .diagnostic(
                attribute.location.name,
                format!("Unknown event '{}' on <{}>.", attribute.name, node.tag_name),
            )
            .with_payload(payload);
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(help);
        }
        ctx.report(diagnostic);
    }
}
