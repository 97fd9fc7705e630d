//! no-unclosed-tag
//!
//! Require non-void elements to be closed.
//!
//! ## Examples
//!
//! ### Invalid
//! ```html
//! <div><span>text</div>
//! ```
//!
//! ### Valid
//! ```html
//! <div><span>text</span></div>
//! <input>
//! <my-element />
//! ```

use litho_relief::TemplateNode;

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-unclosed-tag",
    description: "Require non-void elements to be closed",
    default: RuleSeverity::Warn,
    strict: RuleSeverity::Error,
};

/// Require non-void elements to be closed
pub struct NoUnclosedTag;

impl Rule for NoUnclosedTag {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_node(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode) {
        if !node.is_unclosed() {
            return;
        }
        let diagnostic = ctx
            .diagnostic(
                node.location.start_tag,
                format!("This tag isn't closed: <{}>.", node.tag_name),
            )
            .with_help(format!("Add </{}> or self-close the tag.", node.tag_name));
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    #[test]
    fn test_valid_closed() {
        let result = Fixture::new().check(NoUnclosedTag, "html`<div><span>x</span></div>`");
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_valid_void_and_self_closed() {
        let result = Fixture::new().check(NoUnclosedTag, "html`<input><br><my-element />`");
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_invalid_unclosed_child() {
        let result = Fixture::new().check(NoUnclosedTag, "html`<div><span>text</div>`");
        assert_eq!(result.warning_count, 1);
        insta::assert_snapshot!(result.diagnostics[0].message, @"This tag isn't closed: <span>.");
    }

    #[test]
    fn test_strict_is_error() {
        let mut fixture = Fixture::new();
        fixture.settings.strict = true;
        let result = fixture.check(NoUnclosedTag, "html`<p>`");
        assert_eq!(result.error_count, 1);
    }
}
