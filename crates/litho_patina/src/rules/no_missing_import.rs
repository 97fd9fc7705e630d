//! no-missing-import
//!
//! Require that discovered elements are imported by the file using them.
//!
//! An element whose declaration lives in a file the current file does not
//! (transitively) import may not be registered when the template renders.
//!
//! ## Examples
//!
//! ### Invalid
//! ```ts
//! // `my-element` is declared in ./my-element.ts, which is never imported
//! html`<my-element></my-element>`
//! ```
//!
//! ### Valid
//! ```ts
//! import "./my-element.js";
//! html`<my-element></my-element>`
//! ```

use litho_relief::{NodeKind, TemplateNode};

use crate::config::RuleSeverity;
use crate::context::RuleContext;
use crate::diagnostic::DiagnosticPayload;
use crate::rule::{Rule, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-missing-import",
    description: "Require imports for used custom elements",
    default: RuleSeverity::Off,
    strict: RuleSeverity::Warn,
};

/// Require imports for used custom elements
pub struct NoMissingImport;

impl Rule for NoMissingImport {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn on_node(&self, ctx: &mut RuleContext<'_>, node: &TemplateNode) {
        if node.kind != NodeKind::Element {
            return;
        }
        let Some(visible) = ctx.visible_files else {
            return;
        };
        let Some(tag) = ctx.knowledge.get_html_tag(&node.tag_name) else {
            return;
        };
        if tag.built_in || !tag.declared {
            return;
        }
        let Some(declaration) = &tag.declaration else {
            return;
        };

        let file = declaration.file_name.as_str();
        if file == ctx.document.file_name() || visible.contains(file) {
            return;
        }

        let diagnostic = ctx
            .diagnostic(
                node.location.name,
                format!("Missing import for <{}>.", node.tag_name),
            )
            .with_help(format!("Import \"{}\" where <{}> is used.", file, tag.name))
            .with_payload(DiagnosticPayload::MissingImport {
                tag_name: tag.name.clone(),
                declaration_file: declaration.file_name.clone(),
            });
        ctx.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;
    use litho_carton::{FxHashSet, SourceRange};
    use litho_croquis::discovery::definitions_to_collection;
    use litho_croquis::{ComponentDefinition, DeclarationRef};

    fn fixture(visible: &[&str]) -> Fixture {
        let definition = ComponentDefinition::new(
            "my-element",
            DeclarationRef {
                file_name: "my-element.ts".into(),
                range: SourceRange::new(0, 10),
            },
        );
        let mut fixture = Fixture::new().with_components(definitions_to_collection(&[definition]));
        fixture.visible_files = Some(visible.iter().map(|f| (*f).into()).collect::<FxHashSet<_>>());
        fixture
    }

    #[test]
    fn test_valid_imported() {
        let result = fixture(&["my-element.ts"]).check(NoMissingImport, "html`<my-element></my-element>`");
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_valid_builtin() {
        let result = fixture(&[]).check(NoMissingImport, "html`<div></div>`");
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn test_invalid_not_imported() {
        let result = fixture(&["other.ts"]).check(NoMissingImport, "html`<my-element></my-element>`");
        assert_eq!(result.warning_count, 1);
        insta::assert_snapshot!(result.diagnostics[0].message, @"Missing import for <my-element>.");
    }

    #[test]
    fn test_skipped_without_import_graph() {
        let mut fixture = fixture(&[]);
        fixture.visible_files = None;
        let result = fixture.check(NoMissingImport, "html`<my-element></my-element>`");
        assert!(result.diagnostics.is_empty());
    }
}
