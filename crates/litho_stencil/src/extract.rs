//! Template literal extraction using OXC.
//!
//! Walks a host source file and turns every tagged template literal with a
//! recognized tag into a [`VirtualDocument`].

use litho_carton::{CompactString, SourceRange};
use oxc_allocator::Allocator;
use oxc_ast::ast::{Argument, Expression, TaggedTemplateExpression, TemplateLiteral};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::document::{Dialect, DocumentPart, TextPart, VirtualDocument};
use crate::expression::{CallShape, ExpressionId, ExpressionRef, HostExpression};

/// Extraction failure.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to parse `{file_name}`")]
    Parse { file_name: CompactString },
}

/// Template tags that mark literals as documents.
#[derive(Debug, Clone)]
pub struct LiteralTags {
    pub markup: Vec<CompactString>,
    pub stylesheet: Vec<CompactString>,
}

impl Default for LiteralTags {
    fn default() -> Self {
        Self {
            markup: vec!["html".into(), "svg".into(), "raw".into()],
            stylesheet: vec!["css".into()],
        }
    }
}

impl LiteralTags {
    /// Dialect for a tag name, if the tag is recognized.
    pub fn dialect_of(&self, tag: &str) -> Option<Dialect> {
        if self.markup.iter().any(|t| t == tag) {
            Some(Dialect::Markup)
        } else if self.stylesheet.iter().any(|t| t == tag) {
            Some(Dialect::Stylesheet)
        } else {
            None
        }
    }
}

/// Extract every recognized template literal of a host file, in source order.
///
/// Recoverable syntax errors are tolerated; only a parser panic fails.
pub fn extract_documents(
    file_name: &str,
    source: &str,
    tags: &LiteralTags,
) -> Result<Vec<VirtualDocument>, ExtractError> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(file_name).unwrap_or_else(|_| SourceType::ts());
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked {
        return Err(ExtractError::Parse {
            file_name: file_name.into(),
        });
    }
    if !ret.errors.is_empty() {
        tracing::debug!(
            file = file_name,
            errors = ret.errors.len(),
            "host file parsed with recoverable errors"
        );
    }

    let mut collector = LiteralCollector {
        file_name,
        source,
        tags,
        next_id: 0,
        documents: Vec::new(),
    };
    collector.visit_program(&ret.program);
    collector.documents.sort_by_key(|doc| doc.location().start);

    tracing::debug!(
        file = file_name,
        documents = collector.documents.len(),
        "extracted template documents"
    );
    Ok(collector.documents)
}

struct LiteralCollector<'s> {
    file_name: &'s str,
    source: &'s str,
    tags: &'s LiteralTags,
    next_id: u32,
    documents: Vec<VirtualDocument>,
}

impl<'a> Visit<'a> for LiteralCollector<'_> {
    fn visit_tagged_template_expression(&mut self, it: &TaggedTemplateExpression<'a>) {
        if let Some(dialect) = tag_name(&it.tag).and_then(|tag| self.tags.dialect_of(tag)) {
            self.collect(&it.quasi, dialect);
        }
        walk::walk_tagged_template_expression(self, it);
    }
}

impl LiteralCollector<'_> {
    fn collect(&mut self, quasi: &TemplateLiteral<'_>, dialect: Dialect) {
        // Drop the backticks.
        let location = SourceRange::new(quasi.span.start + 1, quasi.span.end.saturating_sub(1));
        let mut parts = Vec::with_capacity(quasi.quasis.len() + quasi.expressions.len());
        let mut cursor = location.start;

        let bounds = quasi.quasis.iter().zip(quasi.quasis.iter().skip(1));
        for (expr, (before, after)) in quasi.expressions.iter().zip(bounds) {
            let span = expr.span();
            let Some(hole) = self.hole_between(before.span.end, after.span.start) else {
                continue;
            };
            self.push_text(&mut parts, cursor, hole.start);

            let range = SourceRange::new(span.start, span.end);
            let id = ExpressionId(self.next_id);
            self.next_id += 1;
            parts.push(DocumentPart::Expression(ExpressionRef {
                id,
                expression: HostExpression::new(range, self.text(range)),
                hole,
                call: self.call_shape(expr),
            }));
            cursor = hole.end;
        }
        self.push_text(&mut parts, cursor, location.end);

        self.documents.push(VirtualDocument::new(
            self.file_name,
            dialect,
            location,
            parts,
        ));
    }

    /// The `${...}` hole between two template elements. Element spans
    /// exclude their delimiters, so the hole is exactly the gap.
    fn hole_between(&self, start: u32, end: u32) -> Option<SourceRange> {
        let hole = SourceRange::new(start, end);
        let text = hole.slice(self.source)?;
        (text.starts_with("${") && text.ends_with('}')).then_some(hole)
    }

    fn push_text(&self, parts: &mut Vec<DocumentPart>, start: u32, end: u32) {
        if start >= end {
            return;
        }
        let range = SourceRange::new(start, end);
        parts.push(DocumentPart::Text(TextPart {
            text: self.text(range),
            range,
        }));
    }

    fn text(&self, range: SourceRange) -> CompactString {
        range.slice(self.source).map(CompactString::from).unwrap_or_default()
    }

    fn call_shape(&self, expr: &Expression<'_>) -> Option<CallShape> {
        let Expression::CallExpression(call) = unwrap_parens(expr) else {
            return None;
        };
        let callee = tag_name(&call.callee)?;
        let arguments = call
            .arguments
            .iter()
            .filter(|arg| !matches!(arg, Argument::SpreadElement(_)))
            .map(|arg| {
                let span = arg.span();
                let range = SourceRange::new(span.start, span.end);
                HostExpression::new(range, self.text(range))
            })
            .collect();
        Some(CallShape {
            callee: callee.into(),
            arguments,
        })
    }
}

/// Name of an identifier or the last property of a member chain.
fn tag_name<'e>(expr: &'e Expression<'_>) -> Option<&'e str> {
    match unwrap_parens(expr) {
        Expression::Identifier(ident) => Some(ident.name.as_str()),
        Expression::StaticMemberExpression(member) => Some(member.property.name.as_str()),
        _ => None,
    }
}

fn unwrap_parens<'e, 'a>(expr: &'e Expression<'a>) -> &'e Expression<'a> {
    match expr {
        Expression::ParenthesizedExpression(paren) => unwrap_parens(&paren.expression),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<VirtualDocument> {
        extract_documents("test.ts", source, &LiteralTags::default()).unwrap()
    }

    #[test]
    fn test_extract_markup_literal() {
        let docs = extract("const t = html`<div class=\"${cls}\"></div>`;");
        assert_eq!(docs.len(), 1);
        insta::assert_snapshot!(docs[0].text(), @r#"<div class="______"></div>"#);
        assert_eq!(docs[0].dialect(), Dialect::Markup);
    }

    #[test]
    fn test_placeholder_covers_whitespace() {
        let docs = extract("html`<a .x=${ value }></a>`");
        let expr = docs[0].expressions().next().unwrap();
        // ` value ` is 7 bytes
        assert_eq!(expr.placeholder_len(), 10);
        assert_eq!(expr.text(), "value");
        assert_eq!(docs[0].text(), "<a .x=__________></a>");
    }

    #[test]
    fn test_offsets_map_to_host() {
        let source = "let a = 1;\nhtml`<p>${a}</p>`";
        let docs = extract(source);
        let doc = &docs[0];
        let offset = doc.text().find("</p>").unwrap() as u32;
        let host = doc.offset_to_sc_position(offset) as usize;
        assert_eq!(&source[host..host + 4], "</p>");
    }

    #[test]
    fn test_braces_in_comments_stay_inside_the_hole() {
        let source = "html`<a .x=${a /* } */}>${ {b: 1} }</a>`";
        let docs = extract(source);
        let holes: Vec<_> = docs[0]
            .expressions()
            .map(|e| e.hole.slice(source).unwrap())
            .collect();
        assert_eq!(holes, vec!["${a /* } */}", "${ {b: 1} }"]);
        assert_eq!(docs[0].text().len(), source.len() - 6);
        assert!(docs[0].text().ends_with("</a>"));
    }

    #[test]
    fn test_css_and_member_tags() {
        let docs = extract("lit.html`<b></b>`; const s = css`:host { color: red; }`;");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].dialect(), Dialect::Markup);
        assert_eq!(docs[1].dialect(), Dialect::Stylesheet);
    }

    #[test]
    fn test_unrecognized_tags_ignored() {
        assert!(extract("gql`query { a }`; `<div></div>`").is_empty());
    }

    #[test]
    fn test_nested_literals() {
        let docs = extract("html`<ul>${items.map(i => html`<li>${i}</li>`)}</ul>`");
        assert_eq!(docs.len(), 2);
        assert!(docs[0].text().starts_with("<ul>"));
        assert_eq!(docs[1].text(), "<li>____</li>");
    }

    #[test]
    fn test_call_shape() {
        let docs = extract("html`<img src=${ifDefined(url)}>`");
        let expr = docs[0].expressions().next().unwrap();
        let call = expr.call.as_ref().unwrap();
        assert_eq!(call.callee, "ifDefined");
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(call.arguments[0].text, "url");
    }

    #[test]
    fn test_expression_ids_are_unique() {
        let docs = extract("html`${a}${b}`; html`${c}`");
        let ids: Vec<_> = docs
            .iter()
            .flat_map(|d| d.expressions().map(|e| e.id))
            .collect();
        assert_eq!(ids, vec![ExpressionId(0), ExpressionId(1), ExpressionId(2)]);
    }
}
