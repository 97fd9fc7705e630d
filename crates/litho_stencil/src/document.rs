//! Virtual documents synthesized from interpolated template literals.
//!
//! A virtual document is the text a generic markup or stylesheet parser
//! sees: literal text verbatim, and every interpolation hole replaced by a
//! run of `_` exactly as long as the hole in the host source. Because the
//! lengths match byte for byte, a document offset maps to a host offset by
//! a single shift.
//!
//! ```text
//! host:     html`<a href="${url}">`
//!                ^ location.start
//! document:      <a href="______">
//! ```

use litho_carton::{CompactString, SourceRange};
use serde::Serialize;

use crate::expression::ExpressionRef;

/// Placeholder byte used for interpolation holes.
pub const PLACEHOLDER_CHAR: char = '_';

/// Language of a virtual document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dialect {
    /// Nested markup (elements, attributes, bindings)
    Markup,
    /// Stylesheet fragment
    Stylesheet,
}

/// Literal text between holes, with its host range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPart {
    pub text: CompactString,
    pub range: SourceRange,
}

/// One part of a template literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DocumentPart {
    Text(TextPart),
    Expression(ExpressionRef),
}

impl DocumentPart {
    /// Host range covered by this part.
    #[inline]
    pub fn range(&self) -> SourceRange {
        match self {
            DocumentPart::Text(text) => text.range,
            DocumentPart::Expression(expr) => expr.hole,
        }
    }
}

/// A synthesized, offset-mapped view of one template literal.
#[derive(Debug, Clone)]
pub struct VirtualDocument {
    file_name: CompactString,
    dialect: Dialect,
    /// Host range of the literal content (between the backticks)
    location: SourceRange,
    parts: Vec<DocumentPart>,
    text: String,
}

impl VirtualDocument {
    /// Synthesize a document from ordered literal parts.
    ///
    /// `location` is the host range the document covers. Parts reaching
    /// outside of it are clipped, so a document built for a sub-range keeps
    /// the one-to-one offset correspondence.
    pub fn new(
        file_name: impl Into<CompactString>,
        dialect: Dialect,
        location: SourceRange,
        parts: Vec<DocumentPart>,
    ) -> Self {
        let mut text = String::with_capacity(location.len() as usize);
        let mut cursor = location.start;

        for part in &parts {
            let Some(range) = part.range().intersection(&location) else {
                continue;
            };
            // Gaps never occur for parts produced by extraction; pad them so
            // offsets stay aligned for hand-built part lists.
            if range.start > cursor {
                push_placeholder(&mut text, range.start - cursor);
            }
            match part {
                DocumentPart::Text(part) => {
                    let relative = range.unshift(part.range.start);
                    match relative.slice(&part.text) {
                        Some(slice) => text.push_str(slice),
                        None => push_placeholder(&mut text, range.len()),
                    }
                }
                DocumentPart::Expression(_) => push_placeholder(&mut text, range.len()),
            }
            cursor = range.end;
        }

        Self {
            file_name: file_name.into(),
            dialect,
            location,
            parts,
            text,
        }
    }

    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Host range of the document.
    #[inline]
    pub fn location(&self) -> SourceRange {
        self.location
    }

    #[inline]
    pub fn parts(&self) -> &[DocumentPart] {
        &self.parts
    }

    /// The synthesized text handed to parsers.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Host offset to document offset.
    #[inline]
    pub fn sc_position_to_offset(&self, position: u32) -> u32 {
        position.saturating_sub(self.location.start)
    }

    /// Document offset to host offset.
    #[inline]
    pub fn offset_to_sc_position(&self, offset: u32) -> u32 {
        offset + self.location.start
    }

    /// Document range to host range.
    #[inline]
    pub fn range_to_host(&self, range: SourceRange) -> SourceRange {
        range.shift(self.location.start)
    }

    /// Host range to document range.
    #[inline]
    pub fn host_range_to_document(&self, range: SourceRange) -> SourceRange {
        range.unshift(self.location.start)
    }

    /// Check if a host offset falls inside this document.
    #[inline]
    pub fn contains_sc_position(&self, position: u32) -> bool {
        self.location.contains_inclusive(position)
    }

    /// All interpolation holes, in source order.
    pub fn expressions(&self) -> impl Iterator<Item = &ExpressionRef> {
        self.parts.iter().filter_map(|part| match part {
            DocumentPart::Expression(expr) => Some(expr),
            DocumentPart::Text(_) => None,
        })
    }

    /// Document range of a hole.
    #[inline]
    pub fn expression_range(&self, expr: &ExpressionRef) -> SourceRange {
        self.host_range_to_document(expr.hole)
    }

    /// Holes intersecting a document range, in source order.
    pub fn expressions_in_range(&self, range: SourceRange) -> impl Iterator<Item = &ExpressionRef> {
        let host = self.range_to_host(range);
        self.expressions().filter(move |expr| expr.hole.intersects(&host))
    }

    /// Parts intersecting a document range.
    ///
    /// Text parts are clipped to the range. Expression parts are returned
    /// whole, since a hole is atomic.
    pub fn parts_at_range(&self, range: SourceRange) -> Vec<DocumentPart> {
        let host = self.range_to_host(range);
        let mut parts = Vec::new();

        for part in &self.parts {
            match part {
                DocumentPart::Text(text) => {
                    let Some(clipped) = text.range.intersection(&host) else {
                        continue;
                    };
                    let relative = clipped.unshift(text.range.start);
                    if let Some(slice) = relative.slice(&text.text) {
                        parts.push(DocumentPart::Text(TextPart {
                            text: CompactString::from(slice),
                            range: clipped,
                        }));
                    }
                }
                DocumentPart::Expression(expr) => {
                    if expr.hole.intersects(&host) {
                        parts.push(DocumentPart::Expression(expr.clone()));
                    }
                }
            }
        }

        parts
    }

    /// Carve a secondary document out of a document range, e.g. the body of
    /// a `<style>` element. The result maps directly to host offsets.
    pub fn sub_document(&self, range: SourceRange, dialect: Dialect) -> VirtualDocument {
        let parts = self.parts_at_range(range);
        VirtualDocument::new(
            self.file_name.clone(),
            dialect,
            self.range_to_host(range),
            parts,
        )
    }
}

fn push_placeholder(text: &mut String, len: u32) {
    text.extend(std::iter::repeat(PLACEHOLDER_CHAR).take(len as usize));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ExpressionId, HostExpression};

    /// Build parts for `<a href="${url}">` starting at host offset 10.
    fn sample() -> VirtualDocument {
        let start = 10;
        let head = r#"<a href=""#;
        let tail = r#"">"#;
        let head_range = SourceRange::new(start, start + head.len() as u32);
        let hole = SourceRange::new(head_range.end, head_range.end + 6);
        let tail_range = SourceRange::new(hole.end, hole.end + tail.len() as u32);

        let parts = vec![
            DocumentPart::Text(TextPart {
                text: head.into(),
                range: head_range,
            }),
            DocumentPart::Expression(ExpressionRef {
                id: ExpressionId(0),
                expression: HostExpression::new(
                    SourceRange::new(hole.start + 2, hole.end - 1),
                    "url",
                ),
                hole,
                call: None,
            }),
            DocumentPart::Text(TextPart {
                text: tail.into(),
                range: tail_range,
            }),
        ];

        VirtualDocument::new(
            "test.ts",
            Dialect::Markup,
            SourceRange::new(start, tail_range.end),
            parts,
        )
    }

    #[test]
    fn test_placeholder_text() {
        let doc = sample();
        insta::assert_snapshot!(doc.text(), @r#"<a href="______">"#);
    }

    #[test]
    fn test_placeholder_length_is_expression_plus_three() {
        let doc = sample();
        let expr = doc.expressions().next().unwrap();
        assert_eq!(expr.placeholder_len(), expr.expression.text.len() as u32 + 3);
        assert_eq!(doc.expression_range(expr).len(), 6);
    }

    #[test]
    fn test_offset_roundtrip() {
        let doc = sample();
        for offset in 0..doc.text().len() as u32 {
            let host = doc.offset_to_sc_position(offset);
            assert_eq!(doc.sc_position_to_offset(host), offset);
        }
        assert_eq!(doc.offset_to_sc_position(0), 10);
    }

    #[test]
    fn test_text_length_matches_location() {
        let doc = sample();
        assert_eq!(doc.text().len() as u32, doc.location().len());
    }

    #[test]
    fn test_parts_at_range_clips_text() {
        let doc = sample();
        // `f="______`
        let parts = doc.parts_at_range(SourceRange::new(6, 15));
        assert_eq!(parts.len(), 2);
        match &parts[0] {
            DocumentPart::Text(text) => assert_eq!(text.text, "f=\""),
            other => panic!("unexpected part {:?}", other),
        }
        assert!(matches!(parts[1], DocumentPart::Expression(_)));
    }

    #[test]
    fn test_sub_document_keeps_host_mapping() {
        let doc = sample();
        let sub = doc.sub_document(SourceRange::new(3, 9), Dialect::Stylesheet);
        assert_eq!(sub.text(), "href=\"");
        assert_eq!(sub.offset_to_sc_position(0), 13);
        assert_eq!(sub.dialect(), Dialect::Stylesheet);
    }

    #[test]
    fn test_no_holes_is_unchanged() {
        let text = "<div></div>";
        let doc = VirtualDocument::new(
            "test.ts",
            Dialect::Markup,
            SourceRange::new(0, text.len() as u32),
            vec![DocumentPart::Text(TextPart {
                text: text.into(),
                range: SourceRange::new(0, text.len() as u32),
            })],
        );
        assert_eq!(doc.text(), text);
    }
}
