//! Template document parser.
//!
//! Drives the tokenizer over a virtual document's text and builds a
//! [`TemplateDocument`]. Attribute prefixes select the binding kind and the
//! interpolation holes of the virtual document classify assigned values.

use compact_str::CompactString;
use litho_carton::{lower_name, SmallVec, SourceRange};
use litho_relief::{
    AssignmentId, AssignmentKind, AttributeAssignment, AttributeId, AttributeLocation, BindingKind,
    ErrorCode, MixedSegment, NodeAttribute, NodeId, NodeKind, NodeLocation, ParseError,
    TemplateDocument, TemplateNode,
};
use litho_stencil::VirtualDocument;

use crate::tokenizer::{Callbacks, QuoteType, Tokenizer};

/// Parse a markup virtual document into a template tree.
pub fn parse(document: &VirtualDocument) -> TemplateDocument {
    let mut parser = Parser::new(document);
    let mut tokenizer = Tokenizer::new(
        document.text(),
        ParserCallbacks {
            parser: &mut parser,
        },
    );
    tokenizer.tokenize();
    let template = parser.finish();

    tracing::debug!(
        file = document.file_name(),
        nodes = template.nodes().len(),
        attributes = template.attributes().len(),
        errors = template.errors().len(),
        "parsed template document"
    );
    template
}

/// Parser context for building the tree
struct Parser<'d> {
    document: &'d VirtualDocument,
    source: &'d str,
    tree: TemplateDocument,
    /// Open elements, innermost last
    stack: Vec<NodeId>,
    /// Element whose start tag is being tokenized
    current_element: Option<NodeId>,
    /// Attribute being tokenized
    current_attr: Option<CurrentAttribute>,
}

/// Attribute being tokenized
struct CurrentAttribute {
    name_start: usize,
    name_end: usize,
    value: Option<(usize, usize)>,
}

impl<'d> Parser<'d> {
    fn new(document: &'d VirtualDocument) -> Self {
        Self {
            document,
            source: document.text(),
            tree: TemplateDocument::new(),
            stack: Vec::new(),
            current_element: None,
            current_attr: None,
        }
    }

    fn finish(self) -> TemplateDocument {
        self.tree
    }

    /// Get source slice
    fn get_source(&self, start: usize, end: usize) -> &'d str {
        self.source.get(start..end).unwrap_or_default()
    }

    fn range(start: usize, end: usize) -> SourceRange {
        SourceRange::new(start as u32, end as u32)
    }

    fn error(&mut self, code: ErrorCode, start: usize, end: usize) {
        self.tree.push_error(ParseError::new(code, Self::range(start, end)));
    }

    fn open_element(&mut self, name_start: usize, name_end: usize) {
        let tag_name = self.get_source(name_start, name_end);
        let parent = self.stack.last().copied();
        let kind = match parent.map(|p| self.tree.node(p).kind) {
            Some(NodeKind::Svg) => NodeKind::Svg,
            _ => match lower_name(tag_name).as_str() {
                "style" => NodeKind::Style,
                "svg" => NodeKind::Svg,
                _ => NodeKind::Element,
            },
        };
        let lt = name_start.saturating_sub(1);

        let id = self.tree.push_node(TemplateNode {
            id: NodeId(0),
            tag_name: CompactString::from(tag_name),
            kind,
            location: NodeLocation {
                whole: Self::range(lt, name_end),
                name: Self::range(name_start, name_end),
                start_tag: Self::range(lt, name_end),
                end_tag: None,
            },
            attributes: SmallVec::new(),
            children: Vec::new(),
            parent,
            self_closed: false,
        });
        self.current_element = Some(id);
    }

    /// Complete the current start tag, ending at `end` (exclusive).
    fn finish_start_tag(&mut self, end: usize, self_closed: bool) -> Option<NodeId> {
        let id = self.current_element.take()?;
        let node = self.tree.node_mut(id)?;
        node.location.start_tag.end = end as u32;
        node.location.whole.end = end as u32;
        node.self_closed = self_closed;
        Some(id)
    }

    fn close_element(&mut self, tag_start: usize, name_start: usize, name_end: usize, end: usize) {
        let name = self.get_source(name_start, name_end);
        let position = self
            .stack
            .iter()
            .rposition(|id| self.tree.node(*id).tag_name.eq_ignore_ascii_case(name));

        let Some(position) = position else {
            // Stray end tag
            self.error(ErrorCode::UnexpectedEndTag, tag_start, end);
            return;
        };

        // Elements opened after the matching one stay unclosed.
        for id in self.stack.split_off(position + 1) {
            if let Some(node) = self.tree.node_mut(id) {
                node.location.whole.end = tag_start as u32;
            }
        }
        if let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.node_mut(id) {
                node.location.end_tag = Some(Self::range(tag_start, end));
                node.location.whole.end = end as u32;
            }
        }
    }

    fn finish_attribute(&mut self, quote: QuoteType, end: usize) {
        let Some(attr) = self.current_attr.take() else {
            return;
        };
        let Some(node) = self.current_element else {
            return;
        };

        let raw_name = self.get_source(attr.name_start, attr.name_end);
        let (kind, name_start) = match raw_name.chars().next().and_then(BindingKind::from_modifier) {
            Some(kind) => (kind, attr.name_start + 1),
            None => (BindingKind::Plain, attr.name_start),
        };
        let name_range = Self::range(name_start, attr.name_end);
        if name_range.is_empty() || self.is_wholly_expression(name_range) {
            return;
        }

        let whole_end = match quote {
            QuoteType::Single | QuoteType::Double => end + 1,
            QuoteType::NoValue | QuoteType::Unquoted => end,
        };
        let attribute = self.tree.push_attribute(NodeAttribute {
            id: AttributeId(0),
            name: CompactString::from(self.get_source(name_start, attr.name_end)),
            kind,
            location: AttributeLocation {
                whole: Self::range(attr.name_start, whole_end),
                name: name_range,
            },
            node,
            assignment: None,
        });

        let (assignment_kind, location) = match (quote, attr.value) {
            (QuoteType::NoValue, _) => (
                AssignmentKind::BooleanPresence,
                SourceRange::empty(attr.name_end as u32),
            ),
            // `name=` with nothing after it assigns nothing.
            (QuoteType::Unquoted, None) => return,
            (_, None) => (
                AssignmentKind::StringLiteral(CompactString::default()),
                SourceRange::empty(end as u32),
            ),
            (_, Some((start, end))) => {
                let range = Self::range(start, end);
                (self.classify_value(range), range)
            }
        };
        self.tree.push_assignment(AttributeAssignment {
            id: AssignmentId(0),
            kind: assignment_kind,
            location,
            attribute,
        });
    }

    /// Check if an interpolation hole covers the whole range.
    fn is_wholly_expression(&self, range: SourceRange) -> bool {
        self.document
            .expressions_in_range(range)
            .any(|expr| self.document.expression_range(expr).contains_range(&range))
    }

    fn classify_value(&self, range: SourceRange) -> AssignmentKind {
        let holes: Vec<_> = self.document.expressions_in_range(range).collect();

        match holes.as_slice() {
            [] => AssignmentKind::StringLiteral(CompactString::from(
                self.get_source(range.start as usize, range.end as usize),
            )),
            [expr] if self.document.expression_range(expr) == range => {
                AssignmentKind::Expression((*expr).clone())
            }
            _ => {
                let mut segments = Vec::with_capacity(holes.len() * 2 + 1);
                let mut cursor = range.start;
                for expr in holes {
                    let hole = self.document.expression_range(expr);
                    if hole.start > cursor {
                        segments.push(MixedSegment::Text(CompactString::from(
                            self.get_source(cursor as usize, hole.start as usize),
                        )));
                    }
                    segments.push(MixedSegment::Expression(expr.clone()));
                    cursor = cursor.max(hole.end);
                }
                if cursor < range.end {
                    segments.push(MixedSegment::Text(CompactString::from(
                        self.get_source(cursor as usize, range.end as usize),
                    )));
                }
                AssignmentKind::Mixed(segments)
            }
        }
    }

    /// Handle unclosed elements at end of parsing
    fn handle_unclosed_elements(&mut self) {
        let end = self.source.len() as u32;
        if let Some(id) = self.current_element.take() {
            if let Some(node) = self.tree.node_mut(id) {
                node.location.start_tag.end = end;
                node.location.whole.end = end;
            }
        }
        for id in std::mem::take(&mut self.stack) {
            if let Some(node) = self.tree.node_mut(id) {
                node.location.whole.end = end;
            }
        }
    }
}

/// Callbacks implementation that forwards to the parser
struct ParserCallbacks<'p, 'd> {
    parser: &'p mut Parser<'d>,
}

impl Callbacks for ParserCallbacks<'_, '_> {
    fn on_text(&mut self, _start: usize, _end: usize) {}

    fn on_open_tag_name(&mut self, start: usize, end: usize) {
        self.parser.open_element(start, end);
    }

    fn on_open_tag_end(&mut self, end: usize) {
        if let Some(id) = self.parser.finish_start_tag(end + 1, false) {
            if !self.parser.tree.node(id).is_void() {
                self.parser.stack.push(id);
            }
        }
    }

    fn on_self_closing_tag(&mut self, end: usize) {
        self.parser.finish_start_tag(end + 1, true);
    }

    fn on_close_tag(&mut self, tag_start: usize, name_start: usize, name_end: usize, end: usize) {
        self.parser.close_element(tag_start, name_start, name_end, end);
    }

    fn on_attrib_name(&mut self, start: usize, end: usize) {
        self.parser.current_attr = Some(CurrentAttribute {
            name_start: start,
            name_end: end,
            value: None,
        });
    }

    fn on_attrib_data(&mut self, start: usize, end: usize) {
        if let Some(attr) = self.parser.current_attr.as_mut() {
            attr.value = Some((start, end));
        }
    }

    fn on_attrib_end(&mut self, quote: QuoteType, end: usize) {
        self.parser.finish_attribute(quote, end);
    }

    fn on_comment(&mut self, _start: usize, _end: usize) {}

    fn on_end(&mut self) {
        self.parser.handle_unclosed_elements();
    }

    fn on_error(&mut self, code: ErrorCode, index: usize) {
        self.parser.error(code, index, index);
    }
}
