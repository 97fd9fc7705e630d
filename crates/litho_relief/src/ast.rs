//! Template tree node types.
//!
//! Nodes, attributes and assignments live in flat arenas owned by a
//! [`crate::TemplateDocument`] and refer to each other by index. Every range is
//! relative to the virtual document the tree was parsed from.

use litho_carton::{is_void_tag, lower_name, CompactString, SmallVec, SourceRange};
use litho_stencil::ExpressionRef;
use serde::Serialize;

/// Index of a node in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

/// Index of an attribute in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AttributeId(pub u32);

/// Index of an assignment in its document. Stable for the document's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AssignmentId(pub u32);

/// Node kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[repr(u8)]
pub enum NodeKind {
    #[default]
    Element = 0,
    /// `<style>`: content is a stylesheet, not markup
    Style = 1,
    /// `<svg>` and everything below it
    Svg = 2,
}

/// Source ranges of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct NodeLocation {
    /// From `<` of the start tag to `>` of the end tag (or the last child)
    pub whole: SourceRange,
    /// Tag name in the start tag
    pub name: SourceRange,
    pub start_tag: SourceRange,
    pub end_tag: Option<SourceRange>,
}

/// An element in the template tree.
#[derive(Debug, Clone)]
pub struct TemplateNode {
    pub id: NodeId,
    /// Tag name as written
    pub tag_name: CompactString,
    pub kind: NodeKind,
    pub location: NodeLocation,
    pub attributes: SmallVec<[AttributeId; 4]>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub self_closed: bool,
}

impl TemplateNode {
    /// Lower-cased tag name used for knowledge lookups.
    #[inline]
    pub fn lower_name(&self) -> CompactString {
        lower_name(&self.tag_name)
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag_name)
    }

    /// A node without an end tag that is neither self-closed nor void.
    #[inline]
    pub fn is_unclosed(&self) -> bool {
        self.location.end_tag.is_none() && !self.self_closed && !self.is_void()
    }

    /// Range between the start tag and the end tag.
    pub fn content_range(&self) -> Option<SourceRange> {
        let end_tag = self.location.end_tag?;
        Some(SourceRange::new(self.location.start_tag.end, end_tag.start))
    }
}

/// Binding kind, selected by the attribute name's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BindingKind {
    /// `name=...`
    Plain,
    /// `?name=...`
    BooleanPresence,
    /// `.name=...`
    PropertyBinding,
    /// `@name=...`
    EventListener,
}

impl BindingKind {
    /// Kind for a leading modifier character.
    #[inline]
    pub fn from_modifier(c: char) -> Option<Self> {
        match c {
            '?' => Some(BindingKind::BooleanPresence),
            '.' => Some(BindingKind::PropertyBinding),
            '@' => Some(BindingKind::EventListener),
            _ => None,
        }
    }

    #[inline]
    pub fn modifier(self) -> Option<char> {
        match self {
            BindingKind::Plain => None,
            BindingKind::BooleanPresence => Some('?'),
            BindingKind::PropertyBinding => Some('.'),
            BindingKind::EventListener => Some('@'),
        }
    }
}

/// Source ranges of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct AttributeLocation {
    /// Name, modifier and value
    pub whole: SourceRange,
    /// Name without the modifier
    pub name: SourceRange,
}

/// An attribute on a node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeAttribute {
    pub id: AttributeId,
    /// Name without the modifier, as written
    pub name: CompactString,
    pub kind: BindingKind,
    pub location: AttributeLocation,
    pub node: NodeId,
    pub assignment: Option<AssignmentId>,
}

impl NodeAttribute {
    #[inline]
    pub fn lower_name(&self) -> CompactString {
        lower_name(&self.name)
    }
}

/// A piece of a mixed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MixedSegment {
    Text(CompactString),
    Expression(ExpressionRef),
}

/// What an attribute is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssignmentKind {
    /// `name="value"`, `name=value`
    StringLiteral(CompactString),
    /// `name` with no value
    BooleanPresence,
    /// `name=${expr}`, `name="${expr}"`
    Expression(ExpressionRef),
    /// `name="a ${expr} b"`
    Mixed(Vec<MixedSegment>),
}

impl AssignmentKind {
    /// First expression of the value, if any.
    pub fn first_expression(&self) -> Option<&ExpressionRef> {
        match self {
            AssignmentKind::Expression(expr) => Some(expr),
            AssignmentKind::Mixed(segments) => segments.iter().find_map(|s| match s {
                MixedSegment::Expression(expr) => Some(expr),
                MixedSegment::Text(_) => None,
            }),
            AssignmentKind::StringLiteral(_) | AssignmentKind::BooleanPresence => None,
        }
    }
}

/// The value side of an attribute.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeAssignment {
    pub id: AssignmentId,
    pub kind: AssignmentKind,
    /// Value range without quotes. Empty at the name's end for presence.
    pub location: SourceRange,
    pub attribute: AttributeId,
}
