//! Arena-backed template tree and its lookup primitives.

use litho_carton::SourceRange;

use crate::ast::{
    AssignmentId, AttributeAssignment, AttributeId, NodeAttribute, NodeId, NodeKind, TemplateNode,
};
use crate::errors::ParseError;

/// A parsed markup document.
#[derive(Debug, Clone, Default)]
pub struct TemplateDocument {
    nodes: Vec<TemplateNode>,
    attributes: Vec<NodeAttribute>,
    assignments: Vec<AttributeAssignment>,
    roots: Vec<NodeId>,
    errors: Vec<ParseError>,
}

impl TemplateDocument {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Building ==========

    /// Add a node and link it under `parent` (or the root list).
    pub fn push_node(&mut self, mut node: TemplateNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.id = id;
        match node.parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(parent.0 as usize) {
                    parent.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.nodes.push(node);
        id
    }

    /// Add an attribute and link it to its node.
    pub fn push_attribute(&mut self, mut attribute: NodeAttribute) -> AttributeId {
        let id = AttributeId(self.attributes.len() as u32);
        attribute.id = id;
        if let Some(node) = self.nodes.get_mut(attribute.node.0 as usize) {
            node.attributes.push(id);
        }
        self.attributes.push(attribute);
        id
    }

    /// Add an assignment and link it to its attribute.
    pub fn push_assignment(&mut self, mut assignment: AttributeAssignment) -> AssignmentId {
        let id = AssignmentId(self.assignments.len() as u32);
        assignment.id = id;
        if let Some(attribute) = self.attributes.get_mut(assignment.attribute.0 as usize) {
            attribute.assignment = Some(id);
        }
        self.assignments.push(assignment);
        id
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TemplateNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn push_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    // ========== Access ==========

    #[inline]
    pub fn node(&self, id: NodeId) -> &TemplateNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn attribute(&self, id: AttributeId) -> &NodeAttribute {
        &self.attributes[id.0 as usize]
    }

    #[inline]
    pub fn assignment(&self, id: AssignmentId) -> &AttributeAssignment {
        &self.assignments[id.0 as usize]
    }

    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[inline]
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    #[inline]
    pub fn attributes(&self) -> &[NodeAttribute] {
        &self.attributes
    }

    #[inline]
    pub fn assignments(&self) -> &[AttributeAssignment] {
        &self.assignments
    }

    #[inline]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn parent(&self, id: NodeId) -> Option<&TemplateNode> {
        self.node(id).parent.map(|p| self.node(p))
    }

    /// Attributes of a node, in source order.
    pub fn attributes_of(&self, id: NodeId) -> impl Iterator<Item = &NodeAttribute> {
        self.node(id).attributes.iter().map(|a| self.attribute(*a))
    }

    /// Find an attribute of a node by name, ignoring case and modifier.
    pub fn find_attribute(&self, id: NodeId, name: &str) -> Option<&NodeAttribute> {
        self.attributes_of(id)
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// All nodes in document order (pre-order).
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    // ========== Lookups ==========

    /// Innermost node whose range contains `offset`.
    pub fn node_at_offset(&self, offset: u32) -> Option<&TemplateNode> {
        let mut candidates = self.roots.as_slice();
        let mut found = None;
        'descend: loop {
            for id in candidates {
                let node = self.node(*id);
                if node.location.whole.contains_inclusive(offset) {
                    found = Some(node);
                    candidates = node.children.as_slice();
                    continue 'descend;
                }
            }
            return found;
        }
    }

    /// Node whose start tag contains `offset`.
    pub fn node_with_start_tag_at(&self, offset: u32) -> Option<&TemplateNode> {
        self.node_at_offset(offset)
            .filter(|node| node.location.start_tag.contains_inclusive(offset))
    }

    /// Attribute whose range contains `offset`.
    pub fn attribute_at_offset(&self, offset: u32) -> Option<&NodeAttribute> {
        let node = self.node_with_start_tag_at(offset)?;
        self.attributes_of(node.id)
            .find(|a| a.location.whole.contains_inclusive(offset))
    }

    /// Attributes intersecting `range`, in document order.
    pub fn attributes_in_range(&self, range: SourceRange) -> impl Iterator<Item = &NodeAttribute> {
        self.attributes
            .iter()
            .filter(move |a| a.location.whole.intersects(&range))
    }

    /// Closest unclosed node at or above `offset`, ignoring nodes whose start
    /// tag is still being typed.
    pub fn nearest_unclosed_ancestor(&self, offset: u32) -> Option<&TemplateNode> {
        let mut current = self.node_at_offset(offset);
        while let Some(node) = current {
            if node.is_unclosed() && node.location.start_tag.end <= offset {
                return Some(node);
            }
            current = node.parent.map(|p| self.node(p));
        }
        None
    }

    /// Content ranges of every `<style>` element, for stylesheet sub-documents.
    pub fn style_content_ranges(&self) -> Vec<SourceRange> {
        self.nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Style)
            .filter_map(TemplateNode::content_range)
            .collect()
    }
}
