//! IDE lookups keyed by host offset.
//!
//! Every lookup first brings the file's documents up to date, then finds
//! the markup document containing the offset and works in its coordinates.

use litho_carton::{CompactString, SourceRange};
use litho_croquis::{DeclarationRef, HtmlKnowledgeBase};
use litho_relief::{BindingKind, NodeAttribute, TemplateDocument, TemplateNode};
use litho_stencil::VirtualDocument;
use serde::Serialize;

use crate::session::AnalysisSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionKind {
    Tag,
    Attribute,
    BooleanAttribute,
    Property,
    Event,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    /// Text to insert, including the binding modifier
    pub label: CompactString,
    pub kind: CompletionKind,
    /// Type or description shown next to the label
    pub detail: Option<CompactString>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hover {
    /// Host range the hover applies to
    pub range: SourceRange,
    /// Markdown
    pub contents: String,
}

/// What a binding targets, as far as the knowledge base knows.
struct TargetSummary {
    label: &'static str,
    ty: String,
    description: Option<CompactString>,
    declaration: Option<DeclarationRef>,
}

fn target_summary(
    knowledge: &HtmlKnowledgeBase,
    tag: &str,
    attribute: &NodeAttribute,
) -> Option<TargetSummary> {
    let name = attribute.name.as_str();
    let member = |label, found: Option<litho_croquis::MemberDescriptor>| {
        found.map(|d| TargetSummary {
            label,
            ty: d.get_type().to_string(),
            description: d.description.clone(),
            declaration: d.declaration.clone(),
        })
    };
    match attribute.kind {
        BindingKind::Plain | BindingKind::BooleanPresence => {
            member("attribute", knowledge.attribute(tag, name))
        }
        BindingKind::PropertyBinding => member("property", knowledge.property(tag, name))
            .or_else(|| member("attribute", knowledge.attribute(tag, name))),
        BindingKind::EventListener => knowledge.event(tag, name).map(|d| TargetSummary {
            label: "event",
            ty: d.get_type().to_string(),
            description: d.description.clone(),
            declaration: d.declaration.clone(),
        }),
    }
}

/// Markup document and tree containing a host offset.
struct Located<'a> {
    document: &'a VirtualDocument,
    tree: &'a TemplateDocument,
    /// Offset in document coordinates
    offset: u32,
}

impl Located<'_> {
    /// Node whose tag name contains the offset.
    fn tag_name_at(&self) -> Option<&TemplateNode> {
        self.tree
            .node_at_offset(self.offset)
            .filter(|node| node.location.name.contains_inclusive(self.offset))
    }
}

impl AnalysisSession {
    fn prepare(&mut self, file_name: &str) {
        self.sync_discovery();
        self.ensure_documents(file_name);
    }

    fn locate(&self, file_name: &str, host_offset: u32) -> Option<Located<'_>> {
        let entry = self.files.get(file_name)?;
        entry.documents.iter().find_map(|entry| {
            let tree = entry.tree.as_ref()?;
            entry
                .document
                .contains_sc_position(host_offset)
                .then(|| Located {
                    document: &entry.document,
                    tree,
                    offset: entry.document.sc_position_to_offset(host_offset),
                })
        })
    }

    /// Completions at a host offset.
    ///
    /// After `<` tag names are offered. Inside a start tag the prefix of
    /// the word being typed selects attributes, `?` boolean attributes, `.`
    /// properties or `@` events.
    pub fn completions_at(&mut self, file_name: &str, host_offset: u32) -> Vec<Completion> {
        self.prepare(file_name);
        let Some(located) = self.locate(file_name, host_offset) else {
            return Vec::new();
        };
        let text = located.document.text();
        let offset = (located.offset as usize).min(text.len());
        let Some(before) = text.get(..offset) else {
            return Vec::new();
        };
        let word_start = before
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '\'' | '='))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = &before[word_start..];
        let opener = before[..word_start].chars().last();

        let knowledge = &self.knowledge;
        if opener == Some('<') {
            return knowledge
                .all_tags()
                .iter()
                .map(|tag| Completion {
                    label: tag.name.clone(),
                    kind: CompletionKind::Tag,
                    detail: tag.description.clone(),
                })
                .collect();
        }

        let Some(node) = located
            .tree
            .node_with_start_tag_at(located.offset)
            .filter(|node| node.location.name.end < located.offset)
        else {
            return Vec::new();
        };
        let tag = node.lower_name();

        match word.chars().next() {
            Some('@') => knowledge
                .events_for_tag(&tag)
                .iter()
                .map(|event| Completion {
                    label: format!("@{}", event.name).into(),
                    kind: CompletionKind::Event,
                    detail: event.description.clone(),
                })
                .collect(),
            Some('.') => knowledge
                .properties_for_tag(&tag)
                .iter()
                .map(|property| Completion {
                    label: format!(".{}", property.name).into(),
                    kind: CompletionKind::Property,
                    detail: Some(property.get_type().to_string().into()),
                })
                .collect(),
            Some('?') => knowledge
                .attributes_for_tag(&tag)
                .iter()
                .map(|attribute| Completion {
                    label: format!("?{}", attribute.name).into(),
                    kind: CompletionKind::BooleanAttribute,
                    detail: Some(attribute.get_type().to_string().into()),
                })
                .collect(),
            _ => knowledge
                .attributes_for_tag(&tag)
                .iter()
                .map(|attribute| Completion {
                    label: attribute.name.clone(),
                    kind: CompletionKind::Attribute,
                    detail: Some(attribute.get_type().to_string().into()),
                })
                .collect(),
        }
    }

    /// Hover for the tag or attribute name at a host offset.
    pub fn hover_at(&mut self, file_name: &str, host_offset: u32) -> Option<Hover> {
        self.prepare(file_name);
        let located = self.locate(file_name, host_offset)?;
        let knowledge = &self.knowledge;

        if let Some(attribute) = located.tree.attribute_at_offset(located.offset) {
            let tag = located.tree.node(attribute.node).lower_name();
            let summary = target_summary(knowledge, &tag, attribute)?;
            let mut contents = format!(
                "({}) {}: {}",
                summary.label, attribute.name, summary.ty
            );
            if let Some(description) = summary.description {
                contents.push_str("\n\n");
                contents.push_str(&description);
            }
            return Some(Hover {
                range: located.document.range_to_host(attribute.location.whole),
                contents,
            });
        }

        let node = located.tag_name_at()?;
        let tag = knowledge.get_html_tag(&node.tag_name)?;
        let mut contents = format!("<{}>", node.tag_name);
        if let Some(description) = &tag.description {
            contents.push_str("\n\n");
            contents.push_str(description);
        }
        Some(Hover {
            range: located.document.range_to_host(node.location.name),
            contents,
        })
    }

    /// Declaration of the tag or binding target at a host offset.
    pub fn definition_at(&mut self, file_name: &str, host_offset: u32) -> Option<DeclarationRef> {
        self.prepare(file_name);
        let located = self.locate(file_name, host_offset)?;
        let knowledge = &self.knowledge;

        if let Some(attribute) = located.tree.attribute_at_offset(located.offset) {
            let tag = located.tree.node(attribute.node).lower_name();
            return target_summary(knowledge, &tag, attribute)?.declaration;
        }

        let node = located.tag_name_at()?;
        knowledge.get_html_tag(&node.tag_name)?.declaration.clone()
    }

    /// Closing tag for the nearest unclosed element at a host offset.
    pub fn closing_tag_at(&mut self, file_name: &str, host_offset: u32) -> Option<String> {
        self.prepare(file_name);
        let located = self.locate(file_name, host_offset)?;
        located
            .tree
            .nearest_unclosed_ancestor(located.offset)
            .map(|node| format!("</{}>", node.tag_name))
    }
}
