//! Component discovery boundary.
//!
//! Finding component declarations in host source is done by a collaborator;
//! this module defines what it reports and how reports become descriptors.

use litho_canon::SimpleType;
use litho_carton::{lower_name, CompactString, SourceRange};
use serde::Serialize;

use crate::descriptor::{
    DeclarationRef, EventDescriptor, MemberDescriptor, NamedDescriptor, SlotDescriptor,
    TagDescriptor, TypeCell,
};
use crate::layer::{HtmlCollection, NamedCollection};

/// Where a discovered member is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BindingTarget {
    Attribute,
    Property,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMember {
    pub name: CompactString,
    pub binding_target: BindingTarget,
    pub ty: SimpleType,
    pub required: bool,
    /// Attribute reflecting a property
    pub attr_name: Option<CompactString>,
    pub description: Option<CompactString>,
    pub declaration: Option<DeclarationRef>,
}

impl ComponentMember {
    pub fn property(name: impl Into<CompactString>, ty: SimpleType) -> Self {
        Self {
            name: name.into(),
            binding_target: BindingTarget::Property,
            ty,
            required: false,
            attr_name: None,
            description: None,
            declaration: None,
        }
    }

    pub fn attribute(name: impl Into<CompactString>, ty: SimpleType) -> Self {
        Self {
            binding_target: BindingTarget::Attribute,
            ..Self::property(name, ty)
        }
    }

    pub fn with_attribute(mut self, attr_name: impl Into<CompactString>) -> Self {
        self.attr_name = Some(attr_name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentEvent {
    pub name: CompactString,
    pub ty: SimpleType,
    pub description: Option<CompactString>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSlot {
    pub name: CompactString,
    pub description: Option<CompactString>,
}

/// A component declared in host source.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    pub tag_name: CompactString,
    pub declaration: DeclarationRef,
    pub description: Option<CompactString>,
    pub members: Vec<ComponentMember>,
    pub events: Vec<ComponentEvent>,
    pub slots: Vec<ComponentSlot>,
    pub css_parts: Vec<CompactString>,
    pub css_properties: Vec<CompactString>,
}

impl ComponentDefinition {
    pub fn new(tag_name: impl Into<CompactString>, declaration: DeclarationRef) -> Self {
        Self {
            tag_name: tag_name.into(),
            declaration,
            description: None,
            members: Vec::new(),
            events: Vec::new(),
            slots: Vec::new(),
            css_parts: Vec::new(),
            css_properties: Vec::new(),
        }
    }
}

/// A problem found while discovering components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryDiagnostic {
    pub file_name: CompactString,
    pub range: SourceRange,
    pub message: String,
}

/// Discovery output for one host file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryResult {
    pub definitions: Vec<ComponentDefinition>,
    pub diagnostics: Vec<DiscoveryDiagnostic>,
}

/// Finds component declarations in a host file.
pub trait ComponentDiscovery {
    fn discover(&self, file_name: &str, source: &str) -> DiscoveryResult;
}

/// Convert definitions into a StaticallyDiscovered collection.
///
/// A property with a reflecting attribute also yields that attribute.
pub fn definitions_to_collection(definitions: &[ComponentDefinition]) -> HtmlCollection {
    let tags = definitions.iter().map(definition_to_tag).collect();
    HtmlCollection {
        tags,
        ..Default::default()
    }
}

fn definition_to_tag(definition: &ComponentDefinition) -> TagDescriptor {
    let mut tag = TagDescriptor::new(definition.tag_name.clone());
    tag.description = definition.description.clone();
    tag.declaration = Some(definition.declaration.clone());
    tag.declared = true;

    for member in &definition.members {
        let descriptor = |name: &CompactString| {
            let mut descriptor = MemberDescriptor::new(name.clone(), TypeCell::fixed(member.ty.clone()));
            descriptor.required = member.required;
            descriptor.description = member.description.clone();
            descriptor.declaration = member.declaration.clone();
            descriptor
        };
        match member.binding_target {
            BindingTarget::Property => {
                tag.properties.push(descriptor(&member.name));
                if let Some(attr_name) = &member.attr_name {
                    tag.attributes.push(descriptor(attr_name));
                }
            }
            BindingTarget::Attribute => tag.attributes.push(descriptor(&member.name)),
        }
    }

    tag.events = definition
        .events
        .iter()
        .map(|e| {
            let mut event = EventDescriptor::new(e.name.clone(), TypeCell::fixed(e.ty.clone()));
            event.description = e.description.clone();
            event
        })
        .collect();
    tag.slots = definition
        .slots
        .iter()
        .map(|s| {
            let mut slot = SlotDescriptor::new(s.name.clone());
            slot.description = s.description.clone();
            slot
        })
        .collect();
    tag.css_parts = definition
        .css_parts
        .iter()
        .map(|n| NamedDescriptor::new(n.clone()))
        .collect();
    tag.css_properties = definition
        .css_properties
        .iter()
        .map(|n| NamedDescriptor::new(n.clone()))
        .collect();
    tag
}

/// Names of the tags a set of definitions contributes.
pub fn definition_names(definitions: &[ComponentDefinition]) -> NamedCollection {
    NamedCollection {
        tags: definitions.iter().map(|d| lower_name(&d.tag_name)).collect(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> ComponentDefinition {
        let mut definition = ComponentDefinition::new(
            "x-counter",
            DeclarationRef {
                file_name: "counter.ts".into(),
                range: SourceRange::new(0, 40),
            },
        );
        definition.members.push(
            ComponentMember::property("maxCount", SimpleType::Number).with_attribute("max-count"),
        );
        definition
            .members
            .push(ComponentMember::property("items", SimpleType::array(SimpleType::String)));
        definition.events.push(ComponentEvent {
            name: "count-changed".into(),
            ty: SimpleType::named("CustomEvent"),
            description: None,
        });
        definition.slots.push(ComponentSlot {
            name: "".into(),
            description: None,
        });
        definition
    }

    #[test]
    fn test_reflected_attribute() {
        let collection = definitions_to_collection(&[definition()]);
        let tag = &collection.tags[0];
        assert!(tag.declared);
        assert_eq!(tag.properties.len(), 2);
        assert_eq!(tag.attributes.len(), 1);
        assert_eq!(tag.attributes[0].name, "max-count");
        assert_eq!(*tag.attributes[0].get_type(), SimpleType::Number);
        assert_eq!(tag.events[0].name, "count-changed");
        assert_eq!(tag.slots[0].name, "");
    }

    #[test]
    fn test_definition_names_are_lower_cased() {
        let mut definition = definition();
        definition.tag_name = "X-Counter".into();
        assert_eq!(definition_names(&[definition]).tags, vec!["x-counter"]);
    }
}
