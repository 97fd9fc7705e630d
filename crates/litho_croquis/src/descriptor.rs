//! Descriptors: what is known about tags and their members.
//!
//! Names compare case-insensitively. Merging two descriptors of the same
//! name unions their types (`any` is absorbed into the more specific side)
//! and concatenates their provenance.

use std::fmt;

use litho_canon::SimpleType;
use litho_carton::{CompactString, SmallVec, SourceRange};
use once_cell::unsync::OnceCell;
use serde::Serialize;

use crate::layer::KnowledgeLayer;

/// Where a descriptor is declared in host source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeclarationRef {
    pub file_name: CompactString,
    pub range: SourceRange,
}

/// Provenance of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Origin {
    pub layer: KnowledgeLayer,
    /// Tag the descriptor was declared on, if tag-local
    pub from_tag: Option<CompactString>,
}

pub type Related = SmallVec<[Origin; 2]>;

/// How a descriptor type is produced.
#[derive(Clone)]
enum TypeSource {
    Fixed(SimpleType),
    /// Union of string literals
    Values(Vec<CompactString>),
    Merged(Box<TypeCell>, Box<TypeCell>),
}

/// A descriptor type, computed on first access and kept until the
/// descriptor is dropped.
#[derive(Clone)]
pub struct TypeCell {
    source: TypeSource,
    cell: OnceCell<SimpleType>,
}

impl TypeCell {
    pub fn fixed(ty: SimpleType) -> Self {
        Self::from_source(TypeSource::Fixed(ty))
    }

    /// A union of string literal values.
    pub fn values(values: Vec<CompactString>) -> Self {
        Self::from_source(TypeSource::Values(values))
    }

    pub fn any() -> Self {
        Self::fixed(SimpleType::Any)
    }

    /// The merge of two types.
    pub fn merged(a: TypeCell, b: TypeCell) -> Self {
        Self::from_source(TypeSource::Merged(Box::new(a), Box::new(b)))
    }

    fn from_source(source: TypeSource) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    /// The type, computing it once.
    pub fn get(&self) -> &SimpleType {
        self.cell.get_or_init(|| match &self.source {
            TypeSource::Fixed(ty) => ty.clone(),
            TypeSource::Values(values) => {
                if values.is_empty() {
                    SimpleType::String
                } else {
                    SimpleType::union(values.iter().cloned().map(SimpleType::StringLiteral))
                }
            }
            TypeSource::Merged(a, b) => SimpleType::merge(a.get(), b.get()),
        })
    }
}

impl fmt::Debug for TypeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(ty) => write!(f, "TypeCell({})", ty),
            None => f.write_str("TypeCell(<pending>)"),
        }
    }
}

impl PartialEq for TypeCell {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

/// Common behavior of named, mergeable descriptors.
pub trait Descriptor: Clone {
    fn name(&self) -> &str;

    /// Fold a same-named descriptor into this one.
    fn merge_with(&mut self, other: &Self);

    /// Provenance list.
    fn related_mut(&mut self) -> &mut Related;
}

fn extend_related(into: &mut Related, from: &Related) {
    for origin in from {
        if !into.contains(origin) {
            into.push(origin.clone());
        }
    }
}

/// An attribute or property of a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    pub name: CompactString,
    pub description: Option<CompactString>,
    pub ty: TypeCell,
    pub required: bool,
    pub from_tag: Option<CompactString>,
    pub declaration: Option<DeclarationRef>,
    pub related: Related,
}

pub type AttributeDescriptor = MemberDescriptor;
pub type PropertyDescriptor = MemberDescriptor;

impl MemberDescriptor {
    pub fn new(name: impl Into<CompactString>, ty: TypeCell) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            required: false,
            from_tag: None,
            declaration: None,
            related: Related::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Member type.
    #[inline]
    pub fn get_type(&self) -> &SimpleType {
        self.ty.get()
    }
}

impl Descriptor for MemberDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn merge_with(&mut self, other: &Self) {
        self.ty = TypeCell::merged(self.ty.clone(), other.ty.clone());
        self.required |= other.required;
        if self.description.is_none() {
            self.description = other.description.clone();
        }
        if self.declaration.is_none() {
            self.declaration = other.declaration.clone();
        }
        if self.from_tag.is_none() {
            self.from_tag = other.from_tag.clone();
        }
        extend_related(&mut self.related, &other.related);
    }

    fn related_mut(&mut self) -> &mut Related {
        &mut self.related
    }
}

/// An event a tag dispatches.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDescriptor {
    pub name: CompactString,
    pub description: Option<CompactString>,
    /// Type of the dispatched event object
    pub ty: TypeCell,
    pub from_tag: Option<CompactString>,
    pub declaration: Option<DeclarationRef>,
    pub related: Related,
}

impl EventDescriptor {
    pub fn new(name: impl Into<CompactString>, ty: TypeCell) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            from_tag: None,
            declaration: None,
            related: Related::new(),
        }
    }

    #[inline]
    pub fn get_type(&self) -> &SimpleType {
        self.ty.get()
    }
}

impl Descriptor for EventDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn merge_with(&mut self, other: &Self) {
        self.ty = TypeCell::merged(self.ty.clone(), other.ty.clone());
        if self.description.is_none() {
            self.description = other.description.clone();
        }
        if self.declaration.is_none() {
            self.declaration = other.declaration.clone();
        }
        if self.from_tag.is_none() {
            self.from_tag = other.from_tag.clone();
        }
        extend_related(&mut self.related, &other.related);
    }

    fn related_mut(&mut self) -> &mut Related {
        &mut self.related
    }
}

/// A named insertion point. The default slot has an empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDescriptor {
    pub name: CompactString,
    pub description: Option<CompactString>,
    pub from_tag: Option<CompactString>,
    pub related: Related,
}

impl SlotDescriptor {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            description: None,
            from_tag: None,
            related: Related::new(),
        }
    }
}

/// A name-only descriptor: css parts and css custom properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedDescriptor {
    pub name: CompactString,
    pub description: Option<CompactString>,
    pub from_tag: Option<CompactString>,
    pub related: Related,
}

impl NamedDescriptor {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            description: None,
            from_tag: None,
            related: Related::new(),
        }
    }
}

pub type CssPartDescriptor = NamedDescriptor;
pub type CssPropertyDescriptor = NamedDescriptor;

macro_rules! impl_simple_descriptor {
    ($ty:ty) => {
        impl Descriptor for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn merge_with(&mut self, other: &Self) {
                if self.description.is_none() {
                    self.description = other.description.clone();
                }
                if self.from_tag.is_none() {
                    self.from_tag = other.from_tag.clone();
                }
                extend_related(&mut self.related, &other.related);
            }

            fn related_mut(&mut self) -> &mut Related {
                &mut self.related
            }
        }
    };
}

impl_simple_descriptor!(SlotDescriptor);
impl_simple_descriptor!(NamedDescriptor);

/// Everything known about one tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDescriptor {
    pub name: CompactString,
    pub description: Option<CompactString>,
    pub attributes: Vec<AttributeDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub events: Vec<EventDescriptor>,
    pub slots: Vec<SlotDescriptor>,
    pub css_parts: Vec<CssPartDescriptor>,
    pub css_properties: Vec<CssPropertyDescriptor>,
    pub declaration: Option<DeclarationRef>,
    pub built_in: bool,
    /// Declared by the host program (discovered or declared extension)
    pub declared: bool,
    pub related: Related,
}

impl TagDescriptor {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Stamp provenance on the tag and every member.
    pub(crate) fn stamp(&mut self, layer: KnowledgeLayer) {
        let origin = Origin {
            layer,
            from_tag: Some(self.name.clone()),
        };
        stamp_all(&mut self.attributes, &origin);
        stamp_all(&mut self.properties, &origin);
        stamp_all(&mut self.events, &origin);
        stamp_all(&mut self.slots, &origin);
        stamp_all(&mut self.css_parts, &origin);
        stamp_all(&mut self.css_properties, &origin);
        if !self.related.contains(&origin) {
            self.related.push(origin);
        }
        for attribute in &mut self.attributes {
            attribute.from_tag.get_or_insert_with(|| self.name.clone());
        }
        for property in &mut self.properties {
            property.from_tag.get_or_insert_with(|| self.name.clone());
        }
        for event in &mut self.events {
            event.from_tag.get_or_insert_with(|| self.name.clone());
        }
        for slot in &mut self.slots {
            slot.from_tag.get_or_insert_with(|| self.name.clone());
        }
    }

    /// Merge a same-named tag from another layer.
    pub fn merge_with(&mut self, other: &TagDescriptor) {
        merge_lists(&mut self.attributes, &other.attributes);
        merge_lists(&mut self.properties, &other.properties);
        merge_lists(&mut self.events, &other.events);
        merge_lists(&mut self.slots, &other.slots);
        merge_lists(&mut self.css_parts, &other.css_parts);
        merge_lists(&mut self.css_properties, &other.css_properties);
        if self.description.is_none() {
            self.description = other.description.clone();
        }
        if self.declaration.is_none() {
            self.declaration = other.declaration.clone();
        }
        self.built_in |= other.built_in;
        self.declared |= other.declared;
        extend_related(&mut self.related, &other.related);
    }
}

pub(crate) fn stamp_all<D: Descriptor>(descriptors: &mut [D], origin: &Origin) {
    for descriptor in descriptors {
        let related = descriptor.related_mut();
        if !related.contains(origin) {
            related.push(origin.clone());
        }
    }
}

fn merge_lists<D: Descriptor>(into: &mut Vec<D>, from: &[D]) {
    for descriptor in from {
        match into
            .iter_mut()
            .find(|d| d.name().eq_ignore_ascii_case(descriptor.name()))
        {
            Some(existing) => existing.merge_with(descriptor),
            None => into.push(descriptor.clone()),
        }
    }
}
