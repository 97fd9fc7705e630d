//! Knowledge layers and the collections they are fed with.

use litho_carton::{lower_name, CompactString, FxHashMap};
use serde::Serialize;

use crate::descriptor::{
    stamp_all, AttributeDescriptor, CssPartDescriptor, CssPropertyDescriptor, Descriptor,
    EventDescriptor, Origin, PropertyDescriptor, SlotDescriptor, TagDescriptor,
};

/// Descriptor source, in merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum KnowledgeLayer {
    BuiltIn,
    UserConfig,
    StaticallyDiscovered,
    /// Members of a base class every element extends (`HTMLElement`)
    DeclaredExtension,
}

impl KnowledgeLayer {
    pub const ALL: [KnowledgeLayer; 4] = [
        KnowledgeLayer::BuiltIn,
        KnowledgeLayer::UserConfig,
        KnowledgeLayer::StaticallyDiscovered,
        KnowledgeLayer::DeclaredExtension,
    ];

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Descriptors not tied to a specific tag.
#[derive(Debug, Clone, Default)]
pub struct GlobalBucket {
    pub attributes: Vec<AttributeDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub events: Vec<EventDescriptor>,
    pub slots: Vec<SlotDescriptor>,
    pub css_parts: Vec<CssPartDescriptor>,
    pub css_properties: Vec<CssPropertyDescriptor>,
}

/// A set of descriptors absorbed into one layer at once.
#[derive(Debug, Clone, Default)]
pub struct HtmlCollection {
    pub tags: Vec<TagDescriptor>,
    pub global: GlobalBucket,
}

impl HtmlCollection {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.global.attributes.is_empty()
            && self.global.properties.is_empty()
            && self.global.events.is_empty()
            && self.global.slots.is_empty()
            && self.global.css_parts.is_empty()
            && self.global.css_properties.is_empty()
    }

    /// Names of everything in the collection.
    pub fn names(&self) -> NamedCollection {
        fn names<D: Descriptor>(list: &[D]) -> Vec<CompactString> {
            list.iter().map(|d| lower_name(d.name())).collect()
        }
        NamedCollection {
            tags: self.tags.iter().map(|t| lower_name(&t.name)).collect(),
            attributes: names(&self.global.attributes),
            properties: names(&self.global.properties),
            events: names(&self.global.events),
            slots: names(&self.global.slots),
            css_parts: names(&self.global.css_parts),
            css_properties: names(&self.global.css_properties),
        }
    }

    /// Merge another collection into this one.
    pub fn extend(&mut self, other: HtmlCollection) {
        self.tags.extend(other.tags);
        self.global.attributes.extend(other.global.attributes);
        self.global.properties.extend(other.global.properties);
        self.global.events.extend(other.global.events);
        self.global.slots.extend(other.global.slots);
        self.global.css_parts.extend(other.global.css_parts);
        self.global.css_properties.extend(other.global.css_properties);
    }
}

/// Names to forget from a layer. Tag names address tag entries, the other
/// lists address the global bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedCollection {
    pub tags: Vec<CompactString>,
    pub attributes: Vec<CompactString>,
    pub properties: Vec<CompactString>,
    pub events: Vec<CompactString>,
    pub slots: Vec<CompactString>,
    pub css_parts: Vec<CompactString>,
    pub css_properties: Vec<CompactString>,
}

/// Ordered descriptors with a case-insensitive name index.
#[derive(Debug, Clone)]
pub struct DescriptorMap<D> {
    items: Vec<D>,
    index: FxHashMap<CompactString, usize>,
}

impl<D> Default for DescriptorMap<D> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<D: Descriptor> DescriptorMap<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, merging with an existing same-named descriptor.
    pub fn insert_merge(&mut self, descriptor: &D) {
        let key = lower_name(descriptor.name());
        match self.index.get(&key) {
            Some(&i) => self.items[i].merge_with(descriptor),
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(descriptor.clone());
            }
        }
    }

    /// Insert only when the name is not present yet.
    pub fn insert_if_absent(&mut self, descriptor: &D) {
        let key = lower_name(descriptor.name());
        if !self.index.contains_key(&key) {
            self.index.insert(key, self.items.len());
            self.items.push(descriptor.clone());
        }
    }

    /// Insert, replacing a same-named descriptor.
    pub fn insert_replace(&mut self, descriptor: D) -> Option<D> {
        let key = lower_name(descriptor.name());
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.items[i], descriptor)),
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(descriptor);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<D> {
        let i = self.index.remove(&lower_name(name))?;
        let removed = self.items.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, name: &str) -> Option<&D> {
        self.index.get(&lower_name(name)).map(|&i| &self.items[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&lower_name(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, D> {
        self.items.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|d| d.name())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Descriptor for TagDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn merge_with(&mut self, other: &Self) {
        TagDescriptor::merge_with(self, other)
    }

    fn related_mut(&mut self) -> &mut crate::descriptor::Related {
        &mut self.related
    }
}

/// Raw descriptor maps of one layer.
#[derive(Debug, Clone, Default)]
pub(crate) struct LayerStore {
    pub tags: DescriptorMap<TagDescriptor>,
    pub attributes: DescriptorMap<AttributeDescriptor>,
    pub properties: DescriptorMap<PropertyDescriptor>,
    pub events: DescriptorMap<EventDescriptor>,
    pub slots: DescriptorMap<SlotDescriptor>,
    pub css_parts: DescriptorMap<CssPartDescriptor>,
    pub css_properties: DescriptorMap<CssPropertyDescriptor>,
}

impl LayerStore {
    /// Replace entries by name, returning the tags that were replaced.
    /// Absorbing the same collection twice leaves the store unchanged.
    pub fn absorb(
        &mut self,
        layer: KnowledgeLayer,
        collection: HtmlCollection,
    ) -> Vec<TagDescriptor> {
        let origin = Origin {
            layer,
            from_tag: None,
        };
        let HtmlCollection { tags, mut global } = collection;

        let mut replaced = Vec::new();
        for mut tag in tags {
            tag.stamp(layer);
            replaced.extend(self.tags.insert_replace(tag));
        }

        stamp_all(&mut global.attributes, &origin);
        stamp_all(&mut global.properties, &origin);
        stamp_all(&mut global.events, &origin);
        stamp_all(&mut global.slots, &origin);
        stamp_all(&mut global.css_parts, &origin);
        stamp_all(&mut global.css_properties, &origin);
        global
            .attributes
            .into_iter()
            .for_each(|d| {
                self.attributes.insert_replace(d);
            });
        global
            .properties
            .into_iter()
            .for_each(|d| {
                self.properties.insert_replace(d);
            });
        global
            .events
            .into_iter()
            .for_each(|d| {
                self.events.insert_replace(d);
            });
        global
            .slots
            .into_iter()
            .for_each(|d| {
                self.slots.insert_replace(d);
            });
        global
            .css_parts
            .into_iter()
            .for_each(|d| {
                self.css_parts.insert_replace(d);
            });
        global
            .css_properties
            .into_iter()
            .for_each(|d| {
                self.css_properties.insert_replace(d);
            });
        replaced
    }

    /// Remove entries by name, returning the removed tags.
    pub fn forget(&mut self, names: &NamedCollection) -> Vec<TagDescriptor> {
        let removed = names
            .tags
            .iter()
            .filter_map(|name| self.tags.remove(name))
            .collect();
        names.attributes.iter().for_each(|n| {
            self.attributes.remove(n);
        });
        names.properties.iter().for_each(|n| {
            self.properties.remove(n);
        });
        names.events.iter().for_each(|n| {
            self.events.remove(n);
        });
        names.slots.iter().for_each(|n| {
            self.slots.remove(n);
        });
        names.css_parts.iter().for_each(|n| {
            self.css_parts.remove(n);
        });
        names.css_properties.iter().for_each(|n| {
            self.css_properties.remove(n);
        });
        removed
    }
}
