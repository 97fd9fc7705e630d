//! Layered tag knowledge with lazily merged, invalidating views.
//!
//! ```text
//!  BuiltIn ─┐
//!  UserConfig ─┤   merge on miss    +-----------------+
//!  StaticallyDiscovered ─┼──────────────▶ | cached views     |
//!  DeclaredExtension ─┘   memoize on hit  | per tag / global |
//!                                          +-----------------+
//! ```
//!
//! Every mutation goes through [`plan_invalidation`], which decides which
//! cached views are dropped.

use std::cell::RefCell;
use std::rc::Rc;

use litho_carton::{lower_name, CompactString, FxHashMap};

use crate::descriptor::{
    AttributeDescriptor, CssPartDescriptor, CssPropertyDescriptor, Descriptor, EventDescriptor,
    PropertyDescriptor, SlotDescriptor, TagDescriptor,
};
use crate::invalidation::{plan_invalidation, ChangeSet, InvalidationPlan};
use crate::layer::{DescriptorMap, HtmlCollection, KnowledgeLayer, LayerStore, NamedCollection};

/// Default declared extension every element inherits from.
pub const DEFAULT_EXTENSION: &str = "htmlelement";

type TagCache<D> = RefCell<FxHashMap<CompactString, Rc<DescriptorMap<D>>>>;
type GlobalCache<D> = RefCell<Option<Rc<DescriptorMap<D>>>>;

/// The four-layer descriptor store.
#[derive(Debug)]
pub struct HtmlKnowledgeBase {
    layers: [LayerStore; 4],
    extension: Option<CompactString>,

    merged_tags: RefCell<FxHashMap<CompactString, Option<Rc<TagDescriptor>>>>,
    tag_list: RefCell<Option<Rc<Vec<Rc<TagDescriptor>>>>>,

    global_attributes: GlobalCache<AttributeDescriptor>,
    global_properties: GlobalCache<PropertyDescriptor>,
    global_events: GlobalCache<EventDescriptor>,
    global_slots: GlobalCache<SlotDescriptor>,
    global_css_parts: GlobalCache<CssPartDescriptor>,
    global_css_properties: GlobalCache<CssPropertyDescriptor>,

    tag_attributes: TagCache<AttributeDescriptor>,
    tag_properties: TagCache<PropertyDescriptor>,
    tag_events: TagCache<EventDescriptor>,
    tag_slots: TagCache<SlotDescriptor>,
    tag_css_parts: TagCache<CssPartDescriptor>,
    tag_css_properties: TagCache<CssPropertyDescriptor>,
}

impl Default for HtmlKnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlKnowledgeBase {
    pub fn new() -> Self {
        Self {
            layers: Default::default(),
            extension: Some(CompactString::new(DEFAULT_EXTENSION)),
            merged_tags: Default::default(),
            tag_list: Default::default(),
            global_attributes: Default::default(),
            global_properties: Default::default(),
            global_events: Default::default(),
            global_slots: Default::default(),
            global_css_parts: Default::default(),
            global_css_properties: Default::default(),
            tag_attributes: Default::default(),
            tag_properties: Default::default(),
            tag_events: Default::default(),
            tag_slots: Default::default(),
            tag_css_parts: Default::default(),
            tag_css_properties: Default::default(),
        }
    }

    /// Name of the declared extension, lower-cased.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Set the declared extension tag name. `None` disables it.
    pub fn set_extension(&mut self, name: Option<&str>) {
        self.extension = name.map(lower_name);
        self.clear_caches();
    }

    // ========== Mutation ==========

    /// Add a collection to a layer, replacing same-named entries.
    pub fn absorb(&mut self, layer: KnowledgeLayer, collection: HtmlCollection) {
        if collection.is_empty() {
            return;
        }
        let added = ChangeSet::from_collection(&collection);
        tracing::debug!(
            ?layer,
            tags = collection.tags.len(),
            "absorbing descriptors"
        );
        let replaced = self.layers[layer.index()].absorb(layer, collection);
        // Replaced tags are invalidated as if forgotten.
        let change = added.union(ChangeSet::from_forget(&NamedCollection::default(), &replaced));
        self.invalidate(&change);
    }

    /// Remove named entries from a layer.
    pub fn forget(&mut self, layer: KnowledgeLayer, names: &NamedCollection) {
        let removed = self.layers[layer.index()].forget(names);
        let change = ChangeSet::from_forget(names, &removed);
        tracing::debug!(?layer, tags = removed.len(), "forgetting descriptors");
        self.invalidate(&change);
    }

    /// Empty a layer completely.
    pub fn clear_layer(&mut self, layer: KnowledgeLayer) {
        self.layers[layer.index()] = LayerStore::default();
        self.clear_caches();
    }

    fn invalidate(&self, change: &ChangeSet) {
        let plan = plan_invalidation(change, self.extension());
        self.apply(&plan);
    }

    /// Drop the cached views named by a plan.
    pub fn apply(&self, plan: &InvalidationPlan) {
        if plan.is_empty() {
            return;
        }
        {
            let mut merged = self.merged_tags.borrow_mut();
            for tag in &plan.tags {
                merged.remove(tag);
            }
        }
        if plan.tag_list {
            self.tag_list.replace(None);
        }

        clear_global(&self.global_attributes, plan.global_attributes);
        clear_global(&self.global_properties, plan.global_properties);
        clear_global(&self.global_events, plan.global_events);
        clear_global(&self.global_slots, plan.global_slots);
        clear_global(&self.global_css_parts, plan.global_css_parts);
        clear_global(&self.global_css_properties, plan.global_css_properties);

        clear_tags(&self.tag_attributes, plan, plan.all_tag_attributes);
        clear_tags(&self.tag_properties, plan, plan.all_tag_properties);
        clear_tags(&self.tag_events, plan, plan.all_tag_events);
        clear_tags(&self.tag_slots, plan, plan.all_tag_slots);
        clear_tags(&self.tag_css_parts, plan, plan.all_tag_css_parts);
        clear_tags(&self.tag_css_properties, plan, plan.all_tag_css_properties);
    }

    fn clear_caches(&self) {
        self.merged_tags.borrow_mut().clear();
        self.tag_list.replace(None);
        self.global_attributes.replace(None);
        self.global_properties.replace(None);
        self.global_events.replace(None);
        self.global_slots.replace(None);
        self.global_css_parts.replace(None);
        self.global_css_properties.replace(None);
        self.tag_attributes.borrow_mut().clear();
        self.tag_properties.borrow_mut().clear();
        self.tag_events.borrow_mut().clear();
        self.tag_slots.borrow_mut().clear();
        self.tag_css_parts.borrow_mut().clear();
        self.tag_css_properties.borrow_mut().clear();
    }

    // ========== Merged tags ==========

    /// A tag merged across every layer.
    pub fn get_html_tag(&self, name: &str) -> Option<Rc<TagDescriptor>> {
        let key = lower_name(name);
        if let Some(cached) = self.merged_tags.borrow().get(&key) {
            return cached.clone();
        }

        let mut merged: Option<TagDescriptor> = None;
        for layer in &self.layers {
            if let Some(tag) = layer.tags.get(&key) {
                match merged.as_mut() {
                    Some(existing) => existing.merge_with(tag),
                    None => merged = Some(tag.clone()),
                }
            }
        }
        let merged = merged.map(Rc::new);
        self.merged_tags.borrow_mut().insert(key, merged.clone());
        merged
    }

    /// Check for a known tag (excluding the declared extension).
    pub fn has_tag(&self, name: &str) -> bool {
        let key = lower_name(name);
        self.extension.as_deref() != Some(key.as_str()) && self.get_html_tag(&key).is_some()
    }

    /// Every known tag, merged, in first-seen layer order.
    pub fn all_tags(&self) -> Rc<Vec<Rc<TagDescriptor>>> {
        if let Some(cached) = self.tag_list.borrow().as_ref() {
            return cached.clone();
        }
        let mut seen: DescriptorMap<TagDescriptor> = DescriptorMap::new();
        for layer in &self.layers {
            for tag in layer.tags.iter() {
                if self.extension.as_deref() == Some(lower_name(&tag.name).as_str()) {
                    continue;
                }
                seen.insert_if_absent(tag);
            }
        }
        let list: Vec<Rc<TagDescriptor>> = seen
            .names()
            .filter_map(|name| self.get_html_tag(name))
            .collect();
        let list = Rc::new(list);
        self.tag_list.replace(Some(list.clone()));
        list
    }

    fn extension_tag(&self) -> Option<Rc<TagDescriptor>> {
        self.extension
            .as_deref()
            .and_then(|name| self.get_html_tag(name))
    }

    // ========== Global views ==========

    pub fn global_attributes(&self) -> Rc<DescriptorMap<AttributeDescriptor>> {
        global_view(&self.global_attributes, &self.layers, |l| &l.attributes)
    }

    pub fn global_properties(&self) -> Rc<DescriptorMap<PropertyDescriptor>> {
        global_view(&self.global_properties, &self.layers, |l| &l.properties)
    }

    pub fn global_events(&self) -> Rc<DescriptorMap<EventDescriptor>> {
        global_view(&self.global_events, &self.layers, |l| &l.events)
    }

    pub fn global_slots(&self) -> Rc<DescriptorMap<SlotDescriptor>> {
        global_view(&self.global_slots, &self.layers, |l| &l.slots)
    }

    pub fn global_css_parts(&self) -> Rc<DescriptorMap<CssPartDescriptor>> {
        global_view(&self.global_css_parts, &self.layers, |l| &l.css_parts)
    }

    pub fn global_css_properties(&self) -> Rc<DescriptorMap<CssPropertyDescriptor>> {
        global_view(&self.global_css_properties, &self.layers, |l| &l.css_properties)
    }

    // ========== Effective per-tag views ==========

    /// Attributes usable on a tag: its own, the extension's and the globals.
    pub fn attributes_for_tag(&self, tag: &str) -> Rc<DescriptorMap<AttributeDescriptor>> {
        self.effective(&self.tag_attributes, tag, |t| &t.attributes, || {
            self.global_attributes()
        })
    }

    /// Properties usable on a tag: its own, the extension's and the globals.
    pub fn properties_for_tag(&self, tag: &str) -> Rc<DescriptorMap<PropertyDescriptor>> {
        self.effective(&self.tag_properties, tag, |t| &t.properties, || {
            self.global_properties()
        })
    }

    /// Slots a tag declares, plus global slots.
    pub fn slots_for_tag(&self, tag: &str) -> Rc<DescriptorMap<SlotDescriptor>> {
        let key = lower_name(tag);
        if let Some(cached) = self.tag_slots.borrow().get(&key) {
            return cached.clone();
        }
        let mut map = DescriptorMap::new();
        if let Some(own) = self.get_html_tag(&key) {
            own.slots.iter().for_each(|s| map.insert_merge(s));
        }
        self.global_slots().iter().for_each(|s| map.insert_merge(s));
        let map = Rc::new(map);
        self.tag_slots.borrow_mut().insert(key, map.clone());
        map
    }

    /// Events observable on a tag.
    ///
    /// A tag that declares no events of its own also sees every other tag's
    /// events, since events bubble up from descendants.
    pub fn events_for_tag(&self, tag: &str) -> Rc<DescriptorMap<EventDescriptor>> {
        let key = lower_name(tag);
        if let Some(cached) = self.tag_events.borrow().get(&key) {
            return cached.clone();
        }

        let mut map = DescriptorMap::new();
        let own = self.get_html_tag(&key);
        if let Some(own) = &own {
            own.events.iter().for_each(|e| map.insert_merge(e));
        }
        if let Some(extension) = self.extension_tag() {
            extension.events.iter().for_each(|e| map.insert_merge(e));
        }
        self.global_events().iter().for_each(|e| map.insert_merge(e));

        let has_own_events = own.is_some_and(|t| !t.events.is_empty());
        if !has_own_events {
            for other in self.all_tags().iter() {
                other.events.iter().for_each(|e| map.insert_if_absent(e));
            }
        }

        let map = Rc::new(map);
        self.tag_events.borrow_mut().insert(key, map.clone());
        map
    }

    /// Css shadow parts visible when styling a tag.
    pub fn css_parts_for_tag(&self, tag: &str) -> Rc<DescriptorMap<CssPartDescriptor>> {
        self.effective(&self.tag_css_parts, tag, |t| &t.css_parts, || {
            self.global_css_parts()
        })
    }

    /// Css custom properties visible when styling a tag.
    pub fn css_properties_for_tag(&self, tag: &str) -> Rc<DescriptorMap<CssPropertyDescriptor>> {
        self.effective(&self.tag_css_properties, tag, |t| &t.css_properties, || {
            self.global_css_properties()
        })
    }

    fn effective<D, F, G>(
        &self,
        cache: &TagCache<D>,
        tag: &str,
        members: F,
        globals: G,
    ) -> Rc<DescriptorMap<D>>
    where
        D: Descriptor,
        F: Fn(&TagDescriptor) -> &Vec<D>,
        G: FnOnce() -> Rc<DescriptorMap<D>>,
    {
        let key = lower_name(tag);
        if let Some(cached) = cache.borrow().get(&key) {
            return cached.clone();
        }

        let mut map = DescriptorMap::new();
        if let Some(own) = self.get_html_tag(&key) {
            members(own.as_ref()).iter().for_each(|d| map.insert_merge(d));
        }
        if let Some(extension) = self.extension_tag() {
            members(extension.as_ref()).iter().for_each(|d| map.insert_merge(d));
        }
        globals().iter().for_each(|d| map.insert_merge(d));

        let map = Rc::new(map);
        cache.borrow_mut().insert(key, map.clone());
        map
    }

    // ========== Single lookups ==========

    pub fn attribute(&self, tag: &str, name: &str) -> Option<AttributeDescriptor> {
        self.attributes_for_tag(tag).get(name).cloned()
    }

    pub fn property(&self, tag: &str, name: &str) -> Option<PropertyDescriptor> {
        self.properties_for_tag(tag).get(name).cloned()
    }

    pub fn event(&self, tag: &str, name: &str) -> Option<EventDescriptor> {
        self.events_for_tag(tag).get(name).cloned()
    }

    /// Number of raw tag entries in a layer.
    pub fn layer_len(&self, layer: KnowledgeLayer) -> usize {
        self.layers[layer.index()].tags.len()
    }
}

fn clear_global<D>(cache: &GlobalCache<D>, clear: bool) {
    if clear {
        cache.replace(None);
    }
}

fn clear_tags<D>(cache: &TagCache<D>, plan: &InvalidationPlan, all: bool) {
    let mut cache = cache.borrow_mut();
    if all {
        cache.clear();
    } else {
        for tag in &plan.tags {
            cache.remove(tag);
        }
    }
}

fn global_view<D, F>(cache: &GlobalCache<D>, layers: &[LayerStore; 4], bucket: F) -> Rc<DescriptorMap<D>>
where
    D: Descriptor,
    F: Fn(&LayerStore) -> &DescriptorMap<D>,
{
    if let Some(cached) = cache.borrow().as_ref() {
        return cached.clone();
    }
    let mut map = DescriptorMap::new();
    for layer in layers {
        bucket(layer).iter().for_each(|d| map.insert_merge(d));
    }
    let map = Rc::new(map);
    cache.replace(Some(map.clone()));
    map
}
