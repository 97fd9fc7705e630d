//! Mapping from "what changed" to "which cached views to drop".
//!
//! Kept free of any store state so the rules can be tested on their own.

use litho_carton::{lower_name, CompactString, FxHashSet};

use crate::descriptor::TagDescriptor;
use crate::layer::{HtmlCollection, NamedCollection};

/// A change to one knowledge layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub names: NamedCollection,
    /// A changed tag declares events
    pub tag_events: bool,
    /// A changed tag declares css parts
    pub tag_css_parts: bool,
    /// A changed tag declares css custom properties
    pub tag_css_properties: bool,
}

impl ChangeSet {
    /// Change caused by absorbing a collection.
    pub fn from_collection(collection: &HtmlCollection) -> Self {
        let mut change = Self {
            names: collection.names(),
            ..Default::default()
        };
        change.note_tags(&collection.tags);
        change
    }

    /// Change caused by forgetting names; `removed` are the tag entries that
    /// were actually dropped.
    pub fn from_forget(names: &NamedCollection, removed: &[TagDescriptor]) -> Self {
        let mut change = Self {
            names: names.clone(),
            ..Default::default()
        };
        change.note_tags(removed);
        change
    }

    fn note_tags(&mut self, tags: &[TagDescriptor]) {
        for tag in tags {
            self.tag_events |= !tag.events.is_empty();
            self.tag_css_parts |= !tag.css_parts.is_empty();
            self.tag_css_properties |= !tag.css_properties.is_empty();
        }
    }

    /// Combine two changes.
    pub fn union(mut self, other: ChangeSet) -> Self {
        self.names.tags.extend(other.names.tags);
        self.names.attributes.extend(other.names.attributes);
        self.names.properties.extend(other.names.properties);
        self.names.events.extend(other.names.events);
        self.names.slots.extend(other.names.slots);
        self.names.css_parts.extend(other.names.css_parts);
        self.names.css_properties.extend(other.names.css_properties);
        self.tag_events |= other.tag_events;
        self.tag_css_parts |= other.tag_css_parts;
        self.tag_css_properties |= other.tag_css_properties;
        self
    }
}

/// Which cached views must be dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationPlan {
    /// Per-tag entries to drop, lower-cased
    pub tags: FxHashSet<CompactString>,
    /// Drop the list of all tag names
    pub tag_list: bool,

    pub global_attributes: bool,
    pub global_properties: bool,
    pub global_events: bool,
    pub global_slots: bool,
    pub global_css_parts: bool,
    pub global_css_properties: bool,

    /// Drop the per-tag view of a category for every tag
    pub all_tag_attributes: bool,
    pub all_tag_properties: bool,
    pub all_tag_events: bool,
    pub all_tag_slots: bool,
    pub all_tag_css_parts: bool,
    pub all_tag_css_properties: bool,
}

impl InvalidationPlan {
    pub fn is_empty(&self) -> bool {
        *self == InvalidationPlan::default()
    }
}

/// Compute the invalidation for a change.
///
/// `extension` is the lower-cased name of the declared base class whose
/// members every tag inherits.
pub fn plan_invalidation(change: &ChangeSet, extension: Option<&str>) -> InvalidationPlan {
    let names = &change.names;
    let mut plan = InvalidationPlan {
        tags: names.tags.iter().map(|t| lower_name(t)).collect(),
        tag_list: !names.tags.is_empty(),
        ..Default::default()
    };

    // Global buckets are folded into every tag's effective view.
    if !names.attributes.is_empty() {
        plan.global_attributes = true;
        plan.all_tag_attributes = true;
    }
    if !names.properties.is_empty() {
        plan.global_properties = true;
        plan.all_tag_properties = true;
    }
    if !names.events.is_empty() {
        plan.global_events = true;
        plan.all_tag_events = true;
    }
    if !names.slots.is_empty() {
        plan.global_slots = true;
        plan.all_tag_slots = true;
    }
    if !names.css_parts.is_empty() {
        plan.global_css_parts = true;
        plan.all_tag_css_parts = true;
    }
    if !names.css_properties.is_empty() {
        plan.global_css_properties = true;
        plan.all_tag_css_properties = true;
    }

    // Tag events bubble to every tag; css parts and properties are visible
    // document-wide.
    if change.tag_events {
        plan.global_events = true;
        plan.all_tag_events = true;
    }
    if change.tag_css_parts {
        plan.global_css_parts = true;
        plan.all_tag_css_parts = true;
    }
    if change.tag_css_properties {
        plan.global_css_properties = true;
        plan.all_tag_css_properties = true;
    }

    if let Some(extension) = extension {
        if plan.tags.contains(extension) {
            plan.all_tag_attributes = true;
            plan.all_tag_properties = true;
            plan.all_tag_events = true;
            plan.all_tag_slots = true;
        }
    }

    plan
}
