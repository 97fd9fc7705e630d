//! # litho_croquis
//!
//! Croquis - Tag knowledge and binding types for Litho.
//!
//! ## Name Origin
//!
//! **Croquis** (/kʁɔ.ki/) is a French term for a quick, sketchy drawing that captures
//! the essential features of a subject. `litho_croquis` sketches what every
//! template binding means: which tag it lives on, which attribute, property or
//! event it targets, and what type flows into it.
//!
//! ## Purpose
//!
//! - **Knowledge Base**: Layered tag descriptors (built-in, configured,
//!   discovered, declared extension) with lazily merged views
//! - **Invalidation**: A pure plan of which cached views a change affects
//! - **Binding Resolution**: Target and value types per attribute assignment
//! - **Directives**: Recognition of directive calls and their type overrides
//!
//! ## Architecture
//!
//! ```text
//! litho_armature (Parse)
//!        ↓
//!   litho_relief (Tree)
//!        ↓
//!  litho_croquis (Knowledge + Types)  ← This crate
//!        ↓
//!  litho_patina (Rules)
//! ```

pub mod builtins;
pub mod descriptor;
pub mod directive;
pub mod discovery;
pub mod host;
pub mod html_data;
pub mod invalidation;
pub mod knowledge;
pub mod layer;
pub mod resolver;

pub use descriptor::{
    AttributeDescriptor, CssPartDescriptor, CssPropertyDescriptor, DeclarationRef, Descriptor,
    EventDescriptor, MemberDescriptor, NamedDescriptor, Origin, PropertyDescriptor,
    SlotDescriptor, TagDescriptor, TypeCell,
};
pub use directive::{DirectiveInfo, DirectiveKind};
pub use discovery::{
    BindingTarget, ComponentDefinition, ComponentDiscovery, ComponentEvent, ComponentMember,
    ComponentSlot, DiscoveryDiagnostic, DiscoveryResult,
};
pub use host::{TypeProvider, UnknownTypes};
pub use html_data::{HtmlDataError, HtmlDataResult};
pub use invalidation::{plan_invalidation, ChangeSet, InvalidationPlan};
pub use knowledge::HtmlKnowledgeBase;
pub use layer::{DescriptorMap, GlobalBucket, HtmlCollection, KnowledgeLayer, NamedCollection};
pub use resolver::{BindingTypeCache, BindingTypeResolver, BindingTypes};
