//! # litho
//!
//! Litho - Analysis of html and css template literals.
//!
//! ## Name Origin
//!
//! **Lithography** prints from a flat stone on which the image is drawn
//! in grease. Templates written inside host source are flat strings, too;
//! `litho` lifts them off the page, parses them and checks every binding
//! against what is known about the tags they use.
//!
//! ## Usage
//!
//! An [`AnalysisSession`] is created from three collaborators: the
//! [`HostProgram`] handing out source text, a [`TypeProvider`] answering
//! type queries about interpolated expressions, and a
//! [`ComponentDiscovery`] finding component declarations. The session then
//! answers diagnostics and IDE lookups per file.
//!
//! ## Architecture
//!
//! ```text
//!  litho_stencil (Extract) → litho_armature (Parse) → litho_relief (Tree)
//!                                   ↓
//!                     litho_croquis (Knowledge + Types)
//!                                   ↓
//!                       litho_patina (Rules)
//!                                   ↓
//!                          litho (Session)  ← This crate
//! ```

pub mod config;
pub mod ide;
pub mod session;

pub use config::{load_config, read_config, ConfigError, HtmlDataSource, LithoConfig};
pub use ide::{Completion, CompletionKind, Hover};
pub use session::{AnalysisSession, HostProgram, DISCOVERY_RULE};

pub use litho_canon::SimpleType;
pub use litho_croquis::{
    ComponentDefinition, ComponentDiscovery, ComponentEvent, ComponentMember, ComponentSlot,
    DeclarationRef, DiscoveryDiagnostic, DiscoveryResult, TypeProvider,
};
pub use litho_patina::{
    DiagnosticKind, DiagnosticPayload, DocumentRef, Severity, TemplateDiagnostic,
};
pub use litho_stencil::HostExpression;
