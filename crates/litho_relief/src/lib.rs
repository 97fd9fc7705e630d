//! # litho_relief
//!
//! Relief - The sculptured template tree for Litho.
//!
//! ## Name Origin
//!
//! **Relief** is a sculpture that rises from a flat background. The template
//! tree rises from the flat text of a virtual document: elements, their
//! classified attribute bindings and the values assigned to them.
//!
//! Nodes, attributes and assignments are stored in arenas on
//! [`TemplateDocument`] and addressed by [`NodeId`], [`AttributeId`] and
//! [`AssignmentId`]. Assignment ids are stable for the document's lifetime,
//! which makes them usable as memoization keys.

pub mod ast;
pub mod document;
pub mod errors;

pub use ast::*;
pub use document::TemplateDocument;
pub use errors::{ErrorCode, ParseError};
