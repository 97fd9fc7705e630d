//! # litho_stencil
//!
//! Stencil - Virtual documents cut out of host source files.
//!
//! ## Name Origin
//!
//! A **stencil** is a sheet with holes cut into it; ink passes through the
//! openings and leaves the rest of the surface untouched. `litho_stencil`
//! lifts template literals out of host code and masks every interpolation
//! hole with a same-width placeholder, so markup and stylesheet parsers see
//! plain text whose offsets still line up with the host file.
//!
//! ## Example
//!
//! ```ignore
//! use litho_stencil::{extract_documents, LiteralTags};
//!
//! let docs = extract_documents("a.ts", "html`<b>${x}</b>`", &LiteralTags::default())?;
//! assert_eq!(docs[0].text(), "<b>____</b>");
//! ```

mod document;
mod expression;
mod extract;

pub use document::{Dialect, DocumentPart, TextPart, VirtualDocument, PLACEHOLDER_CHAR};
pub use expression::{CallShape, ExpressionId, ExpressionRef, HostExpression};
pub use extract::{extract_documents, ExtractError, LiteralTags};
