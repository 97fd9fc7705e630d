//! # litho_armature
//!
//! Armature - The structural markup parser for Litho templates.
//!
//! ## Name Origin
//!
//! An **armature** is the internal frame a sculptor builds a figure on.
//! `litho_armature` is the frame under every template: a tokenizer state
//! machine and a tree builder that turns a virtual document into a
//! [`litho_relief::TemplateDocument`].

pub mod parser;
pub mod tokenizer;

pub use parser::parse;
pub use tokenizer::{Callbacks, QuoteType, Tokenizer};
