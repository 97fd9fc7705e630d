//! Carton - The artist's toolbox for Litho.
//!
//! This crate provides the foundational utilities shared by every Litho crate:
//! byte ranges, case-insensitive descriptor names and fuzzy name suggestions.
//!
//! # Example
//!
//! ```
//! use litho_carton::{source_range::SourceRange, fuzzy::suggest};
//!
//! let range = SourceRange::new(4, 10);
//! assert!(range.contains(4));
//! assert!(!range.contains(10));
//!
//! let candidates = ["disabled", "hidden", "value"];
//! assert_eq!(suggest("disabeld", candidates.iter().copied(), 3), Some("disabled"));
//! ```

pub mod fuzzy;
pub mod name;
pub mod source_range;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;
pub use compact_str::CompactString as String;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_map, phf_set, Map as PhfMap, Set as PhfSet};

pub use name::{is_custom_element_name, is_raw_text_tag, is_void_tag, lower_name};
pub use source_range::SourceRange;
