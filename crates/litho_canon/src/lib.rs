//! # litho_canon
//!
//! Canon - The standard of correctness for Litho.
//! Structural types and assignability for template bindings.
//!
//! ## Name Origin
//!
//! **Canon** (/ˈkænən/) in art refers to a set of ideal proportions or standards
//! that define perfection. `litho_canon` holds the standard every bound value
//! is measured against: the structural type a binding target accepts.
//!
//! ## Architecture
//!
//! ```text
//! +-------------------+     +------------------------+
//! | SimpleType        |     | is_assignable          |
//! | - primitives      |---->| - coercion-free check  |
//! | - literals/unions |     | matches_nominal        |
//! | - objects/fns     |     | - security allow-lists |
//! +-------------------+     +------------------------+
//! ```

mod assignable;
mod types;

pub use assignable::{is_assignable, matches_nominal};
pub use types::{format_number, FunctionType, Member, ObjectType, Parameter, SimpleType};
