//! References to host-language expressions embedded in template literals.

use litho_carton::{CompactString, SourceRange};
use serde::Serialize;

/// Identifier of an interpolation hole, unique within one host file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExpressionId(pub u32);

/// A host expression the type provider can be asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HostExpression {
    /// Range of the expression node in the host source
    pub range: SourceRange,
    /// Source text of the expression
    pub text: CompactString,
}

impl HostExpression {
    pub fn new(range: SourceRange, text: impl Into<CompactString>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Shape of an expression that calls a named function, e.g. `ifDefined(x)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallShape {
    /// Callee name (the identifier, or the last member of a member chain)
    pub callee: CompactString,
    pub arguments: Vec<HostExpression>,
}

/// An interpolation hole (`${ ... }`) inside a template literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionRef {
    pub id: ExpressionId,
    /// The expression inside the hole
    pub expression: HostExpression,
    /// Host range of the whole hole, from `$` up to and including `}`
    pub hole: SourceRange,
    /// Set when the expression is a call to a named function
    pub call: Option<CallShape>,
}

impl ExpressionRef {
    /// Length of the placeholder standing in for this hole.
    ///
    /// Equals the text between `${` and `}` plus the three delimiter bytes.
    #[inline]
    pub fn placeholder_len(&self) -> u32 {
        self.hole.len()
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.expression.text
    }
}
