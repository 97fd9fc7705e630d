//! Host type information boundary.

use litho_canon::SimpleType;
use litho_stencil::HostExpression;

/// Answers static type queries about host expressions.
pub trait TypeProvider {
    /// Static type of an expression in a host file.
    fn type_of(&self, file_name: &str, expression: &HostExpression) -> SimpleType;
}

/// A provider without type information. Every expression is `unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownTypes;

impl TypeProvider for UnknownTypes {
    fn type_of(&self, _file_name: &str, _expression: &HostExpression) -> SimpleType {
        SimpleType::Unknown
    }
}
