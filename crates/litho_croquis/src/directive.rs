//! Directive recognition.
//!
//! A directive is a call in a binding position whose result the template
//! runtime treats specially. Built-in directives are recognized by callee
//! name; any other call whose value is a part-consuming function (or the
//! nominal `DirectiveResult`) is a custom directive.

use litho_canon::SimpleType;
use litho_stencil::{ExpressionRef, HostExpression};
use phf::phf_map;
use serde::Serialize;

use crate::host::TypeProvider;

/// Directive kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DirectiveKind {
    /// `ifDefined(value)`: renders nothing for undefined values
    IfDefined,
    /// `guard(deps, fn)`: recomputes only when dependencies change
    Guard,
    ClassMap,
    StyleMap,
    /// `unsafeHTML(markup)`
    UnsafeHtml,
    Cache,
    Repeat,
    AsyncReplace,
    AsyncAppend,
    /// A user-defined directive
    Custom,
}

static BUILTIN_DIRECTIVES: phf::Map<&'static str, DirectiveKind> = phf_map! {
    "ifDefined" => DirectiveKind::IfDefined,
    "guard" => DirectiveKind::Guard,
    "classMap" => DirectiveKind::ClassMap,
    "styleMap" => DirectiveKind::StyleMap,
    "unsafeHTML" => DirectiveKind::UnsafeHtml,
    "cache" => DirectiveKind::Cache,
    "repeat" => DirectiveKind::Repeat,
    "asyncReplace" => DirectiveKind::AsyncReplace,
    "asyncAppend" => DirectiveKind::AsyncAppend,
};

/// Parameter types of a part-consuming directive function.
const PART_TYPES: &[&str] = &[
    "AttributePart",
    "BooleanAttributePart",
    "PropertyPart",
    "EventPart",
    "NodePart",
    "Part",
];

/// Nominal result type of class-based directives.
const DIRECTIVE_RESULT: &str = "DirectiveResult";

impl DirectiveKind {
    /// Built-in directive for a callee name.
    pub fn from_callee(callee: &str) -> Option<Self> {
        BUILTIN_DIRECTIVES.get(callee).copied()
    }

    /// Name as written in host code.
    pub fn name(self) -> &'static str {
        match self {
            DirectiveKind::IfDefined => "ifDefined",
            DirectiveKind::Guard => "guard",
            DirectiveKind::ClassMap => "classMap",
            DirectiveKind::StyleMap => "styleMap",
            DirectiveKind::UnsafeHtml => "unsafeHTML",
            DirectiveKind::Cache => "cache",
            DirectiveKind::Repeat => "repeat",
            DirectiveKind::AsyncReplace => "asyncReplace",
            DirectiveKind::AsyncAppend => "asyncAppend",
            DirectiveKind::Custom => "directive",
        }
    }

    /// Number of arguments the directive takes, as a range.
    fn arity(self) -> (usize, usize) {
        match self {
            DirectiveKind::IfDefined
            | DirectiveKind::ClassMap
            | DirectiveKind::StyleMap
            | DirectiveKind::UnsafeHtml
            | DirectiveKind::Cache => (1, 1),
            DirectiveKind::Guard => (2, 2),
            DirectiveKind::Repeat => (2, 3),
            DirectiveKind::AsyncReplace | DirectiveKind::AsyncAppend => (1, 2),
            DirectiveKind::Custom => (0, usize::MAX),
        }
    }
}

/// A recognized directive on a binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectiveInfo {
    pub kind: DirectiveKind,
    /// Type the directive actually renders, replacing the call's type
    pub actual_type: Option<SimpleType>,
    /// Arguments do not fit the directive
    pub shape_mismatch: bool,
}

impl DirectiveInfo {
    fn new(kind: DirectiveKind) -> Self {
        Self {
            kind,
            actual_type: None,
            shape_mismatch: false,
        }
    }

    fn mismatch(kind: DirectiveKind) -> Self {
        Self {
            shape_mismatch: true,
            ..Self::new(kind)
        }
    }
}

/// Check if a value type is a custom directive.
pub fn is_directive_type(ty: &SimpleType) -> bool {
    if ty.is_opaque() {
        return false;
    }
    ty.members().iter().all(|member| {
        if member.nominal_name() == Some(DIRECTIVE_RESULT) {
            return true;
        }
        let Some(signature) = member.call_signature() else {
            return false;
        };
        signature.params.len() == 1
            && matches!(*signature.return_type, SimpleType::Void)
            && signature.params[0]
                .ty
                .nominal_name()
                .is_some_and(|name| PART_TYPES.iter().any(|p| *p == name))
    })
}

/// Recognize a directive in an expression binding.
///
/// `value_type` is the static type of the whole expression.
pub fn recognize_directive(
    types: &dyn TypeProvider,
    file_name: &str,
    expression: &ExpressionRef,
    value_type: &SimpleType,
) -> Option<DirectiveInfo> {
    let call = expression.call.as_ref()?;
    if let Some(kind) = DirectiveKind::from_callee(&call.callee) {
        return Some(built_in(types, file_name, kind, &call.arguments));
    }
    is_directive_type(value_type).then(|| DirectiveInfo::new(DirectiveKind::Custom))
}

fn built_in(
    types: &dyn TypeProvider,
    file_name: &str,
    kind: DirectiveKind,
    arguments: &[HostExpression],
) -> DirectiveInfo {
    let (min, max) = kind.arity();
    if arguments.len() < min || arguments.len() > max {
        return DirectiveInfo::mismatch(kind);
    }

    match kind {
        DirectiveKind::IfDefined => DirectiveInfo {
            actual_type: Some(types.type_of(file_name, &arguments[0]).strip_nullable()),
            ..DirectiveInfo::new(kind)
        },
        DirectiveKind::Guard => {
            let callback = types.type_of(file_name, &arguments[1]);
            if callback.is_opaque() {
                return DirectiveInfo::new(kind);
            }
            match callback.call_signature() {
                Some(signature) => DirectiveInfo {
                    actual_type: Some((*signature.return_type).clone()),
                    ..DirectiveInfo::new(kind)
                },
                None => DirectiveInfo::mismatch(kind),
            }
        }
        _ => DirectiveInfo::new(kind),
    }
}
