//! Structural type representation for binding analysis.
//!
//! `SimpleType` is a small, closed model of the host type system: enough to
//! describe what a binding target accepts and what a host expression
//! evaluates to, without carrying any host-checker internals.

use std::fmt;

use litho_carton::CompactString;
use serde::Serialize;

/// A structural type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SimpleType {
    /// Accepts and is accepted by everything.
    Any,
    /// Missing type information. Treated permissively.
    Unknown,
    Never,
    Void,
    Null,
    Undefined,
    String,
    Number,
    Boolean,
    BigInt,
    StringLiteral(CompactString),
    NumberLiteral(f64),
    BooleanLiteral(bool),
    /// Normalized union, see [`SimpleType::union`].
    Union(Vec<SimpleType>),
    Array(Box<SimpleType>),
    Function(FunctionType),
    Object(ObjectType),
}

/// A callable signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionType {
    pub params: Vec<Parameter>,
    pub return_type: Box<SimpleType>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: CompactString,
    pub ty: SimpleType,
    pub optional: bool,
}

/// An object, interface or class instance type.
///
/// `name` is the declared name when the type is nominal (e.g. `HTMLElement`,
/// `TrustedResourceUrl`). Anonymous object literals have no name.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ObjectType {
    pub name: Option<CompactString>,
    pub members: Vec<Member>,
    /// Call signature, for callable objects.
    pub call: Option<Box<FunctionType>>,
}

/// A named member of an object type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub name: CompactString,
    pub ty: SimpleType,
    pub optional: bool,
}

impl Parameter {
    pub fn new(name: impl Into<CompactString>, ty: SimpleType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }
}

impl Member {
    pub fn new(name: impl Into<CompactString>, ty: SimpleType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl ObjectType {
    /// Create a named, nominal object type.
    pub fn named(name: impl Into<CompactString>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

impl SimpleType {
    pub fn string_literal(value: impl Into<CompactString>) -> Self {
        SimpleType::StringLiteral(value.into())
    }

    /// Create a function type.
    pub fn function(params: Vec<Parameter>, return_type: SimpleType) -> Self {
        SimpleType::Function(FunctionType {
            params,
            return_type: Box::new(return_type),
        })
    }

    /// Create a nominal object type without members.
    pub fn named(name: impl Into<CompactString>) -> Self {
        SimpleType::Object(ObjectType::named(name))
    }

    pub fn array(element: SimpleType) -> Self {
        SimpleType::Array(Box::new(element))
    }

    /// Build a normalized union.
    ///
    /// Nested unions are flattened and duplicates removed. `any` absorbs the
    /// whole union, `never` members vanish, and `true | false` collapses to
    /// `boolean`. A single remaining member is returned as-is.
    pub fn union(types: impl IntoIterator<Item = SimpleType>) -> Self {
        let mut flat: Vec<SimpleType> = Vec::new();
        for ty in types {
            match ty {
                SimpleType::Union(inner) => {
                    for member in inner {
                        push_unique(&mut flat, member);
                    }
                }
                other => push_unique(&mut flat, other),
            }
        }

        if flat.iter().any(|t| matches!(t, SimpleType::Any)) {
            return SimpleType::Any;
        }
        if flat.iter().any(|t| matches!(t, SimpleType::Unknown)) {
            return SimpleType::Unknown;
        }
        flat.retain(|t| !matches!(t, SimpleType::Never));

        let has_true = flat.contains(&SimpleType::BooleanLiteral(true));
        let has_false = flat.contains(&SimpleType::BooleanLiteral(false));
        if (has_true && has_false) || flat.contains(&SimpleType::Boolean) {
            flat.retain(|t| !matches!(t, SimpleType::BooleanLiteral(_)));
            push_unique(&mut flat, SimpleType::Boolean);
        }
        if flat.contains(&SimpleType::String) {
            flat.retain(|t| !matches!(t, SimpleType::StringLiteral(_)));
        }
        if flat.contains(&SimpleType::Number) {
            flat.retain(|t| !matches!(t, SimpleType::NumberLiteral(_)));
        }

        match flat.len() {
            0 => SimpleType::Never,
            1 => flat.pop().unwrap_or(SimpleType::Never),
            _ => SimpleType::Union(flat),
        }
    }

    /// Merge two descriptor types: `any` is absorbed into the more specific side.
    pub fn merge(a: &SimpleType, b: &SimpleType) -> SimpleType {
        match (a, b) {
            (SimpleType::Any, other) | (other, SimpleType::Any) => other.clone(),
            _ if a == b => a.clone(),
            _ => SimpleType::union([a.clone(), b.clone()]),
        }
    }

    /// Members of a union, or the type itself.
    pub fn members(&self) -> &[SimpleType] {
        match self {
            SimpleType::Union(types) => types,
            other => std::slice::from_ref(other),
        }
    }

    /// `any`, `unknown` or `never`: types that say nothing about the value.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            SimpleType::Any | SimpleType::Unknown | SimpleType::Never
        )
    }

    /// Check if every member is a primitive (string, number, boolean, bigint,
    /// their literals, `null`, `undefined` or `void`).
    pub fn is_primitive(&self) -> bool {
        match self {
            SimpleType::String
            | SimpleType::Number
            | SimpleType::Boolean
            | SimpleType::BigInt
            | SimpleType::StringLiteral(_)
            | SimpleType::NumberLiteral(_)
            | SimpleType::BooleanLiteral(_)
            | SimpleType::Null
            | SimpleType::Undefined
            | SimpleType::Void => true,
            SimpleType::Union(types) => types.iter().all(SimpleType::is_primitive),
            _ => false,
        }
    }

    /// Check if the type is known to hold objects, arrays or functions.
    pub fn is_complex(&self) -> bool {
        !self.is_opaque() && !self.is_primitive()
    }

    pub fn is_nullable(&self) -> bool {
        self.members()
            .iter()
            .any(|t| matches!(t, SimpleType::Null | SimpleType::Undefined))
    }

    /// Remove `null` and `undefined` members.
    pub fn strip_nullable(&self) -> SimpleType {
        match self {
            SimpleType::Union(types) => SimpleType::union(
                types
                    .iter()
                    .filter(|t| !matches!(t, SimpleType::Null | SimpleType::Undefined))
                    .cloned(),
            ),
            SimpleType::Null | SimpleType::Undefined => SimpleType::Never,
            other => other.clone(),
        }
    }

    /// Call signature of a function or callable object.
    pub fn call_signature(&self) -> Option<&FunctionType> {
        match self {
            SimpleType::Function(function) => Some(function),
            SimpleType::Object(object) => object.call.as_deref(),
            _ => None,
        }
    }

    /// Check if every member can be called. Opaque types are callable.
    pub fn is_callable(&self) -> bool {
        if self.is_opaque() {
            return true;
        }
        self.members()
            .iter()
            .all(|t| t.is_opaque() || t.call_signature().is_some())
    }

    /// Check for an object with a callable `handleEvent` member.
    pub fn has_handle_event(&self) -> bool {
        self.members().iter().all(|t| match t {
            SimpleType::Object(object) => object
                .member("handleEvent")
                .is_some_and(|m| m.ty.is_callable()),
            other => other.is_opaque(),
        })
    }

    /// Declared name of a nominal type.
    pub fn nominal_name(&self) -> Option<&str> {
        match self {
            SimpleType::Object(object) => object.name.as_deref(),
            _ => None,
        }
    }

    /// Check if the type only ever holds numbers.
    pub fn is_number_like(&self) -> bool {
        match self {
            SimpleType::Number | SimpleType::NumberLiteral(_) => true,
            SimpleType::Union(types) => types.iter().all(SimpleType::is_number_like),
            _ => false,
        }
    }

    /// The string an attribute binding renders for this value.
    ///
    /// Numbers become strings, booleans become `"true" | "false"` and
    /// nullish values render as their keyword.
    pub fn to_attribute_string(&self) -> SimpleType {
        match self {
            SimpleType::Number | SimpleType::BigInt => SimpleType::String,
            SimpleType::NumberLiteral(n) => SimpleType::StringLiteral(format_number(*n).into()),
            SimpleType::Boolean => SimpleType::union([
                SimpleType::string_literal("true"),
                SimpleType::string_literal("false"),
            ]),
            SimpleType::BooleanLiteral(b) => SimpleType::string_literal(if *b {
                "true"
            } else {
                "false"
            }),
            SimpleType::Null => SimpleType::string_literal("null"),
            SimpleType::Undefined | SimpleType::Void => SimpleType::string_literal("undefined"),
            SimpleType::Union(types) => {
                SimpleType::union(types.iter().map(SimpleType::to_attribute_string))
            }
            other => other.clone(),
        }
    }
}

fn push_unique(types: &mut Vec<SimpleType>, ty: SimpleType) {
    if !types.contains(&ty) {
        types.push(ty);
    }
}

/// Format a number the way the host language prints it (`50`, not `50.0`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleType::Any => f.write_str("any"),
            SimpleType::Unknown => f.write_str("unknown"),
            SimpleType::Never => f.write_str("never"),
            SimpleType::Void => f.write_str("void"),
            SimpleType::Null => f.write_str("null"),
            SimpleType::Undefined => f.write_str("undefined"),
            SimpleType::String => f.write_str("string"),
            SimpleType::Number => f.write_str("number"),
            SimpleType::Boolean => f.write_str("boolean"),
            SimpleType::BigInt => f.write_str("bigint"),
            SimpleType::StringLiteral(value) => write!(f, "\"{}\"", value),
            SimpleType::NumberLiteral(value) => f.write_str(&format_number(*value)),
            SimpleType::BooleanLiteral(value) => write!(f, "{}", value),
            SimpleType::Union(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    if matches!(ty, SimpleType::Function(_)) {
                        write!(f, "({})", ty)?;
                    } else {
                        write!(f, "{}", ty)?;
                    }
                }
                Ok(())
            }
            SimpleType::Array(element) => match element.as_ref() {
                SimpleType::Union(_) | SimpleType::Function(_) => write!(f, "({})[]", element),
                _ => write!(f, "{}[]", element),
            },
            SimpleType::Function(function) => write!(f, "{}", function),
            SimpleType::Object(object) => {
                if let Some(name) = &object.name {
                    return f.write_str(name);
                }
                if object.members.is_empty() {
                    return match &object.call {
                        Some(call) => write!(f, "{}", call),
                        None => f.write_str("{}"),
                    };
                }
                f.write_str("{ ")?;
                for member in &object.members {
                    let optional = if member.optional { "?" } else { "" };
                    write!(f, "{}{}: {}; ", member.name, optional, member.ty)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let optional = if param.optional { "?" } else { "" };
            write!(f, "{}{}: {}", param.name, optional, param.ty)?;
        }
        write!(f, ") => {}", self.return_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_flattens_and_dedupes() {
        let ty = SimpleType::union([
            SimpleType::String,
            SimpleType::union([SimpleType::Number, SimpleType::String]),
        ]);
        assert_eq!(ty, SimpleType::Union(vec![SimpleType::String, SimpleType::Number]));
    }

    #[test]
    fn test_union_any_absorbs() {
        let ty = SimpleType::union([SimpleType::String, SimpleType::Any]);
        assert_eq!(ty, SimpleType::Any);
    }

    #[test]
    fn test_union_boolean_literals_collapse() {
        let ty = SimpleType::union([
            SimpleType::BooleanLiteral(true),
            SimpleType::BooleanLiteral(false),
        ]);
        assert_eq!(ty, SimpleType::Boolean);
    }

    #[test]
    fn test_merge_absorbs_any() {
        assert_eq!(
            SimpleType::merge(&SimpleType::Any, &SimpleType::Number),
            SimpleType::Number
        );
        assert_eq!(
            SimpleType::merge(&SimpleType::String, &SimpleType::Number),
            SimpleType::Union(vec![SimpleType::String, SimpleType::Number])
        );
    }

    #[test]
    fn test_strip_nullable() {
        let ty = SimpleType::union([SimpleType::String, SimpleType::Undefined, SimpleType::Null]);
        assert!(ty.is_nullable());
        assert_eq!(ty.strip_nullable(), SimpleType::String);
    }

    #[test]
    fn test_primitive_and_complex() {
        assert!(SimpleType::string_literal("a").is_primitive());
        assert!(SimpleType::array(SimpleType::String).is_complex());
        assert!(!SimpleType::Any.is_complex());
        assert!(SimpleType::union([SimpleType::String, SimpleType::named("Foo")]).is_complex());
    }

    #[test]
    fn test_handle_event_object() {
        let listener = SimpleType::Object(ObjectType::default().with_member(Member::new(
            "handleEvent",
            SimpleType::function(vec![], SimpleType::Void),
        )));
        assert!(listener.has_handle_event());
        assert!(!listener.is_callable());
        assert!(!SimpleType::String.has_handle_event());
    }

    #[test]
    fn test_display() {
        let ty = SimpleType::union([
            SimpleType::string_literal("a"),
            SimpleType::NumberLiteral(50.0),
            SimpleType::Undefined,
        ]);
        insta::assert_snapshot!(ty.to_string(), @r#""a" | 50 | undefined"#);

        let function = SimpleType::function(
            vec![Parameter::new("event", SimpleType::named("Event"))],
            SimpleType::Void,
        );
        insta::assert_snapshot!(function.to_string(), @"(event: Event) => void");
    }

    #[test]
    fn test_to_attribute_string() {
        assert_eq!(
            SimpleType::NumberLiteral(3.0).to_attribute_string(),
            SimpleType::string_literal("3")
        );
        assert_eq!(
            SimpleType::Boolean.to_attribute_string(),
            SimpleType::Union(vec![
                SimpleType::string_literal("true"),
                SimpleType::string_literal("false"),
            ])
        );
    }
}
