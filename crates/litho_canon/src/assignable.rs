//! Structural assignability.
//!
//! A deliberately forgiving approximation of the host checker: whenever the
//! type information runs out (`any`, `unknown`) the value is assumed to fit,
//! so a missing declaration never produces a false positive.

use crate::types::{FunctionType, ObjectType, SimpleType};

/// Check if `value` may be assigned to a binding of type `target`.
pub fn is_assignable(target: &SimpleType, value: &SimpleType) -> bool {
    is_assignable_inner(target, value, 0)
}

/// Recursion guard for self-referencing structures.
const MAX_DEPTH: u32 = 16;

fn is_assignable_inner(target: &SimpleType, value: &SimpleType, depth: u32) -> bool {
    if depth > MAX_DEPTH {
        return true;
    }
    let depth = depth + 1;

    match (target, value) {
        (SimpleType::Any | SimpleType::Unknown, _) => true,
        (_, SimpleType::Any | SimpleType::Unknown | SimpleType::Never) => true,
        (_, SimpleType::Union(values)) => values
            .iter()
            .all(|v| is_assignable_inner(target, v, depth)),
        (_, SimpleType::Boolean) => {
            // `boolean` is `true | false`, so it fits a target accepting both.
            matches_boolean(target, true, depth) && matches_boolean(target, false, depth)
        }
        (SimpleType::Union(targets), _) => targets
            .iter()
            .any(|t| is_assignable_inner(t, value, depth)),
        (SimpleType::Never, _) => false,
        (SimpleType::String, SimpleType::String | SimpleType::StringLiteral(_)) => true,
        (SimpleType::StringLiteral(a), SimpleType::StringLiteral(b)) => a == b,
        (SimpleType::Number, SimpleType::Number | SimpleType::NumberLiteral(_)) => true,
        (SimpleType::NumberLiteral(a), SimpleType::NumberLiteral(b)) => a == b,
        (SimpleType::Boolean, SimpleType::BooleanLiteral(_)) => true,
        (SimpleType::BooleanLiteral(a), SimpleType::BooleanLiteral(b)) => a == b,
        (SimpleType::BigInt, SimpleType::BigInt) => true,
        (SimpleType::Null, SimpleType::Null) => true,
        (SimpleType::Undefined, SimpleType::Undefined) => true,
        (SimpleType::Void, SimpleType::Undefined | SimpleType::Void) => true,
        (SimpleType::Array(t), SimpleType::Array(v)) => is_assignable_inner(t, v, depth),
        (SimpleType::Function(t), _) => match value.call_signature() {
            Some(v) => is_function_assignable(t, v, depth),
            None => false,
        },
        (SimpleType::Object(t), _) => is_object_assignable(t, value, depth),
        _ => false,
    }
}

fn matches_boolean(target: &SimpleType, literal: bool, depth: u32) -> bool {
    is_assignable_inner(target, &SimpleType::BooleanLiteral(literal), depth)
}

fn is_function_assignable(target: &FunctionType, value: &FunctionType, depth: u32) -> bool {
    // A callback may ignore trailing parameters.
    let required = value.params.iter().filter(|p| !p.optional).count();
    if required > target.params.len() {
        return false;
    }
    // Parameters are bivariant, as in the host checker's method checks.
    let params_ok = target.params.iter().zip(value.params.iter()).all(|(t, v)| {
        is_assignable_inner(&t.ty, &v.ty, depth) || is_assignable_inner(&v.ty, &t.ty, depth)
    });
    if !params_ok {
        return false;
    }
    matches!(*target.return_type, SimpleType::Void)
        || is_assignable_inner(&target.return_type, &value.return_type, depth)
}

fn is_object_assignable(target: &ObjectType, value: &SimpleType, depth: u32) -> bool {
    match value {
        SimpleType::Object(object) => {
            if let (Some(a), Some(b)) = (&target.name, &object.name) {
                if a == b {
                    return true;
                }
            }
            if let Some(call) = &target.call {
                match &object.call {
                    Some(v) if is_function_assignable(call, v, depth) => {}
                    _ => return false,
                }
            }
            target.members.iter().all(|member| match object.member(&member.name) {
                Some(found) => is_assignable_inner(&member.ty, &found.ty, depth),
                None => member.optional,
            })
        }
        SimpleType::Function(function) => {
            let call_ok = match &target.call {
                Some(call) => is_function_assignable(call, function, depth),
                None => true,
            };
            call_ok && target.members.iter().all(|m| m.optional)
        }
        SimpleType::Array(_) => target.members.iter().all(|m| m.optional) && target.call.is_none(),
        _ => false,
    }
}

/// Check a value against a nominal allow-list of type names.
///
/// Every member of the value must be a nominal type whose name is in
/// `allowed`. The primitive keywords `string`, `number` and `boolean` may
/// appear in the list to admit those primitives. Opaque values pass.
pub fn matches_nominal(value: &SimpleType, allowed: &[impl AsRef<str>]) -> bool {
    let allows = |name: &str| allowed.iter().any(|a| a.as_ref() == name);

    value.members().iter().all(|member| match member {
        SimpleType::Any | SimpleType::Unknown | SimpleType::Never => true,
        SimpleType::String | SimpleType::StringLiteral(_) => allows("string"),
        SimpleType::Number | SimpleType::NumberLiteral(_) => allows("number"),
        SimpleType::Boolean | SimpleType::BooleanLiteral(_) => allows("boolean"),
        SimpleType::Null => allows("null"),
        SimpleType::Undefined | SimpleType::Void => allows("undefined"),
        other => other.nominal_name().is_some_and(allows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Member, Parameter};

    #[test]
    fn test_primitives() {
        assert!(is_assignable(&SimpleType::String, &SimpleType::string_literal("x")));
        assert!(!is_assignable(&SimpleType::String, &SimpleType::Number));
        assert!(!is_assignable(
            &SimpleType::string_literal("a"),
            &SimpleType::string_literal("b")
        ));
    }

    #[test]
    fn test_boolean_against_literal_union() {
        let target = SimpleType::Union(vec![
            SimpleType::BooleanLiteral(true),
            SimpleType::BooleanLiteral(false),
            SimpleType::Undefined,
        ]);
        assert!(is_assignable(&target, &SimpleType::Boolean));
        assert!(!is_assignable(&SimpleType::BooleanLiteral(true), &SimpleType::Boolean));
    }

    #[test]
    fn test_union_value_requires_every_member() {
        let value = SimpleType::union([SimpleType::String, SimpleType::Undefined]);
        assert!(!is_assignable(&SimpleType::String, &value));
        assert!(is_assignable(&SimpleType::String, &value.strip_nullable()));
    }

    #[test]
    fn test_opaque_is_permissive() {
        assert!(is_assignable(&SimpleType::Number, &SimpleType::Unknown));
        assert!(is_assignable(&SimpleType::Any, &SimpleType::named("Foo")));
    }

    #[test]
    fn test_structural_objects() {
        let target = SimpleType::Object(
            ObjectType::default()
                .with_member(Member::new("id", SimpleType::Number))
                .with_member(Member::new("label", SimpleType::String).optional()),
        );
        let value = SimpleType::Object(
            ObjectType::named("Item").with_member(Member::new("id", SimpleType::NumberLiteral(1.0))),
        );
        assert!(is_assignable(&target, &value));
        assert!(!is_assignable(&target, &SimpleType::Object(ObjectType::default())));
    }

    #[test]
    fn test_functions() {
        let target = SimpleType::function(
            vec![Parameter::new("event", SimpleType::named("Event"))],
            SimpleType::Void,
        );
        let no_args = SimpleType::function(vec![], SimpleType::Number);
        assert!(is_assignable(&target, &no_args));

        let two_args = SimpleType::function(
            vec![
                Parameter::new("a", SimpleType::String),
                Parameter::new("b", SimpleType::String),
            ],
            SimpleType::Void,
        );
        assert!(!is_assignable(&target, &two_args));
    }

    #[test]
    fn test_matches_nominal() {
        let allowed = ["TrustedResourceUrl"];
        assert!(matches_nominal(&SimpleType::named("TrustedResourceUrl"), &allowed));
        assert!(!matches_nominal(&SimpleType::String, &allowed));
        assert!(matches_nominal(&SimpleType::String, &["string"]));
    }
}
