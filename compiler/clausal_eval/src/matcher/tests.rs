#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use clausal_ir::{TypeRef, TypeTable};
use clausal_parse::{compile_pattern, CompileOptions};

use super::*;

fn pattern(source: &str) -> Pattern {
    compile_pattern(source, &TypeTable::new(), &CompileOptions::default()).unwrap()
}

fn matches(source: &str, value: &Value) -> Result<Bindings, MatchFailure> {
    match_pattern(&pattern(source), value)
}

fn reason(source: &str, value: &Value) -> FailReason {
    matches(source, value).unwrap_err().reason
}

fn ints(items: &[i64]) -> Vec<Value> {
    items.iter().copied().map(Value::int).collect()
}

#[test]
fn test_literal() {
    assert!(matches("1", &Value::int(1)).unwrap().is_empty());
    assert_eq!(reason("1", &Value::int(2)), FailReason::Literal);
    assert!(matches("'hi'", &Value::string("hi")).is_ok());
    assert!(matches("None", &Value::None).is_ok());
}

#[test]
fn test_literal_is_strict_about_kind() {
    assert_eq!(reason("1", &Value::float(1.0)), FailReason::Literal);
    assert_eq!(reason("1", &Value::Bool(true)), FailReason::Literal);
    assert_eq!(reason("True", &Value::int(1)), FailReason::Literal);
}

#[test]
fn test_capture_binds() {
    let bindings = matches("x", &Value::string("v")).unwrap();
    assert_eq!(bindings.get("x"), Some(&Value::string("v")));
    assert_eq!(bindings.len(), 1);
}

#[test]
fn test_wildcard_never_binds() {
    let bindings = matches("(_, _, x)", &Value::tuple(ints(&[1, 2, 3]))).unwrap();
    assert_eq!(bindings.names(), vec![&Name::new("x")]);
    assert!(!bindings.contains("_"));
}

#[test]
fn test_type_guard() {
    let bindings = matches("n is int", &Value::int(4)).unwrap();
    assert_eq!(bindings.get("n"), Some(&Value::int(4)));
    assert_eq!(reason("n is int", &Value::string("4")), FailReason::TypeGuard);
    assert!(matches("s is (str, float)", &Value::float(0.5)).is_ok());
    assert!(matches("s is (str, float)", &Value::string("a")).is_ok());
    assert_eq!(reason("s is (str, float)", &Value::int(1)), FailReason::TypeGuard);
}

#[test]
fn test_type_guard_accepts_subtypes() {
    assert!(matches("n is int", &Value::Bool(true)).is_ok());
    assert!(matches("o is object", &Value::None).is_ok());

    let mut types = TypeTable::new();
    let animal = types.declare_class("Animal", &TypeRef::OBJECT);
    let dog = types.declare_class("Dog", &TypeRef::Class(animal.clone()));
    let guard = compile_pattern("a is Animal", &types, &CompileOptions::default()).unwrap();
    assert!(match_pattern(&guard, &Value::instance(&dog)).is_ok());
    assert!(match_pattern(&guard, &Value::instance(&animal)).is_ok());

    let narrow = compile_pattern("d is Dog", &types, &CompileOptions::default()).unwrap();
    assert_eq!(
        match_pattern(&narrow, &Value::instance(&animal))
            .unwrap_err()
            .reason,
        FailReason::TypeGuard
    );
}

#[test]
fn test_wildcard_guard_checks_without_binding() {
    assert!(matches("_ is int", &Value::int(1)).unwrap().is_empty());
    assert_eq!(reason("_ is int", &Value::None), FailReason::TypeGuard);
}

#[test]
fn test_fixed_length_sequence() {
    let bindings = matches("[a, b]", &Value::list(ints(&[1, 2]))).unwrap();
    assert_eq!(bindings.get("a"), Some(&Value::int(1)));
    assert_eq!(bindings.get("b"), Some(&Value::int(2)));
    assert_eq!(
        reason("[a, b]", &Value::list(ints(&[1, 2, 3]))),
        FailReason::Length {
            expected: 2,
            actual: 3,
            open: false
        }
    );
    assert!(matches("[]", &Value::list(vec![])).is_ok());
}

#[test]
fn test_head_rest_binds_tail_of_same_kind() {
    let bindings = matches("[x] + xs", &Value::list(ints(&[1, 2, 3]))).unwrap();
    assert_eq!(bindings.get("x"), Some(&Value::int(1)));
    assert_eq!(bindings.get("xs"), Some(&Value::list(ints(&[2, 3]))));

    let bindings = matches("(x,) + xs", &Value::tuple(ints(&[1]))).unwrap();
    assert_eq!(bindings.get("xs"), Some(&Value::tuple(vec![])));

    assert_eq!(
        reason("[x] + xs", &Value::list(vec![])),
        FailReason::Length {
            expected: 1,
            actual: 0,
            open: true
        }
    );
}

#[test]
fn test_rest_wildcard() {
    let bindings = matches("[x, y] + _", &Value::list(ints(&[1, 2, 3, 4]))).unwrap();
    assert_eq!(bindings.len(), 2);
}

#[test]
fn test_container_families_do_not_cross() {
    assert_eq!(
        reason("[a]", &Value::tuple(ints(&[1]))),
        FailReason::ContainerKind {
            expected: ContainerKind::List
        }
    );
    assert_eq!(
        reason("(a,)", &Value::list(ints(&[1]))),
        FailReason::ContainerKind {
            expected: ContainerKind::Tuple
        }
    );
    assert_eq!(
        reason("[a]", &Value::string("a")),
        FailReason::ContainerKind {
            expected: ContainerKind::List
        }
    );
}

#[test]
fn test_list_subclass_matches_list_pattern() {
    let mut types = TypeTable::new();
    let stack = types.declare_class("Stack", &TypeRef::LIST);
    let value = Value::instance_with(&stack, Value::list(ints(&[7, 8])));
    let bindings = matches("[top] + rest", &value).unwrap();
    assert_eq!(bindings.get("top"), Some(&Value::int(7)));
    // The tail is a plain list, not a `Stack`.
    assert_eq!(bindings.get("rest"), Some(&Value::list(ints(&[8]))));
    assert!(matches("(top,) + rest", &value).is_err());
}

#[test]
fn test_record_exact_key_set() {
    let dict = Value::dict([
        (Value::string("a"), Value::int(6)),
        (Value::string("b"), Value::int(7)),
    ]);
    let bindings = matches("{'b': b, 'a': a}", &dict).unwrap();
    assert_eq!(bindings.get("a"), Some(&Value::int(6)));
    assert_eq!(bindings.get("b"), Some(&Value::int(7)));

    assert_eq!(reason("{'a': a}", &dict), FailReason::KeySet);
    assert_eq!(reason("{'a': a, 'c': c}", &dict), FailReason::KeySet);
    assert_eq!(reason("{'a': a, 'b': b, 'c': c}", &dict), FailReason::KeySet);
    assert_eq!(reason("{}", &dict), FailReason::KeySet);
    assert!(matches("{}", &Value::dict([])).is_ok());
}

#[test]
fn test_record_rejects_non_dict() {
    assert_eq!(reason("{}", &Value::list(vec![])), FailReason::NotRecord);
}

#[test]
fn test_record_field_patterns() {
    let dict = Value::dict([(Value::string("p"), Value::tuple(ints(&[1, 2])))]);
    let bindings = matches("{'p': (x, y)}", &dict).unwrap();
    assert_eq!(bindings.get("y"), Some(&Value::int(2)));
    assert_eq!(reason("{'p': (x, 3)}", &dict), FailReason::Literal);
}

#[test]
fn test_repeated_names_must_agree() {
    let bindings = matches("(x, x)", &Value::tuple(ints(&[3, 3]))).unwrap();
    assert_eq!(bindings.get("x"), Some(&Value::int(3)));
    assert_eq!(bindings.len(), 1);

    let failure = matches("(x, x)", &Value::tuple(ints(&[1, 2]))).unwrap_err();
    assert_eq!(
        failure.reason,
        FailReason::Inconsistent {
            name: Name::new("x")
        }
    );
    assert_eq!(failure.value, Value::int(2));
    assert_eq!(failure.span, Span::new(4, 5));
}

#[test]
fn test_repeated_names_across_nesting() {
    let value = Value::tuple(vec![
        Value::list(ints(&[5, 6])),
        Value::dict([(Value::string("k"), Value::int(5))]),
    ]);
    assert!(matches("([x, _], {'k': x})", &value).is_ok());
    assert!(matches("([_, x], {'k': x})", &value).is_err());
}

#[test]
fn test_repeated_rest_and_element() {
    let value = Value::tuple(vec![Value::list(ints(&[2])), Value::list(ints(&[1, 2]))]);
    assert!(matches("(r, [_] + r)", &value).is_ok());
}

#[test]
fn test_nested_head_rest() {
    let value = Value::tuple(vec![Value::list(ints(&[1, 2])), Value::string("y")]);
    let bindings = matches("([x] + xs, y)", &value).unwrap();
    assert_eq!(bindings.get("xs"), Some(&Value::list(ints(&[2]))));
    assert_eq!(bindings.get("y"), Some(&Value::string("y")));
}

#[test]
fn test_failure_points_at_innermost_part() {
    let value = Value::tuple(vec![
        Value::int(1),
        Value::list(vec![Value::int(0), Value::string("q")]),
    ]);
    let failure = matches("(1, [a, 'z'])", &value).unwrap_err();
    assert_eq!(failure.reason, FailReason::Literal);
    assert_eq!(failure.value, Value::string("q"));
    assert_eq!(failure.span, Span::new(8, 11));
    assert_eq!(
        failure.to_string(),
        "'q' is not equal to the literal (at 8..11)"
    );
}

#[test]
fn test_deeply_nested_value() {
    let depth = 1_000;
    let source = format!("{}x{}", "[".repeat(depth), "]".repeat(depth));
    let compiled = pattern(&source);
    let mut value = Value::int(9);
    for _ in 0..depth {
        value = Value::list(vec![value]);
    }
    let bindings = match_pattern(&compiled, &value).unwrap();
    assert_eq!(bindings.get("x"), Some(&Value::int(9)));
}
