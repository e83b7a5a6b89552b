//! End-to-end behaviour of pattern-matched functions.
//!
//! Each test defines a function the way a host would, with clause bodies as
//! closures, and checks what callers observe.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use clausal_eval::{
    evaluate_binary, BinaryOp, CallError, DispatchConfig, Fault, FaultKind, PatternErrorKind,
    PatternFn, Scope,
};
use clausal_ir::{Name, TypeRef, TypeTable, Value};

fn list(items: &[i64]) -> Value {
    Value::list(items.iter().copied().map(Value::int).collect())
}

fn tuple(items: Vec<Value>) -> Value {
    Value::tuple(items)
}

fn key(k: &str) -> Value {
    Value::string(k)
}

fn mismatch_value(result: Result<Value, CallError>) -> Value {
    match result {
        Err(CallError::Mismatch { value, .. }) => value,
        other => panic!("expected Mismatch, got {other:?}"),
    }
}

#[test]
fn constant_clauses() {
    clausal_eval::init_tracing();
    let types = TypeTable::new();
    let kind = PatternFn::builder("kind", &types)
        .clause("1", |_| Ok(Value::string("int")))
        .clause("'hi'", |_| Ok(Value::string("str")))
        .clause("[1, 2]", |_| Ok(Value::string("list")))
        .clause("(1, 2)", |_| Ok(Value::string("tuple")))
        .build()
        .unwrap();

    assert_eq!(kind.invoke(Value::int(1)).unwrap(), Value::string("int"));
    assert_eq!(kind.invoke(Value::string("hi")).unwrap(), Value::string("str"));
    assert_eq!(kind.invoke(list(&[1, 2])).unwrap(), Value::string("list"));
    assert_eq!(
        kind.invoke(tuple(vec![Value::int(1), Value::int(2)])).unwrap(),
        Value::string("tuple")
    );
    assert_eq!(mismatch_value(kind.invoke(Value::int(2))), Value::int(2));
    assert_eq!(mismatch_value(kind.invoke(Value::dict([]))), Value::dict([]));
}

#[test]
fn capture_and_compute() {
    let types = TypeTable::new();
    let dec = PatternFn::builder("dec", &types)
        .clause("y", |frame| {
            Ok(evaluate_binary(frame.get("y")?, Value::int(1), BinaryOp::Sub)?)
        })
        .build()
        .unwrap();
    assert_eq!(dec.invoke(Value::int(41)).unwrap(), Value::int(40));
}

#[test]
fn typed_clauses() {
    let types = TypeTable::new();
    let typing = PatternFn::builder("typing", &types)
        .clause("n is int", |frame| {
            Ok(evaluate_binary(frame.get("n")?, Value::int(1), BinaryOp::Add)?)
        })
        .clause("s is (str, float)", |_| Ok(Value::string("str_or_float")))
        .build()
        .unwrap();

    assert_eq!(typing.invoke(Value::int(42)).unwrap(), Value::int(43));
    assert_eq!(
        typing.invoke(Value::string("42")).unwrap(),
        Value::string("str_or_float")
    );
    assert_eq!(
        typing.invoke(Value::float(2.5)).unwrap(),
        Value::string("str_or_float")
    );
}

#[test]
fn resolved_names_keep_identity() {
    let mut types = TypeTable::new();
    let marker = types.declare_class("Marker", &TypeRef::OBJECT);
    let globals = Scope::global();
    let first = Value::instance(&marker);
    globals.define("local_var", first.clone());

    let fetch = PatternFn::builder("fetch", &types)
        .scope(globals.clone())
        .clause("''", |frame| Ok(frame.get("local_var")?))
        .build()
        .unwrap();

    assert!(fetch.invoke(Value::string("")).unwrap().is_same(&first));

    let second = Value::instance(&marker);
    globals.define("local_var", second.clone());
    let now = fetch.invoke(Value::string("")).unwrap();
    assert!(now.is_same(&second));
    assert!(!now.is_same(&first));
}

#[test]
fn recursive_tuple_destructuring() {
    let types = TypeTable::new();
    let mul = PatternFn::builder("mul", &types)
        .clause("(x, 0)", |_| Ok(Value::int(0)))
        .clause("(x, 1)", |frame| Ok(frame.get("x")?))
        .clause("(x, y)", |frame| {
            let x = frame.get("x")?;
            let y = frame.get("y")?;
            let y1 = evaluate_binary(y, Value::int(1), BinaryOp::Sub)?;
            let rest = frame.call(tuple(vec![x.clone(), y1]))?;
            Ok(evaluate_binary(x, rest, BinaryOp::Add)?)
        })
        .build()
        .unwrap();

    let result = mul.invoke(tuple(vec![Value::int(5), Value::int(5)])).unwrap();
    assert_eq!(result, Value::int(25));
    assert_eq!(
        mul.invoke(tuple(vec![Value::int(2), Value::int(2)])).unwrap(),
        Value::int(4)
    );
}

#[test]
fn clause_body_can_raise() {
    let types = TypeTable::new();
    let pair = PatternFn::builder("pair", &types)
        .clause("(x, y)", |frame| Ok(frame.get("x")?))
        .clause("(_,)", |_| Err(Fault::value_error("Give me pair").into()))
        .build()
        .unwrap();

    let err = pair.invoke(tuple(vec![Value::int(1)])).unwrap_err();
    let fault = err.as_fault().unwrap();
    assert_eq!(fault.kind(), FaultKind::ValueError);
    assert_eq!(fault.message(), "Give me pair");
    assert!(pair.invoke(tuple(vec![])).unwrap_err().is_mismatch());
}

#[test]
fn list_length_by_head_and_rest() {
    let types = TypeTable::new();
    let length = PatternFn::builder("length", &types)
        .clause("[]", |_| Ok(Value::int(0)))
        .clause("[x] + xs", |frame| {
            let rest = frame.call(frame.get("xs")?)?;
            Ok(evaluate_binary(rest, Value::int(1), BinaryOp::Add)?)
        })
        .build()
        .unwrap();

    assert_eq!(length.invoke(list(&[1, 2, 3])).unwrap(), Value::int(3));
    assert_eq!(length.invoke(list(&[])).unwrap(), Value::int(0));
    // A tuple is not a list.
    assert!(length.invoke(tuple(vec![])).unwrap_err().is_mismatch());
}

#[test]
fn record_patterns_need_exact_keys() {
    let types = TypeTable::new();
    let product = PatternFn::builder("product", &types)
        .clause("{}", |_| Ok(Value::int(0)))
        .clause("{'a': a, 'b': b}", |frame| {
            Ok(evaluate_binary(frame.get("a")?, frame.get("b")?, BinaryOp::Mul)?)
        })
        .build()
        .unwrap();

    let ab = Value::dict([(key("a"), Value::int(6)), (key("b"), Value::int(7))]);
    assert_eq!(product.invoke(ab).unwrap(), Value::int(42));

    let abc = Value::dict([
        (key("a"), Value::int(6)),
        (key("b"), Value::int(7)),
        (key("c"), Value::None),
    ]);
    assert_eq!(mismatch_value(product.invoke(abc.clone())), abc);
    assert_eq!(product.invoke(Value::dict([])).unwrap(), Value::int(0));
}

#[test]
fn body_fault_is_not_a_mismatch() {
    let types = TypeTable::new();
    let fault_line = Arc::new(AtomicUsize::new(0));
    let slot = Arc::clone(&fault_line);
    let inc = PatternFn::builder("inc", &types)
        .clause("(1, x)", move |frame| {
            slot.store(line!() as usize + 1, Ordering::SeqCst);
            Ok(evaluate_binary(Value::int(1), frame.get("x")?, BinaryOp::Add)?)
        })
        .build()
        .unwrap();

    assert_eq!(
        inc.invoke(tuple(vec![Value::int(1), Value::int(2)])).unwrap(),
        Value::int(3)
    );

    let err = inc
        .invoke(tuple(vec![Value::int(1), Value::string("oops")]))
        .unwrap_err();
    assert!(!err.is_mismatch());
    let fault = err.as_fault().unwrap();
    assert_eq!(fault.kind(), FaultKind::TypeError);
    assert_eq!(
        fault.location().line() as usize,
        fault_line.load(Ordering::SeqCst)
    );
    assert!(fault.location().file().ends_with("scenarios.rs"));
}

#[test]
fn free_names_are_late_bound() {
    let types = TypeTable::new();
    let globals = Scope::global();
    globals.define("scale", Value::int(2));

    let scaled = PatternFn::builder("scaled", &types)
        .scope(globals.clone())
        .clause("n", |frame| {
            Ok(evaluate_binary(frame.get("n")?, frame.get("scale")?, BinaryOp::Mul)?)
        })
        .build()
        .unwrap();

    assert_eq!(scaled.invoke(Value::int(5)).unwrap(), Value::int(10));
    globals.define("scale", Value::int(3));
    assert_eq!(scaled.invoke(Value::int(5)).unwrap(), Value::int(15));
    globals.assign("scale", Value::int(4)).unwrap();
    assert_eq!(scaled.invoke(Value::int(5)).unwrap(), Value::int(20));
}

#[test]
fn enclosing_function_scope_is_searched_before_globals() {
    let types = TypeTable::new();
    let globals = Scope::global();
    globals.define("label", Value::string("global"));
    let enclosing = globals.child();

    let describe = PatternFn::builder("describe", &types)
        .scope(enclosing.clone())
        .clause("_", |frame| Ok(frame.get("label")?))
        .build()
        .unwrap();

    assert_eq!(describe.invoke(Value::None).unwrap(), Value::string("global"));
    enclosing.define("label", Value::string("local"));
    assert_eq!(describe.invoke(Value::None).unwrap(), Value::string("local"));
}

#[test]
fn name_defined_only_after_definition_is_found() {
    let types = TypeTable::new();
    let globals = Scope::global();
    let f = PatternFn::builder("later", &types)
        .scope(globals.clone())
        .clause("_", |frame| Ok(frame.get("helper")?))
        .build()
        .unwrap();

    let err = f.invoke(Value::None).unwrap_err();
    assert_eq!(err.as_fault().unwrap().kind(), FaultKind::NameError);

    globals.define("helper", Value::Bool(true));
    assert_eq!(f.invoke(Value::None).unwrap(), Value::Bool(true));
}

#[test]
fn repeated_names_require_equal_values() {
    let types = TypeTable::new();
    let same = PatternFn::builder("same", &types)
        .clause("(x, x)", |_| Ok(Value::Bool(true)))
        .clause("_", |_| Ok(Value::Bool(false)))
        .build()
        .unwrap();

    assert_eq!(
        same.invoke(tuple(vec![Value::int(3), Value::int(3)])).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        same.invoke(tuple(vec![Value::int(1), Value::int(2)])).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn wildcards_repeat_freely_and_never_bind() {
    let types = TypeTable::new();
    let f = PatternFn::builder("third", &types)
        .clause("(_, _, z)", |frame| {
            assert!(frame.lookup("_").is_none());
            assert_eq!(frame.bindings().len(), 1);
            Ok(frame.get("z")?)
        })
        .build()
        .unwrap();

    let argument = tuple(vec![Value::int(1), Value::string("b"), Value::int(3)]);
    assert_eq!(f.invoke(argument).unwrap(), Value::int(3));
}

#[test]
fn type_guards_accept_subtypes() {
    let mut types = TypeTable::new();
    let shape = types.declare_class("Shape", &TypeRef::OBJECT);
    let circle = types.declare_class("Circle", &TypeRef::Class(shape.clone()));

    let name_of = PatternFn::builder("name_of", &types)
        .clause("n is int", |_| Ok(Value::string("int")))
        .clause("s is Shape", |frame| {
            Ok(Value::string(frame.get("s")?.type_name().to_string()))
        })
        .build()
        .unwrap();

    assert_eq!(name_of.invoke(Value::Bool(true)).unwrap(), Value::string("int"));
    assert_eq!(
        name_of.invoke(Value::instance(&circle)).unwrap(),
        Value::string("Circle")
    );
    assert_eq!(
        name_of.invoke(Value::instance(&shape)).unwrap(),
        Value::string("Shape")
    );
    assert!(name_of.invoke(Value::float(1.0)).unwrap_err().is_mismatch());
}

#[test]
fn list_subclass_rest_is_plain_list() {
    let mut types = TypeTable::new();
    let stack = types.declare_class("Stack", &TypeRef::LIST);
    let pop = PatternFn::builder("pop", &types)
        .clause("[top] + rest", |frame| {
            Ok(tuple(vec![frame.get("top")?, frame.get("rest")?]))
        })
        .build()
        .unwrap();

    let value = Value::instance_with(&stack, list(&[9, 8, 7]));
    assert_eq!(
        pop.invoke(value).unwrap(),
        tuple(vec![Value::int(9), list(&[8, 7])])
    );
}

#[test]
fn fixed_length_and_open_sequences() {
    let types = TypeTable::new();
    let shape = PatternFn::builder("shape", &types)
        .clause("(a, b)", |_| Ok(Value::string("pair")))
        .clause("(a, b) + more", |frame| Ok(frame.get("more")?))
        .build()
        .unwrap();

    assert_eq!(
        shape.invoke(tuple(vec![Value::int(1), Value::int(2)])).unwrap(),
        Value::string("pair")
    );
    assert_eq!(
        shape
            .invoke(tuple(vec![Value::int(1), Value::int(2), Value::int(3)]))
            .unwrap(),
        tuple(vec![Value::int(3)])
    );
    assert!(shape
        .invoke(tuple(vec![Value::int(1)]))
        .unwrap_err()
        .is_mismatch());
}

#[test]
fn nested_head_rest_in_tuple() {
    let types = TypeTable::new();
    let split = PatternFn::builder("split", &types)
        .clause("([x] + xs, y)", |frame| {
            Ok(tuple(vec![frame.get("x")?, frame.get("xs")?, frame.get("y")?]))
        })
        .build()
        .unwrap();

    let argument = tuple(vec![list(&[1, 2, 3]), Value::string("y")]);
    assert_eq!(
        split.invoke(argument).unwrap(),
        tuple(vec![Value::int(1), list(&[2, 3]), Value::string("y")])
    );
}

#[test]
fn malformed_patterns_fail_at_definition() {
    let types = TypeTable::new();
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);
    let err = PatternFn::builder("bad", &types)
        .clause("1", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::None)
        })
        .clause("x + xs", |_| Ok(Value::None))
        .build()
        .unwrap_err();

    assert_eq!(err.clause, 1);
    assert!(matches!(
        err.error.kind,
        PatternErrorKind::MalformedPattern { .. }
    ));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_types_and_duplicate_keys_fail_at_definition() {
    let types = TypeTable::new();
    let err = PatternFn::builder("typed", &types)
        .clause("p is Point", |_| Ok(Value::None))
        .build()
        .unwrap_err();
    assert_eq!(
        err.error.kind,
        PatternErrorKind::UnknownType {
            name: Name::new("Point")
        }
    );

    let err = PatternFn::builder("keys", &types)
        .clause("{'a': x, 'a': y}", |_| Ok(Value::None))
        .build()
        .unwrap_err();
    assert!(matches!(
        err.error.kind,
        PatternErrorKind::DuplicateKey { .. }
    ));
}

#[test]
fn recursion_limit_fault_propagates_unchanged() {
    let types = TypeTable::new();
    let countdown = PatternFn::builder("countdown", &types)
        .config(DispatchConfig::with_max_depth(10))
        .clause("0", |_| Ok(Value::string("done")))
        .clause("n is int", |frame| {
            let n = evaluate_binary(frame.get("n")?, Value::int(1), BinaryOp::Sub)?;
            frame.call(n)
        })
        .build()
        .unwrap();

    assert_eq!(countdown.invoke(Value::int(10)).unwrap(), Value::string("done"));

    let err = countdown.invoke(Value::int(11)).unwrap_err();
    let fault = err.as_fault().unwrap();
    assert_eq!(fault.kind(), FaultKind::RecursionLimit);
}

#[test]
fn unbounded_recursion_grows_the_stack() {
    let types = TypeTable::new();
    let length = PatternFn::builder("length", &types)
        .clause("[]", |_| Ok(Value::int(0)))
        .clause("[_] + xs", |frame| {
            let rest = frame.call(frame.get("xs")?)?;
            Ok(evaluate_binary(rest, Value::int(1), BinaryOp::Add)?)
        })
        .build()
        .unwrap();

    let long: Vec<i64> = (0..2_000).collect();
    assert_eq!(length.invoke(list(&long)).unwrap(), Value::int(2_000));
}
