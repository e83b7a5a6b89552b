//! Binary operators for clause bodies.
//!
//! Bodies are ordinary Rust closures, but they usually need to compute the
//! way the host language would: `1 + x`, `x * y`, `xs + ys`. This module
//! implements those operators over [`Value`] with the host's rules. Integer
//! arithmetic is checked; `int` and `float` mix by promoting to `float`;
//! `bool` counts as an `int`. Ill-typed operands are a `TypeError` fault.
//!
//! Every entry point is `#[track_caller]`, so a fault records the body line
//! that applied the operator.

use std::cmp::Ordering;
use std::fmt;

use clausal_ir::Value;

use crate::Fault;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// True division; always produces a `float`.
    Div,
    /// Division rounding toward negative infinity.
    FloorDiv,
    /// Remainder with the sign of the divisor.
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        }
    }

    fn operation(self) -> &'static str {
        match self {
            BinaryOp::Add => "addition",
            BinaryOp::Sub => "subtraction",
            BinaryOp::Mul => "multiplication",
            BinaryOp::Div => "division",
            BinaryOp::FloorDiv => "floor division",
            BinaryOp::Mod => "modulo",
            _ => "comparison",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Apply `op` to two values.
#[track_caller]
#[expect(
    clippy::needless_pass_by_value,
    reason = "bodies pass freshly looked-up values by value"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> Result<Value, Fault> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            compare(&left, &right, op).map(Value::Bool)
        }
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::FloorDiv
        | BinaryOp::Mod => arithmetic(&left, &right, op),
    }
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Number> {
        match value {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Float(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "int to float promotion rounds exactly as the host does"
    )]
    fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

#[track_caller]
fn type_mismatch(left: &Value, right: &Value, op: BinaryOp) -> Fault {
    Fault::type_error(format!(
        "unsupported operand type(s) for {op}: '{}' and '{}'",
        left.type_name(),
        right.type_name()
    ))
}

#[track_caller]
fn arithmetic(left: &Value, right: &Value, op: BinaryOp) -> Result<Value, Fault> {
    if let (Some(a), Some(b)) = (Number::of(left), Number::of(right)) {
        return match (a, b) {
            (Number::Int(a), Number::Int(b)) => int_arithmetic(a, b, op),
            (a, b) => float_arithmetic(a.to_f64(), b.to_f64(), op),
        };
    }

    match (left, right, op) {
        (Value::Str(a), Value::Str(b), BinaryOp::Add) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        (Value::List(a), Value::List(b), BinaryOp::Add) => Ok(Value::list(concat(a, b))),
        (Value::Tuple(a), Value::Tuple(b), BinaryOp::Add) => Ok(Value::tuple(concat(a, b))),
        (Value::Str(s), Value::Int(n), BinaryOp::Mul)
        | (Value::Int(n), Value::Str(s), BinaryOp::Mul) => {
            let count = repeat_count(s.len(), *n)?;
            Ok(Value::string(s.repeat(count)))
        }
        (Value::List(items), Value::Int(n), BinaryOp::Mul)
        | (Value::Int(n), Value::List(items), BinaryOp::Mul) => {
            let count = repeat_count(items.len(), *n)?;
            Ok(Value::list(repeat_items(items, count)))
        }
        (Value::Tuple(items), Value::Int(n), BinaryOp::Mul)
        | (Value::Int(n), Value::Tuple(items), BinaryOp::Mul) => {
            let count = repeat_count(items.len(), *n)?;
            Ok(Value::tuple(repeat_items(items, count)))
        }
        _ => Err(type_mismatch(left, right, op)),
    }
}

fn concat(a: &[Value], b: &[Value]) -> Vec<Value> {
    let mut items = Vec::with_capacity(a.len() + b.len());
    items.extend_from_slice(a);
    items.extend_from_slice(b);
    items
}

fn repeat_items(items: &[Value], count: usize) -> Vec<Value> {
    if items.is_empty() || count == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(items.len() * count);
    for _ in 0..count {
        out.extend_from_slice(items);
    }
    out
}

/// Repetition count for `seq * n`. Empty sequences and non-positive counts
/// give an empty result.
#[track_caller]
fn repeat_count(len: usize, n: i64) -> Result<usize, Fault> {
    let Ok(count) = usize::try_from(n) else {
        return Ok(0);
    };
    if len == 0 {
        return Ok(0);
    }
    match len.checked_mul(count) {
        Some(_) => Ok(count),
        None => Err(Fault::overflow("repetition")),
    }
}

#[track_caller]
fn int_arithmetic(a: i64, b: i64, op: BinaryOp) -> Result<Value, Fault> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(Fault::zero_division("division by zero"));
            }
            return Ok(Value::float(
                Number::Int(a).to_f64() / Number::Int(b).to_f64(),
            ));
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                return Err(Fault::zero_division("integer division or modulo by zero"));
            }
            floor_div(a, b)
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(Fault::zero_division("integer division or modulo by zero"));
            }
            Some(floor_mod(a, b))
        }
        _ => return Err(Fault::value_error(format!("`{op}` is not arithmetic"))),
    };
    match result {
        Some(n) => Ok(Value::int(n)),
        None => Err(Fault::overflow(op.operation())),
    }
}

/// `a // b` rounding toward negative infinity. `b` is non-zero.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// `a % b` with the sign of `b`. `b` is non-zero.
fn floor_mod(a: i64, b: i64) -> i64 {
    if b == -1 {
        return 0;
    }
    let remainder = a % b;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        remainder + b
    } else {
        remainder
    }
}

#[track_caller]
fn float_arithmetic(a: f64, b: f64, op: BinaryOp) -> Result<Value, Fault> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod if b == 0.0 => {
            return Err(Fault::zero_division("float division by zero"));
        }
        BinaryOp::Div => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        BinaryOp::Mod => {
            let remainder = a % b;
            if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
                remainder + b
            } else {
                remainder
            }
        }
        _ => return Err(Fault::value_error(format!("`{op}` is not arithmetic"))),
    };
    Ok(Value::float(result))
}

/// Host `==`: numbers compare by value across `int`/`float`/`bool`, and
/// containers compare element-wise with the same rule.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (Number::of(left), Number::of(right)) {
        return match (a, b) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.to_f64() == b.to_f64(),
        };
    }
    match (left, right) {
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

#[track_caller]
fn compare(left: &Value, right: &Value, op: BinaryOp) -> Result<bool, Fault> {
    if let (Some(a), Some(b)) = (Number::of(left), Number::of(right)) {
        return Ok(match (a, b) {
            (Number::Int(a), Number::Int(b)) => ordering_holds(a.cmp(&b), op),
            (a, b) => float_compare(a.to_f64(), b.to_f64(), op),
        });
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(ordering_holds(a.as_str().cmp(b.as_str()), op)),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            compare_sequences(a, b, op)
        }
        _ => Err(Fault::type_error(format!(
            "'{op}' not supported between instances of '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Lexicographic: the first unequal pair decides, else the lengths do.
#[track_caller]
fn compare_sequences(a: &[Value], b: &[Value], op: BinaryOp) -> Result<bool, Fault> {
    for (x, y) in a.iter().zip(b) {
        if !values_equal(x, y) {
            return compare(x, y, op);
        }
    }
    Ok(ordering_holds(a.len().cmp(&b.len()), op))
}

fn ordering_holds(ordering: Ordering, op: BinaryOp) -> bool {
    match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        _ => ordering.is_ge(),
    }
}

/// Float comparisons; any comparison involving NaN is false.
fn float_compare(a: f64, b: f64, op: BinaryOp) -> bool {
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}
