//! Runtime values patterns are matched against.
//!
//! Heap payloads go through `Heap<T>`, whose constructor is private to this
//! crate, so the `Value::` factory methods are the only way to build them:
//!
//! ```text
//! let s = Value::string("hi");
//! let pair = Value::tuple(vec![Value::int(1), Value::int(2)]);
//! let rec = Value::dict(vec![(Value::string("a"), Value::int(6))]);
//! ```

mod dict;
mod heap;

use std::fmt;

pub use dict::DictValue;
pub use heap::Heap;

use crate::types::{BuiltinType, Class, TypeRef};

/// An instance of a user-declared class.
///
/// `payload` holds the builtin value the instance extends when the class
/// derives from a builtin (`list`, `tuple`, `dict`, ...); otherwise `None`.
#[derive(Debug)]
pub struct Object {
    class: Heap<Class>,
    payload: Value,
}

impl Object {
    pub fn class(&self) -> &Heap<Class> {
        &self.class
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// The absence marker.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Heap<String>),
    /// Growable ordered sequence.
    List(Heap<Vec<Value>>),
    /// Fixed immutable ordered sequence.
    Tuple(Heap<Vec<Value>>),
    Dict(Heap<DictValue>),
    Object(Heap<Object>),
}

// Factory methods

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    /// Create a dict value. Later duplicates of a key overwrite earlier ones.
    #[inline]
    pub fn dict(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(Heap::new(DictValue::from_entries(entries)))
    }

    /// Create a plain instance of `class` (no builtin payload).
    #[inline]
    pub fn instance(class: &Heap<Class>) -> Self {
        Self::instance_with(class, Value::None)
    }

    /// Create an instance of a class that extends a builtin, wrapping `payload`.
    #[inline]
    pub fn instance_with(class: &Heap<Class>, payload: Value) -> Self {
        Value::Object(Heap::new(Object {
            class: class.clone(),
            payload,
        }))
    }
}

// Value methods

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Runtime type of this value.
    pub fn type_ref(&self) -> TypeRef {
        match self {
            Value::None => TypeRef::NONE,
            Value::Bool(_) => TypeRef::BOOL,
            Value::Int(_) => TypeRef::INT,
            Value::Float(_) => TypeRef::FLOAT,
            Value::Str(_) => TypeRef::STR,
            Value::List(_) => TypeRef::LIST,
            Value::Tuple(_) => TypeRef::TUPLE,
            Value::Dict(_) => TypeRef::DICT,
            Value::Object(obj) => TypeRef::Class(obj.class.clone()),
        }
    }

    /// Type name for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Object(obj) => obj.class.name().as_str(),
            _ => self.type_ref_builtin().name(),
        }
    }

    fn type_ref_builtin(&self) -> BuiltinType {
        self.type_ref().builtin_root()
    }

    /// Items of an ordered container of the given family (`List` or `Tuple`).
    ///
    /// Instances of classes deriving from the family expose their payload;
    /// any other value (including the other family) yields `None`.
    pub fn sequence_items(&self, family: BuiltinType) -> Option<&[Value]> {
        match (self, family) {
            (Value::List(items), BuiltinType::List) | (Value::Tuple(items), BuiltinType::Tuple) => {
                Some(items)
            }
            (Value::Object(obj), _) if obj.class.base().builtin_root() == family => {
                obj.payload.sequence_items(family)
            }
            _ => None,
        }
    }

    /// Entries of a key/value container, seeing through dict subclasses.
    pub fn as_dict(&self) -> Option<&DictValue> {
        match self {
            Value::Dict(dict) => Some(dict),
            Value::Object(obj) if obj.class.base().builtin_root() == BuiltinType::Dict => {
                obj.payload.as_dict()
            }
            _ => None,
        }
    }

    /// Identity comparison: shared allocation for heap values, equality for
    /// scalars.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Heap::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                Heap::ptr_eq(a, b)
            }
            (Value::Dict(a), Value::Dict(b)) => Heap::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Host-style representation (`'hi'`, `(1,)`, `{'a': 1}`).
    pub fn repr(&self) -> String {
        self.to_string()
    }
}

// Trait implementations

impl PartialEq for Value {
    /// Structural equality. Different variants are never equal, so `1`,
    /// `1.0` and `True` are three distinct values, and a list never equals a
    /// tuple with the same items.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                Heap::ptr_eq(a, b)
                    || (!a.payload.is_none() && *a.class == *b.class && a.payload == b.payload)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Str(s) => write!(f, "Str({:?})", &***s),
            Value::List(items) => write!(f, "List({:?})", &***items),
            Value::Tuple(items) => write!(f, "Tuple({:?})", &***items),
            Value::Dict(dict) => {
                f.write_str("Dict(")?;
                f.debug_map().entries(dict.iter()).finish()?;
                f.write_str(")")
            }
            Value::Object(obj) => {
                if obj.payload.is_none() {
                    write!(f, "Object({})", obj.class.name())
                } else {
                    write!(f, "Object({}, {:?})", obj.class.name(), obj.payload)
                }
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Str(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Dict(dict) => {
                write!(f, "{{")?;
                for (i, (k, v)) in dict.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Object(obj) => {
                if obj.payload.is_none() {
                    write!(f, "<{} object>", obj.class.name())
                } else {
                    write!(f, "{}({})", obj.class.name(), obj.payload)
                }
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
