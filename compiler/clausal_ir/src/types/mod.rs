//! Runtime type hierarchy consulted by type-guard patterns.
//!
//! Every value has a runtime type (`Value::type_ref`). Builtin types form a
//! fixed tree rooted at `object`; user classes hang off any builtin or other
//! class. Subtype checks walk the base chain, so the matcher never needs a
//! registry at call time: a `TypeRef` carries its own ancestry.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use crate::value::Heap;
use crate::Name;

/// Types built into the host environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Object,
    NoneType,
    Int,
    /// Subtype of `Int`, as in the host.
    Bool,
    Float,
    Str,
    List,
    Tuple,
    Dict,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 9] = [
        BuiltinType::Object,
        BuiltinType::NoneType,
        BuiltinType::Int,
        BuiltinType::Bool,
        BuiltinType::Float,
        BuiltinType::Str,
        BuiltinType::List,
        BuiltinType::Tuple,
        BuiltinType::Dict,
    ];

    /// The name the type is known by in pattern source.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Object => "object",
            BuiltinType::NoneType => "NoneType",
            BuiltinType::Int => "int",
            BuiltinType::Bool => "bool",
            BuiltinType::Float => "float",
            BuiltinType::Str => "str",
            BuiltinType::List => "list",
            BuiltinType::Tuple => "tuple",
            BuiltinType::Dict => "dict",
        }
    }

    pub fn base(self) -> Option<BuiltinType> {
        match self {
            BuiltinType::Object => None,
            BuiltinType::Bool => Some(BuiltinType::Int),
            _ => Some(BuiltinType::Object),
        }
    }
}

/// A user-declared class.
pub struct Class {
    id: u64,
    name: Name,
    base: TypeRef,
}

impl Class {
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn base(&self) -> &TypeRef {
        &self.base
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({}#{} : {})", self.name, self.id, self.base.name())
    }
}

/// Reference to a runtime type.
#[derive(Clone, PartialEq)]
pub enum TypeRef {
    Builtin(BuiltinType),
    Class(Heap<Class>),
}

impl TypeRef {
    pub const OBJECT: TypeRef = TypeRef::Builtin(BuiltinType::Object);
    pub const NONE: TypeRef = TypeRef::Builtin(BuiltinType::NoneType);
    pub const INT: TypeRef = TypeRef::Builtin(BuiltinType::Int);
    pub const BOOL: TypeRef = TypeRef::Builtin(BuiltinType::Bool);
    pub const FLOAT: TypeRef = TypeRef::Builtin(BuiltinType::Float);
    pub const STR: TypeRef = TypeRef::Builtin(BuiltinType::Str);
    pub const LIST: TypeRef = TypeRef::Builtin(BuiltinType::List);
    pub const TUPLE: TypeRef = TypeRef::Builtin(BuiltinType::Tuple);
    pub const DICT: TypeRef = TypeRef::Builtin(BuiltinType::Dict);

    pub fn name(&self) -> &str {
        match self {
            TypeRef::Builtin(b) => b.name(),
            TypeRef::Class(c) => c.name.as_str(),
        }
    }

    /// Direct base type, `None` only for `object`.
    pub fn base(&self) -> Option<TypeRef> {
        match self {
            TypeRef::Builtin(b) => b.base().map(TypeRef::Builtin),
            TypeRef::Class(c) => Some(c.base.clone()),
        }
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subtype_of(&self, other: &TypeRef) -> bool {
        let mut current = Some(self.clone());
        while let Some(ty) = current {
            if ty == *other {
                return true;
            }
            current = ty.base();
        }
        false
    }

    /// The nearest builtin in the base chain (the type itself if builtin).
    ///
    /// Determines which container behavior an instance of a class inherits.
    pub fn builtin_root(&self) -> BuiltinType {
        match self {
            TypeRef::Builtin(b) => *b,
            TypeRef::Class(c) => c.base.builtin_root(),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Builtin(b) => write!(f, "{}", b.name()),
            TypeRef::Class(c) => write!(f, "{c:?}"),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Name → type lookup used when compiling type guards.
///
/// Starts with every builtin; classes are added with `declare_class`.
/// Declaring a name again shadows the earlier type for later lookups,
/// while patterns already compiled keep referring to the type they resolved.
#[derive(Clone, Debug)]
pub struct TypeTable {
    by_name: FxHashMap<Name, TypeRef>,
}

impl TypeTable {
    pub fn new() -> Self {
        let by_name = BuiltinType::ALL
            .iter()
            .map(|b| (Name::new(b.name()), TypeRef::Builtin(*b)))
            .collect();
        TypeTable { by_name }
    }

    pub fn lookup(&self, name: &str) -> Option<TypeRef> {
        self.by_name.get(name).cloned()
    }

    /// Declare a class deriving from `base` and register it under `name`.
    pub fn declare_class(&mut self, name: &str, base: &TypeRef) -> Heap<Class> {
        let class = Heap::new(Class {
            id: NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed),
            name: Name::new(name),
            base: base.clone(),
        });
        self.by_name
            .insert(Name::new(name), TypeRef::Class(class.clone()));
        class
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
