//! The compiled pattern tree.
//!
//! A clause's pattern text is compiled once into a `Pattern` and then reused
//! for every call. The tree is a closed sum type: the matcher handles it with
//! one exhaustive `match`, never by inspecting shapes at run time.

use std::fmt;

use crate::types::{BuiltinType, TypeRef};
use crate::{Name, Span, Value};

/// Which ordered-container family a sequence pattern accepts.
///
/// The families never cross-match: a list pattern rejects a tuple with the
/// same items and vice versa. Subclasses of a family are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Tuple,
}

impl ContainerKind {
    pub fn family(self) -> BuiltinType {
        match self {
            ContainerKind::List => BuiltinType::List,
            ContainerKind::Tuple => BuiltinType::Tuple,
        }
    }

    /// Wrap `items` as a plain value of this family (used for rest tails).
    pub fn wrap(self, items: Vec<Value>) -> Value {
        match self {
            ContainerKind::List => Value::list(items),
            ContainerKind::Tuple => Value::tuple(items),
        }
    }

    pub fn name(self) -> &'static str {
        self.family().name()
    }
}

/// Target of the trailing `+ name` of a head/rest pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum RestBinding {
    Capture(Name),
    Wildcard,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Exact structural equality with a literal value.
    Literal(Value),
    /// Matches anything, binds nothing.
    Wildcard,
    /// Matches anything, binds the value.
    Capture(Name),
    /// Runtime type must be one of `types` or derive from one.
    /// `name` is `None` when the guarded identifier is the wildcard.
    TypeGuard {
        name: Option<Name>,
        types: Vec<TypeRef>,
    },
    /// Positional destructuring of a list or tuple.
    /// Without `rest` the length must be exact; with it, at least `elements.len()`.
    Sequence {
        kind: ContainerKind,
        elements: Vec<Pattern>,
        rest: Option<RestBinding>,
    },
    /// Key/value destructuring with an exact key set.
    Record { fields: Vec<(Value, Pattern)> },
}

/// A pattern node and the source range it was compiled from.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    #[inline]
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }

    /// Names this pattern binds, in first-occurrence order, without duplicates.
    pub fn capture_names(&self) -> Vec<Name> {
        let mut names = Vec::new();
        self.walk_names(&mut |name| {
            if !names.contains(name) {
                names.push(name.clone());
            }
        });
        names
    }

    /// Names bound more than once, in order of their second occurrence.
    pub fn repeated_names(&self) -> Vec<Name> {
        let mut seen = Vec::new();
        let mut repeated = Vec::new();
        self.walk_names(&mut |name| {
            if seen.contains(name) {
                if !repeated.contains(name) {
                    repeated.push(name.clone());
                }
            } else {
                seen.push(name.clone());
            }
        });
        repeated
    }

    fn walk_names(&self, visit: &mut dyn FnMut(&Name)) {
        match &self.kind {
            PatternKind::Literal(_) | PatternKind::Wildcard => {}
            PatternKind::Capture(name) => visit(name),
            PatternKind::TypeGuard { name, .. } => {
                if let Some(name) = name {
                    visit(name);
                }
            }
            PatternKind::Sequence { elements, rest, .. } => {
                for element in elements {
                    element.walk_names(visit);
                }
                if let Some(RestBinding::Capture(name)) = rest {
                    visit(name);
                }
            }
            PatternKind::Record { fields } => {
                for (_, field) in fields {
                    field.walk_names(visit);
                }
            }
        }
    }
}

impl fmt::Display for Pattern {
    /// Renders the pattern back in surface syntax (wildcards as `_`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PatternKind::Literal(value) => write!(f, "{value}"),
            PatternKind::Wildcard => f.write_str("_"),
            PatternKind::Capture(name) => write!(f, "{name}"),
            PatternKind::TypeGuard { name, types } => {
                match name {
                    Some(name) => write!(f, "{name} is ")?,
                    None => f.write_str("_ is ")?,
                }
                if let [single] = types.as_slice() {
                    write!(f, "{single}")
                } else {
                    f.write_str("(")?;
                    for (i, ty) in types.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{ty}")?;
                    }
                    f.write_str(")")
                }
            }
            PatternKind::Sequence {
                kind,
                elements,
                rest,
            } => {
                let (open, close) = match kind {
                    ContainerKind::List => ("[", "]"),
                    ContainerKind::Tuple => ("(", ")"),
                };
                f.write_str(open)?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                if *kind == ContainerKind::Tuple && elements.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(close)?;
                match rest {
                    Some(RestBinding::Capture(name)) => write!(f, " + {name}"),
                    Some(RestBinding::Wildcard) => f.write_str(" + _"),
                    None => Ok(()),
                }
            }
            PatternKind::Record { fields } => {
                f.write_str("{")?;
                for (i, (key, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {field}")?;
                }
                f.write_str("}")
            }
        }
    }
}
