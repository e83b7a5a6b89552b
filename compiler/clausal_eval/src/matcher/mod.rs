//! Pattern matcher.
//!
//! Matching runs in two passes over one clause pattern. The first walks the
//! tree against the value and collects every capture, repeats included, in
//! a flat list. The second folds that list into [`Bindings`], failing when a
//! name bound twice got two different values. Doing the check once for the
//! whole clause is what lets `(x, x)` relate captures in sibling positions.

use std::fmt;

use smallvec::SmallVec;
use tracing::trace;

use clausal_ir::{ContainerKind, Name, Pattern, PatternKind, RestBinding, Span, Value};
use clausal_stack::ensure_sufficient_stack;

use crate::Bindings;

/// Why a clause pattern rejected a value.
#[derive(Clone, Debug, PartialEq)]
pub enum FailReason {
    /// Not structurally equal to the literal.
    Literal,
    /// Runtime type outside the guard's type set.
    TypeGuard,
    /// Not a list/tuple of the family the pattern asks for.
    ContainerKind { expected: ContainerKind },
    /// Wrong number of items. `open` is set for head/rest patterns, where
    /// `expected` is a minimum.
    Length {
        expected: usize,
        actual: usize,
        open: bool,
    },
    /// Not a key/value container.
    NotRecord,
    /// Key set differs from the pattern's.
    KeySet,
    /// A repeated capture name saw two different values.
    Inconsistent { name: Name },
}

/// A clause did not apply to a value.
///
/// This is ordinary control flow for the dispatcher, not an error. `value`
/// and `span` locate the innermost part that failed.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchFailure {
    pub value: Value,
    pub span: Span,
    pub reason: FailReason,
}

impl MatchFailure {
    fn new(value: &Value, pattern: &Pattern, reason: FailReason) -> Self {
        MatchFailure {
            value: value.clone(),
            span: pattern.span,
            reason,
        }
    }
}

impl fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = &self.value;
        match &self.reason {
            FailReason::Literal => write!(f, "{value} is not equal to the literal"),
            FailReason::TypeGuard => {
                write!(f, "{value} has type {}, outside the guard", value.type_name())
            }
            FailReason::ContainerKind { expected } => {
                write!(f, "{value} is not a {}", expected.name())
            }
            FailReason::Length {
                expected,
                actual,
                open,
            } => {
                let bound = if *open { "at least " } else { "" };
                write!(f, "expected {bound}{expected} items, {value} has {actual}")
            }
            FailReason::NotRecord => write!(f, "{value} is not a dict"),
            FailReason::KeySet => write!(f, "keys of {value} differ from the pattern's"),
            FailReason::Inconsistent { name } => {
                write!(f, "`{name}` bound again to a different value {value}")
            }
        }?;
        write!(f, " (at {})", self.span)
    }
}

/// Captures in the order the walk produced them, repeats included.
type RawBindings = SmallVec<[(Name, Value, Span); 8]>;

/// Match a whole clause pattern against `value`.
pub fn match_pattern(pattern: &Pattern, value: &Value) -> Result<Bindings, MatchFailure> {
    let mut raw = RawBindings::new();
    collect(pattern, value, &mut raw)?;
    check_consistency(raw)
}

fn collect(pattern: &Pattern, value: &Value, out: &mut RawBindings) -> Result<(), MatchFailure> {
    ensure_sufficient_stack(|| match &pattern.kind {
        PatternKind::Literal(expected) => {
            if value == expected {
                Ok(())
            } else {
                Err(MatchFailure::new(value, pattern, FailReason::Literal))
            }
        }
        PatternKind::Wildcard => Ok(()),
        PatternKind::Capture(name) => {
            out.push((name.clone(), value.clone(), pattern.span));
            Ok(())
        }
        PatternKind::TypeGuard { name, types } => {
            let actual = value.type_ref();
            if !types.iter().any(|ty| actual.is_subtype_of(ty)) {
                return Err(MatchFailure::new(value, pattern, FailReason::TypeGuard));
            }
            if let Some(name) = name {
                out.push((name.clone(), value.clone(), pattern.span));
            }
            Ok(())
        }
        PatternKind::Sequence {
            kind,
            elements,
            rest,
        } => collect_sequence(pattern, *kind, elements, rest.as_ref(), value, out),
        PatternKind::Record { fields } => collect_record(pattern, fields, value, out),
    })
}

fn collect_sequence(
    pattern: &Pattern,
    kind: ContainerKind,
    elements: &[Pattern],
    rest: Option<&RestBinding>,
    value: &Value,
    out: &mut RawBindings,
) -> Result<(), MatchFailure> {
    let Some(items) = value.sequence_items(kind.family()) else {
        return Err(MatchFailure::new(
            value,
            pattern,
            FailReason::ContainerKind { expected: kind },
        ));
    };

    let length_ok = match rest {
        None => items.len() == elements.len(),
        Some(_) => items.len() >= elements.len(),
    };
    if !length_ok {
        return Err(MatchFailure::new(
            value,
            pattern,
            FailReason::Length {
                expected: elements.len(),
                actual: items.len(),
                open: rest.is_some(),
            },
        ));
    }

    for (element, item) in elements.iter().zip(items) {
        collect(element, item, out)?;
    }

    if let Some(RestBinding::Capture(name)) = rest {
        let tail = kind.wrap(items[elements.len()..].to_vec());
        trace!(%name, tail = %tail, "rest binding");
        out.push((name.clone(), tail, pattern.span));
    }
    Ok(())
}

fn collect_record(
    pattern: &Pattern,
    fields: &[(Value, Pattern)],
    value: &Value,
    out: &mut RawBindings,
) -> Result<(), MatchFailure> {
    let Some(dict) = value.as_dict() else {
        return Err(MatchFailure::new(value, pattern, FailReason::NotRecord));
    };

    // Keys in the pattern are unique, so equal sizes plus containment means
    // equal key sets.
    let same_keys =
        dict.len() == fields.len() && fields.iter().all(|(key, _)| dict.contains_key(key));
    if !same_keys {
        return Err(MatchFailure::new(value, pattern, FailReason::KeySet));
    }

    for (key, field) in fields {
        if let Some(item) = dict.get(key) {
            collect(field, item, out)?;
        }
    }
    Ok(())
}

/// Fold raw captures into bindings, enforcing equality for repeated names.
fn check_consistency(raw: RawBindings) -> Result<Bindings, MatchFailure> {
    let mut bindings = Bindings::with_capacity(raw.len());
    for (name, value, span) in raw {
        if !bindings.bind(name.clone(), value.clone()) {
            trace!(%name, "repeated capture disagrees");
            return Err(MatchFailure {
                value,
                span,
                reason: FailReason::Inconsistent { name },
            });
        }
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests;
