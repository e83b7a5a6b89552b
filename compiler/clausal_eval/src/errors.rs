//! Call-time and definition-time errors.
//!
//! A clause that does not match is not an error: the matcher reports it as a
//! [`MatchFailure`](crate::MatchFailure) and the dispatcher moves on. Only when
//! every clause fails does the caller see [`CallError::Mismatch`]. Anything a
//! body returns is passed through untouched.

use std::fmt;
use std::panic::Location;

use clausal_ir::{Name, Value};
use clausal_parse::PatternError;

/// Category of a body-raised fault, named after the host's exception types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    TypeError,
    ValueError,
    NameError,
    ZeroDivision,
    Overflow,
    RecursionLimit,
    Custom,
}

impl FaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultKind::TypeError => "TypeError",
            FaultKind::ValueError => "ValueError",
            FaultKind::NameError => "NameError",
            FaultKind::ZeroDivision => "ZeroDivisionError",
            FaultKind::Overflow => "OverflowError",
            FaultKind::RecursionLimit => "RecursionError",
            FaultKind::Custom => "Error",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fault raised while a clause body runs.
///
/// Every constructor is `#[track_caller]`, so `location` is the body
/// statement that raised it, not a line inside this crate.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
    location: &'static Location<'static>,
}

impl Fault {
    #[track_caller]
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Fault {
            kind,
            message: message.into(),
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn type_error(message: impl Into<String>) -> Self {
        Fault::new(FaultKind::TypeError, message)
    }

    #[track_caller]
    pub fn value_error(message: impl Into<String>) -> Self {
        Fault::new(FaultKind::ValueError, message)
    }

    #[track_caller]
    pub fn name_error(name: &str) -> Self {
        Fault::new(FaultKind::NameError, format!("name '{name}' is not defined"))
    }

    #[track_caller]
    pub fn zero_division(message: impl Into<String>) -> Self {
        Fault::new(FaultKind::ZeroDivision, message)
    }

    #[track_caller]
    pub fn overflow(operation: &str) -> Self {
        Fault::new(FaultKind::Overflow, format!("integer overflow in {operation}"))
    }

    #[track_caller]
    pub fn recursion_limit(function: &Name, limit: usize) -> Self {
        Fault::new(
            FaultKind::RecursionLimit,
            format!("maximum recursion depth {limit} exceeded in `{function}`"),
        )
    }

    #[track_caller]
    pub fn custom(message: impl Into<String>) -> Self {
        Fault::new(FaultKind::Custom, message)
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source position of the statement that raised the fault.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Result of invoking a pattern-matched function, when it is not a value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CallError {
    /// No clause matched. Carries the argument exactly as passed.
    #[error("no clause of `{function}` matches {value}")]
    Mismatch { function: Name, value: Value },
    /// A body faulted. Never produced by the matching machinery itself.
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl CallError {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, CallError::Mismatch { .. })
    }

    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            CallError::Fault(fault) => Some(fault),
            CallError::Mismatch { .. } => None,
        }
    }
}

/// A clause failed to compile, so the function was never created.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("clause {clause} of `{function}` (`{source_text}`): {error}")]
pub struct DefinitionError {
    pub function: Name,
    /// Zero-based clause index in definition order.
    pub clause: usize,
    pub source_text: String,
    #[source]
    pub error: PatternError,
}

impl DefinitionError {
    /// Source diagnostic for the failing clause.
    pub fn render(&self) -> String {
        let origin = format!("{}#{}", self.function, self.clause);
        self.error.render(&self.source_text, &origin)
    }
}
