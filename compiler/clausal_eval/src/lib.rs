//! Clausal evaluation: matching values against compiled patterns and
//! dispatching calls to pattern-matched functions.
//!
//! The pieces, leaves first:
//! - [`match_pattern`] runs one compiled clause pattern against a value and
//!   yields [`Bindings`] or a [`MatchFailure`].
//! - [`Scope`] / [`Resolver`] resolve free names at call time.
//! - [`PatternFn`] holds the ordered clauses of one function and picks the
//!   first that matches on every call.
//! - [`evaluate_binary`] gives clause bodies the host's arithmetic and
//!   comparison operators.
//!
//! Pattern compilation lives in `clausal_parse`; the items needed to define
//! functions are re-exported here.

mod bindings;
mod config;
mod dispatch;
mod errors;
mod matcher;
mod operators;
mod scope;
mod tracing_setup;

pub use bindings::Bindings;
pub use config::{DispatchConfig, MAX_DEPTH_ENV};
pub use dispatch::{Body, Clause, Frame, PatternFn, PatternFnBuilder};
pub use errors::{CallError, DefinitionError, Fault, FaultKind};
pub use matcher::{match_pattern, FailReason, MatchFailure};
pub use operators::{evaluate_binary, values_equal, BinaryOp};
pub use scope::{AssignError, Resolver, Scope};
pub use tracing_setup::init_tracing;

pub use clausal_parse::{compile_pattern, CompileOptions, PatternError, PatternErrorKind};
