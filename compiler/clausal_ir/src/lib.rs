//! Clausal IR - shared data model for the pattern engine.
//!
//! This crate contains the types every other stage agrees on:
//! - `Span` for positions inside a clause's pattern source
//! - `Name` for capture and type identifiers
//! - `Value`, the runtime values patterns are matched against
//! - `TypeRef` / `TypeTable`, the runtime type hierarchy used by type guards
//! - `Pattern`, the compiled pattern tree
//!
//! Everything here is immutable once built and `Send + Sync`, so a compiled
//! pattern can be shared between threads without synchronization.

mod name;
pub mod pattern;
mod span;
pub mod types;
mod value;

pub use name::Name;
pub use pattern::{ContainerKind, Pattern, PatternKind, RestBinding};
pub use span::{Span, SpanError};
pub use types::{BuiltinType, Class, TypeRef, TypeTable};
pub use value::{DictValue, Heap, Object, Value};
