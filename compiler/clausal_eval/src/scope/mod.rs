//! Name resolution for free identifiers in clause bodies.
//!
//! A pattern-matched function keeps a handle to the scope it was defined in,
//! not a copy of its contents. Lookups happen at call time, so a name that
//! is redefined after the function was built is seen with its new value by
//! every later call.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use clausal_ir::{Name, Value};

/// Supplies values for names that are not captures of the selected clause.
pub trait Resolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Value>;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

/// Error returned by [`Scope::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    /// Not defined in this scope or any parent.
    #[error("name is not defined in any enclosing scope")]
    Undefined,
}

/// A live, shared variable scope with an optional parent.
///
/// Cloning yields another handle to the same scope. Reads and writes take a
/// `parking_lot` lock on one scope level at a time, never on two at once.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeData>,
}

struct ScopeData {
    values: RwLock<FxHashMap<Name, Value>>,
    parent: Option<Scope>,
}

impl Scope {
    /// A new root scope (module/global level).
    pub fn global() -> Self {
        Scope::with_parent(None)
    }

    /// A new empty scope nested inside this one.
    pub fn child(&self) -> Self {
        Scope::with_parent(Some(self.clone()))
    }

    fn with_parent(parent: Option<Scope>) -> Self {
        Scope {
            inner: Arc::new(ScopeData {
                values: RwLock::new(FxHashMap::default()),
                parent,
            }),
        }
    }

    /// Bind `name` in this scope, shadowing any parent binding.
    pub fn define(&self, name: &str, value: Value) {
        self.inner.values.write().insert(Name::new(name), value);
    }

    /// Rebind `name` in the nearest scope that defines it.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(slot) = current.inner.values.write().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            scope = current.inner.parent.as_ref();
        }
        Err(AssignError::Undefined)
    }

    /// Current value of `name`, searching outward through parents.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.inner.values.read().get(name) {
                return Some(value.clone());
            }
            scope = current.inner.parent.as_ref();
        }
        None
    }

    /// Whether `name` is bound in this scope itself, ignoring parents.
    pub fn defines(&self, name: &str) -> bool {
        self.inner.values.read().contains_key(name)
    }

    /// Whether both handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::global()
    }
}

impl Resolver for Scope {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.lookup(name)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.inner.values.read();
        let mut names: Vec<&Name> = values.keys().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("names", &names)
            .field("parent", &self.inner.parent)
            .finish()
    }
}
