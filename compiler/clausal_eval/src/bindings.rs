use std::collections::hash_map::Entry;
use std::fmt;

use rustc_hash::FxHashMap;

use clausal_ir::{Name, Value};

/// Values bound by one successful match, keyed by capture name.
///
/// Created per call and dropped once the clause body returns.
#[derive(Clone, Default, PartialEq)]
pub struct Bindings {
    values: FxHashMap<Name, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Bindings {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound names, sorted for stable output.
    pub fn names(&self) -> Vec<&Name> {
        let mut names: Vec<&Name> = self.values.keys().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.values.iter()
    }

    /// Bind `name`. Returns `false` when it is already bound to a value
    /// that is not structurally equal to `value`.
    pub(crate) fn bind(&mut self, name: Name, value: Value) -> bool {
        match self.values.entry(name) {
            Entry::Occupied(entry) => *entry.get() == value,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.names() {
            if let Some(value) = self.values.get(name) {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

impl<'a> FromIterator<(&'a str, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (&'a str, Value)>>(iter: I) -> Self {
        Bindings {
            values: iter
                .into_iter()
                .map(|(name, value)| (Name::new(name), value))
                .collect(),
        }
    }
}
