//! Global variable table
//!
//! Holds the `global` section of a transformer configuration. Values are
//! looked up by name when `$(name)` references are resolved.

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueMap};

/// Run-scoped, read-only table of global variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalTable {
    variables: ValueMap,
}

impl GlobalTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `name`.
    ///
    /// A name bound to `null` is treated as undefined.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.variables.get(name).filter(|value| !value.is_null())
    }

    /// Returns true if `name` resolves to a defined value.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns the variable names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the table holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl From<ValueMap> for GlobalTable {
    fn from(variables: ValueMap) -> Self {
        Self { variables }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for GlobalTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
