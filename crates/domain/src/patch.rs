//! Nested patch construction from dotted paths
//!
//! A chart override lists its values as flat dotted paths
//! (`conf.ceph.admin_keyring: ...`). `NestedPatch` folds those paths into a
//! tree whose nodes are either leaves or further mappings.

use indexmap::IndexMap;

use crate::error::{DomainError, DomainResult};
use crate::value::{Value, ValueMap};

/// Separator between segments of an override path.
pub const PATH_SEPARATOR: char = '.';

/// A node of a [`NestedPatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchNode {
    /// A value placed at the end of a path.
    Leaf(Value),
    /// A mapping holding further nodes.
    Branch(NestedPatch),
}

impl PatchNode {
    fn into_value(self) -> Value {
        match self {
            Self::Leaf(value) => value,
            Self::Branch(patch) => patch.into_value(),
        }
    }
}

/// Tree-shaped mapping built from dotted-path overrides.
///
/// # Example
///
/// ```
/// use chartpatch_domain::{NestedPatch, Value};
///
/// let mut patch = NestedPatch::new();
/// patch.insert_dotted("a.b.c", Value::from(5)).unwrap();
/// patch.insert_dotted("a.b.d", Value::from(6)).unwrap();
///
/// let value = patch.into_value();
/// assert_eq!(value.pointer(&["a", "b", "c"]), Some(&Value::from(5)));
/// assert_eq!(value.pointer(&["a", "b", "d"]), Some(&Value::from(6)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedPatch {
    entries: IndexMap<String, PatchNode>,
}

impl NestedPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `path` on `.` and inserts `value` at the resulting location.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PathCollision`] if a leading segment already
    /// holds a non-mapping value.
    pub fn insert_dotted(&mut self, path: &str, value: Value) -> DomainResult<()> {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        self.insert_at(&segments, value, path)
    }

    /// Inserts `value` at the location named by `segments`.
    ///
    /// A single segment overwrites whatever the key held. Longer paths create
    /// intermediate mappings where the key is absent or bound to `null`, and
    /// refine a mapping that was inserted as a leaf earlier.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPath`] for an empty path and
    /// [`DomainError::PathCollision`] if an intermediate segment holds a
    /// non-mapping value.
    pub fn insert<S: AsRef<str>>(&mut self, segments: &[S], value: Value) -> DomainResult<()> {
        let full = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(".");
        self.insert_at(segments, value, &full)
    }

    fn insert_at<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        value: Value,
        full: &str,
    ) -> DomainResult<()> {
        let Some((head, rest)) = segments.split_first() else {
            return Err(DomainError::InvalidPath(full.to_string()));
        };
        let head = head.as_ref();

        if rest.is_empty() {
            self.entries.insert(head.to_string(), PatchNode::Leaf(value));
            return Ok(());
        }

        let node = self
            .entries
            .entry(head.to_string())
            .or_insert_with(|| PatchNode::Branch(Self::new()));

        let promoted = match node {
            PatchNode::Leaf(Value::Null) => Some(Self::new()),
            PatchNode::Leaf(Value::Map(map)) => Some(Self::from(std::mem::take(map))),
            PatchNode::Leaf(_) => return Err(DomainError::PathCollision(full.to_string())),
            PatchNode::Branch(_) => None,
        };
        if let Some(branch) = promoted {
            *node = PatchNode::Branch(branch);
        }

        match node {
            PatchNode::Branch(child) => child.insert_at(rest, value, full),
            PatchNode::Leaf(_) => Err(DomainError::PathCollision(full.to_string())),
        }
    }

    /// Returns the node stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PatchNode> {
        self.entries.get(key)
    }

    /// Returns the number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the tree into a mapping value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Map(self.into_map())
    }

    /// Converts the tree into an ordered map.
    #[must_use]
    pub fn into_map(self) -> ValueMap {
        self.entries
            .into_iter()
            .map(|(key, node)| (key, node.into_value()))
            .collect()
    }
}

impl From<ValueMap> for NestedPatch {
    fn from(map: ValueMap) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(key, value)| (key, PatchNode::Leaf(value)))
                .collect(),
        }
    }
}
