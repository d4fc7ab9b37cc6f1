//! Resource collection port
//!
//! Defines how the engine finds a target resource and mutates it.

use chartpatch_domain::{Resource, ResourceId, ValueMap};

/// Errors that can occur while looking up a resource.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// More than one resource matches the identity.
    #[error("{count} resources match {id}")]
    Ambiguous {
        /// The identity that was looked up.
        id: String,
        /// Number of matches.
        count: usize,
    },

    /// The backing store failed.
    #[error("resource collection error: {0}")]
    Backend(String),
}

/// Errors that can occur while applying a patch to a resource.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The patch cannot be merged into the resource.
    #[error("patch rejected: {0}")]
    Rejected(String),

    /// The backing store failed.
    #[error("patch backend error: {0}")]
    Backend(String),
}

/// A located resource that can be mutated in place.
pub trait ResourceHandle {
    /// Returns the document's top-level fields; changes are visible to the
    /// owning collection.
    fn fields_mut(&mut self) -> &mut ValueMap;

    /// Merges `patch` into the resource.
    ///
    /// The merge algorithm is owned by the implementation.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch cannot be applied.
    fn apply_patch(&mut self, patch: &Resource) -> Result<(), PatchError>;
}

/// A set of resources addressable by identity.
pub trait ResourceCollection {
    /// The handle type returned by lookups.
    type Handle: ResourceHandle;

    /// Finds the resource selected by `id`.
    ///
    /// Returns `Ok(None)` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn find_by_id(
        &mut self,
        id: &ResourceId,
    ) -> Result<Option<&mut Self::Handle>, CollectionError>;
}

/// A plain domain resource patches itself with JSON merge patch semantics.
impl ResourceHandle for Resource {
    fn fields_mut(&mut self) -> &mut ValueMap {
        Self::fields_mut(self)
    }

    fn apply_patch(&mut self, patch: &Resource) -> Result<(), PatchError> {
        self.merge(patch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartpatch_domain::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resource_handle_merges_patch() {
        let mut resource: Resource =
            serde_yaml::from_str("spec: {values: {a: 1, b: 2}}").unwrap();
        let patch: Resource = serde_yaml::from_str("spec: {values: {b: 3}}").unwrap();

        resource.apply_patch(&patch).unwrap();

        let expected: Value = serde_yaml::from_str("{a: 1, b: 3}").unwrap();
        assert_eq!(resource.get(&["spec", "values"]), Some(&expected));
    }

    #[test]
    fn test_resource_handle_exposes_fields() {
        let mut resource = Resource::default();
        ResourceHandle::fields_mut(&mut resource)
            .insert("kind".to_string(), Value::from("HelmRelease"));

        assert_eq!(resource.get(&["kind"]), Some(&Value::from("HelmRelease")));
    }
}
