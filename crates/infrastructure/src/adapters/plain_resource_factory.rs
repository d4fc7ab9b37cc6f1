//! Plain resource factory adapter

use chartpatch_application::ports::ResourceFactory;
use chartpatch_domain::{Resource, ValueMap};

/// Builds patches as plain documents, matching [`InMemoryResourceCollection`]
/// resources.
///
/// [`InMemoryResourceCollection`]: super::InMemoryResourceCollection
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainResourceFactory;

impl PlainResourceFactory {
    /// Creates a new factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ResourceFactory for PlainResourceFactory {
    fn from_map(&self, map: ValueMap) -> Resource {
        Resource::from_map(map)
    }
}
