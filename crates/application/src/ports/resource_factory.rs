//! Resource factory port

use chartpatch_domain::{Resource, ValueMap};

/// Builds standalone documents of the type accepted by
/// [`ResourceHandle::apply_patch`](super::ResourceHandle::apply_patch).
pub trait ResourceFactory {
    /// Wraps a nested mapping into a resource.
    fn from_map(&self, map: ValueMap) -> Resource;
}

impl<F: ResourceFactory + ?Sized> ResourceFactory for &F {
    fn from_map(&self, map: ValueMap) -> Resource {
        (**self).from_map(map)
    }
}
