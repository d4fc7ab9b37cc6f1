//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the override engine and the systems
//! that own resources. Each port is a trait that can be implemented by
//! adapters in the infrastructure layer.

mod resource_collection;
mod resource_factory;

pub use resource_collection::{CollectionError, PatchError, ResourceCollection, ResourceHandle};
pub use resource_factory::ResourceFactory;
