//! Adapters implementing the application ports

mod in_memory_collection;
mod plain_resource_factory;

pub use in_memory_collection::InMemoryResourceCollection;
pub use plain_resource_factory::PlainResourceFactory;
