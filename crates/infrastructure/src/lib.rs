//! Chartpatch Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus YAML/JSON serialization.

pub mod adapters;
pub mod serialization;

pub use adapters::{InMemoryResourceCollection, PlainResourceFactory};
pub use serialization::{
    SerializationError, from_yaml_stream, to_json_stable, to_yaml, to_yaml_stream,
};
