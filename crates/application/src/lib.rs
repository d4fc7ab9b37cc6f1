//! Chartpatch Application - Override engine and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for resource collections)
//! - `$(variable)` resolution against the global table
//! - The override engine that rewrites `HelmRelease` resources

pub mod error;
pub mod override_engine;
pub mod ports;
pub mod variable_resolver;

pub use error::{EngineError, EngineResult};
pub use override_engine::{EngineState, OverrideEngine, RunReport};
pub use ports::{CollectionError, PatchError, ResourceCollection, ResourceFactory, ResourceHandle};
pub use variable_resolver::{ResolveError, VariableResolver};
