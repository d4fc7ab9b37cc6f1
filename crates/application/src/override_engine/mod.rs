//! Chart override engine
//!
//! Applies the configured chart overrides to a resource collection, one
//! chart at a time and in configuration order.

mod engine;
mod state;

pub use engine::OverrideEngine;
pub use state::{EngineState, RunReport};
