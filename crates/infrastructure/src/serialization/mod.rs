//! Serialization helpers for configuration and manifests.
//!
//! - JSON output is pretty-printed with 2-space indentation and a trailing
//!   newline; keys keep document order.
//! - YAML input may hold several `---` separated documents; empty documents
//!   are dropped.

mod error;
mod json;
mod yaml;

pub use error::SerializationError;
pub use json::to_json_stable;
pub use yaml::{from_yaml_stream, to_yaml, to_yaml_stream};
