//! Chartpatch Domain - Core types
//!
//! This crate defines the domain model for the chartpatch override engine:
//! structured values, the global variable table, chart override directives,
//! nested patches and resources.
//! All types here are pure Rust with no I/O dependencies.

pub mod chart;
pub mod error;
pub mod globals;
pub mod merge;
pub mod patch;
pub mod resource;
pub mod value;

pub use chart::{ChartOverride, OverrideConfig};
pub use error::{DomainError, DomainResult};
pub use globals::GlobalTable;
pub use merge::{merge_map, merge_patch};
pub use patch::{NestedPatch, PATH_SEPARATOR, PatchNode};
pub use resource::{CHART_REF_PATH, Gvk, Resource, ResourceId, VALUES_PATH, set_existing};
pub use value::{Value, ValueMap};
