//! Application error types

use chartpatch_domain::DomainError;
use thiserror::Error;

use crate::ports::{CollectionError, PatchError};
use crate::variable_resolver::ResolveError;

/// Errors raised while configuring or running the override engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration bytes could not be decoded.
    #[error("invalid transformer configuration: {0}")]
    InvalidConfig(String),

    /// The configuration has no `charts` list.
    #[error("transformer configuration has no charts list")]
    MissingCharts,

    /// Looking up a target resource failed.
    #[error("failed to look up HelmRelease {name}: {source}")]
    LookupFailed {
        /// Chart name being processed.
        name: String,
        /// Underlying collection error.
        #[source]
        source: CollectionError,
    },

    /// A `$(name)` reference has no value.
    #[error("undefined global variable: $({0})")]
    UndefinedVariable(String),

    /// A global expands into itself.
    #[error("global variable $({0}) expands recursively")]
    RecursiveReference(String),

    /// Resolving a value produced oversized text.
    #[error("expansion of global variable $({0}) is too large")]
    ExpansionTooLarge(String),

    /// A domain rule was violated, e.g. a path collision while building a patch.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The target document does not have the shape needed for the rewrite.
    #[error("HelmRelease {name} cannot be rewritten: {source}")]
    MalformedTarget {
        /// Chart name being processed.
        name: String,
        /// Underlying domain error.
        #[source]
        source: DomainError,
    },

    /// Applying the patch to the target failed.
    #[error("failed to patch HelmRelease {name}: {source}")]
    PatchFailed {
        /// Chart name being processed.
        name: String,
        /// Underlying patch error.
        #[source]
        source: PatchError,
    },
}

impl From<ResolveError> for EngineError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::UndefinedVariable(name) => Self::UndefinedVariable(name),
            ResolveError::RecursiveReference(name) => Self::RecursiveReference(name),
            ResolveError::ExpansionTooLarge(name) => Self::ExpansionTooLarge(name),
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
