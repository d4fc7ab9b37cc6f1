//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building patches or reading documents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A dotted path crosses a key that already holds a non-mapping value.
    #[error("path collision at '{0}': an intermediate segment holds a non-mapping value")]
    PathCollision(String),

    /// A path has no segments.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// A document cannot be used as a resource.
    #[error("invalid resource: {0}")]
    InvalidResource(String),

    /// A field expected to exist as a mapping is absent or has another shape.
    #[error("missing mapping field: {field}")]
    MissingField {
        /// Dotted location of the field.
        field: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
