//! Error types shared by the geometry kernel and the light pipeline

use thiserror::Error;

/// Errors raised by constructors and validating setters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A caller-supplied value violates a documented precondition
    /// (coincident points, collinear points, zero-length vectors,
    /// out-of-range angles, non-positive dimensions)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A derived quantity is numerically unusable even though every input
    /// looked valid on its own (e.g. a zero projection denominator)
    #[error("Domain error: {0}")]
    DomainError(String),
}

impl GraphError {
    /// Shorthand for [`GraphError::InvalidArgument`]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Shorthand for [`GraphError::DomainError`]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::DomainError(message.into())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GraphError>;
