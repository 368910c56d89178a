//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures of the domain primitives themselves.
///
/// Provider, transport and storage errors live in the crates that talk to
/// those systems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A session's parts disagree (e.g. authenticated without an identity).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was malformed (e.g. an empty provider uid).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
