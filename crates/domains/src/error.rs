//! # DomainError
//!
//! Centralized error taxonomy for Quarterdeck operations. Adapters map
//! backend failures into `Storage`; everything else is raised by the
//! services themselves.

use thiserror::Error;
use uuid::Uuid;

/// The primary error type for all domain operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Referenced entity absent (e.g., Category, Topic).
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, Uuid),

    /// Missing or empty required field.
    #[error("validation error: {0}")]
    Validation(String),

    /// No actor, or the actor's role does not grant the capability.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Write rejected because the topic is locked.
    #[error("topic {0} is locked")]
    Locked(Uuid),

    /// Generic backend failure; not further classified here.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Shorthand for storage failures wrapped from adapter errors.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

/// A specialized Result type for Quarterdeck domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
