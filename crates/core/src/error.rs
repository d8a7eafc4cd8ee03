//! Domain error model.

use std::collections::BTreeMap;

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Field name -> list of violated constraint messages.
///
/// Ordered so that error payloads render deterministically in logs and tests.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Domain-level error.
///
/// Every repository backend raises the same variants, so callers branch on the
/// error kind and never on the storage technology behind it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No entity matched the identifier that was searched.
    ///
    /// Carries the identifier exactly as the caller supplied it.
    #[error("Entity not found using ID {0}")]
    NotFound(String),

    /// An identifier was not a well-formed UUID.
    #[error("ID must be a valid UUID")]
    InvalidUuid,

    /// A single value failed a rule of the validation chain.
    #[error("{0}")]
    Validation(String),

    /// An entity failed its structural validation (one or more fields).
    #[error("Entity Validation Error")]
    EntityValidation(FieldErrors),

    /// A persisted record failed entity validation while being rehydrated.
    ///
    /// Signals storage corruption or schema drift, never user input.
    #[error("Entity Not Loaded")]
    LoadEntity(FieldErrors),

    /// The backing store failed (connection, query, decoding).
    #[error("storage error: {0}")]
    Storage(String),

    /// Any failure that does not belong to the categories above.
    #[error("{0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn not_found(id: impl core::fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Field-level errors carried by `EntityValidation` or `LoadEntity`.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::EntityValidation(errors) | Self::LoadEntity(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
