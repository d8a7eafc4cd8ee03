//! Entity identity value object.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Length of the canonical hyphenated UUID form (`8-4-4-4-12`).
const HYPHENATED_LEN: usize = 36;

/// Identifier owned by every entity.
///
/// Holds the UUID exactly as supplied (no re-formatting), validated to be in the
/// canonical hyphenated form. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UniqueEntityId(String);

impl UniqueEntityId {
    /// Build from an optional raw value.
    ///
    /// `None` generates a fresh random (v4) UUID; `Some` is validated and rejected
    /// with [`DomainError::InvalidUuid`] when it is not UUID-shaped.
    pub fn new(value: Option<&str>) -> DomainResult<Self> {
        match value {
            Some(value) => Self::parse(value),
            None => Ok(Self::generate()),
        }
    }

    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self::from(Uuid::new_v4())
    }

    /// Validate and wrap a raw identifier.
    pub fn parse(value: &str) -> DomainResult<Self> {
        validate(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Default for UniqueEntityId {
    fn default() -> Self {
        Self::generate()
    }
}

fn validate(value: &str) -> DomainResult<()> {
    if value.len() != HYPHENATED_LEN {
        return Err(DomainError::InvalidUuid);
    }
    Uuid::try_parse(value)
        .map(|_| ())
        .map_err(|_| DomainError::InvalidUuid)
}

impl ValueObject for UniqueEntityId {}

impl core::fmt::Display for UniqueEntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UniqueEntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UniqueEntityId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl From<UniqueEntityId> for String {
    fn from(value: UniqueEntityId) -> Self {
        value.0
    }
}

impl From<Uuid> for UniqueEntityId {
    fn from(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }
}

/// Identifier argument accepted by repository lookups.
///
/// Callers may search with a raw string (possibly not even a UUID) or with the
/// wrapped identity; both compare against the stored identity's string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityIdRef<'a> {
    Raw(&'a str),
    Identity(&'a UniqueEntityId),
}

impl EntityIdRef<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            EntityIdRef::Raw(raw) => raw,
            EntityIdRef::Identity(id) => id.value(),
        }
    }
}

impl core::fmt::Display for EntityIdRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> From<&'a str> for EntityIdRef<'a> {
    fn from(value: &'a str) -> Self {
        EntityIdRef::Raw(value)
    }
}

impl<'a> From<&'a String> for EntityIdRef<'a> {
    fn from(value: &'a String) -> Self {
        EntityIdRef::Raw(value.as_str())
    }
}

impl<'a> From<&'a UniqueEntityId> for EntityIdRef<'a> {
    fn from(value: &'a UniqueEntityId) -> Self {
        EntityIdRef::Identity(value)
    }
}
