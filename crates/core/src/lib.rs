//! `catalog-core`: shared domain building blocks.
//!
//! Identity, entities, validation and the repository contracts. No
//! infrastructure concerns live here.

pub mod entity;
pub mod error;
pub mod id;
pub mod repository;
pub mod validation;
pub mod value_object;

pub use entity::{BaseEntity, Entity};
pub use error::{DomainError, DomainResult, FieldErrors};
pub use id::{EntityIdRef, UniqueEntityId};
pub use value_object::ValueObject;
