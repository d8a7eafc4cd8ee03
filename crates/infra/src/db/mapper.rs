//! Row <-> entity translation for categories.
//!
//! Rehydration never trusts storage: every row is re-validated with the same
//! rules the entity enforces on construction. A row that fails them surfaces as
//! [`DomainError::LoadEntity`] so callers can tell corrupt data apart from bad
//! user input.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::Row;

use catalog_category::{Category, CategoryValidator, NewCategory};
use catalog_core::validation::ValidatorFields;
use catalog_core::{DomainError, DomainResult, Entity, UniqueEntityId};

/// Raw `categories` row. Columns are optional so that corrupt rows still decode
/// and reach validation.
///
/// `id` is the identity text exactly as the entity carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryModel {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CategoryModel {
    /// Row with only an id set.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            is_active: None,
            created_at: None,
        }
    }
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CategoryModel {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CategoryModel {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Converts between [`CategoryModel`] rows and [`Category`] entities.
#[derive(Clone)]
pub struct CategoryModelMapper {
    validator: Arc<dyn ValidatorFields<JsonValue>>,
}

impl CategoryModelMapper {
    pub fn new() -> Self {
        Self::with_validator(CategoryValidator::shared())
    }

    pub fn with_validator(validator: Arc<dyn ValidatorFields<JsonValue>>) -> Self {
        Self { validator }
    }

    /// Rehydrate a row into an entity.
    ///
    /// Field failures become `LoadEntity`; any other error raised by the
    /// validator propagates as is. A stored id that is not a UUID fails with
    /// `InvalidUuid`.
    pub fn to_entity(&self, model: &CategoryModel) -> DomainResult<Category> {
        let record = serde_json::to_value(model)
            .map_err(|e| DomainError::unexpected(format!("category row serialization failed: {e}")))?;
        self.validator.validate(&record).map_err(into_load_error)?;
        let id = UniqueEntityId::parse(&model.id)?;

        Category::with_validator(
            NewCategory {
                name: model.name.clone().unwrap_or_default(),
                description: model.description.clone(),
                is_active: model.is_active,
                created_at: model.created_at,
            },
            Some(id),
            self.validator.clone(),
        )
        .map_err(into_load_error)
    }

    pub fn to_model(entity: &Category) -> DomainResult<CategoryModel> {
        Ok(CategoryModel {
            id: entity.id().to_string(),
            name: Some(entity.name().to_string()),
            description: entity.description().map(str::to_string),
            is_active: Some(entity.is_active()),
            created_at: Some(entity.created_at()),
        })
    }
}

impl Default for CategoryModelMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for CategoryModelMapper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CategoryModelMapper").finish_non_exhaustive()
    }
}

fn into_load_error(err: DomainError) -> DomainError {
    match err {
        DomainError::EntityValidation(errors) => DomainError::LoadEntity(errors),
        other => other,
    }
}
