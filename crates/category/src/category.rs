use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use catalog_core::validation::{Constraint, SchemaValidator, ValidatorFields};
use catalog_core::{DomainError, DomainResult, Entity, UniqueEntityId};

/// Maximum number of characters of a category name.
pub const NAME_MAX_LENGTH: usize = 255;

/// Sub-second digits kept on `created_at`; matches Postgres `TIMESTAMPTZ`.
const CREATED_AT_PRECISION: u16 = 6;

/// Normalized category state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProperties {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Construction input; every field but `name` may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewCategory {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl CategoryProperties {
    /// Fill in defaults: active, no description, created now.
    ///
    /// `created_at` is truncated to microseconds so every backend stores it
    /// without loss.
    pub fn normalize(input: NewCategory) -> Self {
        Self {
            name: input.name,
            description: input.description,
            is_active: input.is_active.unwrap_or(true),
            created_at: input
                .created_at
                .unwrap_or_else(Utc::now)
                .trunc_subsecs(CREATED_AT_PRECISION),
        }
    }

    /// JSON view checked by entity validators.
    pub fn to_record(&self) -> DomainResult<JsonValue> {
        serde_json::to_value(self)
            .map_err(|e| DomainError::unexpected(format!("category serialization failed: {e}")))
    }
}

/// Default structural rules of a category record.
#[derive(Debug, Clone)]
pub struct CategoryValidator {
    schema: SchemaValidator,
}

impl CategoryValidator {
    pub fn new() -> Self {
        let schema = SchemaValidator::new()
            .field(
                "name",
                &[
                    Constraint::NotEmpty,
                    Constraint::IsString,
                    Constraint::MaxLength(NAME_MAX_LENGTH),
                ],
            )
            .optional_field("description", &[Constraint::IsString])
            .optional_field("is_active", &[Constraint::IsBoolean])
            .optional_field("created_at", &[Constraint::IsDate]);
        Self { schema }
    }

    /// Shared handle, ready to be injected into entities and mappers.
    pub fn shared() -> Arc<dyn ValidatorFields<JsonValue>> {
        Arc::new(Self::new())
    }
}

impl Default for CategoryValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorFields<JsonValue> for CategoryValidator {
    fn validate(&self, data: &JsonValue) -> DomainResult<()> {
        self.schema.validate(data)
    }
}

/// Category entity.
///
/// Every state transition is validated against a candidate copy of the props
/// and committed only when it passes, so a failed mutation leaves the entity
/// untouched.
#[derive(Clone)]
pub struct Category {
    id: UniqueEntityId,
    props: CategoryProperties,
    validator: Arc<dyn ValidatorFields<JsonValue>>,
}

impl Category {
    /// Build with the default [`CategoryValidator`].
    pub fn new(input: NewCategory, id: Option<UniqueEntityId>) -> DomainResult<Self> {
        Self::with_validator(input, id, CategoryValidator::shared())
    }

    pub fn with_validator(
        input: NewCategory,
        id: Option<UniqueEntityId>,
        validator: Arc<dyn ValidatorFields<JsonValue>>,
    ) -> DomainResult<Self> {
        let props = CategoryProperties::normalize(input);
        validator.validate(&props.to_record()?)?;

        Ok(Self {
            id: id.unwrap_or_default(),
            props,
            validator,
        })
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn description(&self) -> Option<&str> {
        self.props.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.props.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.props.created_at
    }

    /// Rename and replace the description (`None` clears it).
    pub fn update(&mut self, name: impl Into<String>, description: Option<String>) -> DomainResult<()> {
        let mut candidate = self.props.clone();
        candidate.name = name.into();
        candidate.description = description;
        self.commit(candidate)
    }

    pub fn activate(&mut self) -> DomainResult<()> {
        self.set_active(true)
    }

    pub fn deactivate(&mut self) -> DomainResult<()> {
        self.set_active(false)
    }

    fn set_active(&mut self, is_active: bool) -> DomainResult<()> {
        let mut candidate = self.props.clone();
        candidate.is_active = is_active;
        self.commit(candidate)
    }

    fn commit(&mut self, candidate: CategoryProperties) -> DomainResult<()> {
        self.validator.validate(&candidate.to_record()?)?;
        self.props = candidate;
        Ok(())
    }
}

impl Entity for Category {
    type Props = CategoryProperties;

    fn unique_entity_id(&self) -> &UniqueEntityId {
        &self.id
    }

    fn props(&self) -> &CategoryProperties {
        &self.props
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl core::fmt::Debug for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Category")
            .field("id", &self.id)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}
