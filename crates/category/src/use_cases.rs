//! Category application layer.
//!
//! Each use case owns a repository handle and runs one operation end to end:
//!
//! ```text
//! Input
//!   ↓
//! 1. Load (or build) the entity through the repository
//!   ↓
//! 2. Apply entity mutators (validated)
//!   ↓
//! 3. Persist
//!   ↓
//! CategoryOutput
//! ```
//!
//! Use cases are generic over [`CategoryRepository`], so the same code runs on
//! the in-memory store in tests and on Postgres in production.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_core::repository::{Repository, SearchParams, SearchProps, SearchResult, SearchableRepository};
use catalog_core::{DomainResult, Entity};

use crate::category::{Category, NewCategory};
use crate::repository::CategoryRepository;

/// One application operation.
#[async_trait::async_trait]
pub trait UseCase<I, O>: Send + Sync {
    async fn execute(&self, input: I) -> DomainResult<O>;
}

/// Category as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOutput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_string(),
            description: category.description().map(str::to_string),
            is_active: category.is_active(),
            created_at: category.created_at(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIdInput {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategoryInput {
    pub id: String,
    pub name: String,
    /// Omitted means cleared.
    #[serde(default)]
    pub description: Option<String>,
    /// Omitted means unchanged.
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub type ListCategoriesOutput = SearchResult<CategoryOutput>;

pub struct CreateCategory<R> {
    repository: R,
}

impl<R: CategoryRepository> CreateCategory<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl<R: CategoryRepository> UseCase<CreateCategoryInput, CategoryOutput> for CreateCategory<R> {
    async fn execute(&self, input: CreateCategoryInput) -> DomainResult<CategoryOutput> {
        let category = Category::new(
            NewCategory {
                name: input.name,
                description: input.description,
                is_active: input.is_active,
                created_at: None,
            },
            None,
        )?;
        let output = CategoryOutput::from(&category);
        self.repository.insert(category).await?;

        info!(id = %output.id, "category created");
        Ok(output)
    }
}

pub struct GetCategory<R> {
    repository: R,
}

impl<R: CategoryRepository> GetCategory<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl<R: CategoryRepository> UseCase<CategoryIdInput, CategoryOutput> for GetCategory<R> {
    async fn execute(&self, input: CategoryIdInput) -> DomainResult<CategoryOutput> {
        let category = self.repository.find_by_id(input.id.as_str().into()).await?;
        Ok(CategoryOutput::from(&category))
    }
}

pub struct ListCategories<R> {
    repository: R,
}

impl<R: CategoryRepository> ListCategories<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl<R: CategoryRepository> UseCase<SearchProps, ListCategoriesOutput> for ListCategories<R> {
    async fn execute(&self, input: SearchProps) -> DomainResult<ListCategoriesOutput> {
        let result = self.repository.search(SearchParams::new(input)).await?;
        Ok(result.map_items(|category| CategoryOutput::from(&category)))
    }
}

pub struct UpdateCategory<R> {
    repository: R,
}

impl<R: CategoryRepository> UpdateCategory<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl<R: CategoryRepository> UseCase<UpdateCategoryInput, CategoryOutput> for UpdateCategory<R> {
    async fn execute(&self, input: UpdateCategoryInput) -> DomainResult<CategoryOutput> {
        let mut category = self.repository.find_by_id(input.id.as_str().into()).await?;

        category.update(input.name, input.description)?;
        match input.is_active {
            Some(true) => category.activate()?,
            Some(false) => category.deactivate()?,
            None => {}
        }

        let output = CategoryOutput::from(&category);
        self.repository.update(category).await?;

        info!(id = %output.id, "category updated");
        Ok(output)
    }
}

pub struct DeleteCategory<R> {
    repository: R,
}

impl<R: CategoryRepository> DeleteCategory<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl<R: CategoryRepository> UseCase<CategoryIdInput, ()> for DeleteCategory<R> {
    async fn execute(&self, input: CategoryIdInput) -> DomainResult<()> {
        let category = self.repository.find_by_id(input.id.as_str().into()).await?;
        self.repository.delete(category.unique_entity_id().into()).await?;

        info!(id = %input.id, "category deleted");
        Ok(())
    }
}
