//! Category catalog domain.
//!
//! The category entity with its validation rules, the category repository port
//! with its in-memory backend, and the application use cases built on them.

pub mod category;
pub mod repository;
pub mod use_cases;

pub use category::{Category, CategoryProperties, CategoryValidator, NAME_MAX_LENGTH, NewCategory};
pub use repository::{
    CategoryInMemoryRepository, CategoryRepository, CategorySearchPolicy, FilterMode, SORTABLE_FIELDS,
    in_memory_repository,
};
pub use use_cases::{
    CategoryIdInput, CategoryOutput, CreateCategory, CreateCategoryInput, DeleteCategory, GetCategory,
    ListCategories, ListCategoriesOutput, UpdateCategory, UpdateCategoryInput, UseCase,
};
