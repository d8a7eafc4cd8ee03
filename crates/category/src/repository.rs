use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use catalog_core::repository::{InMemorySearchableRepository, SearchPolicy, SearchableRepository, SortDirection};

use crate::category::Category;

/// Sort keys accepted by every category backend.
pub const SORTABLE_FIELDS: &[&str] = &["name", "created_at"];

/// Persistence port for categories.
pub trait CategoryRepository: SearchableRepository<Category> {}

impl<R> CategoryRepository for R where R: SearchableRepository<Category> + ?Sized {}

/// How a search filter is matched against the category name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

impl FilterMode {
    pub fn matches(&self, haystack: &str, needle: &str) -> bool {
        match self {
            FilterMode::CaseInsensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
            FilterMode::CaseSensitive => haystack.contains(needle),
        }
    }
}

/// Filter on name, sort on `name`/`created_at`, newest first by default.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CategorySearchPolicy {
    filter_mode: FilterMode,
}

impl CategorySearchPolicy {
    pub fn new(filter_mode: FilterMode) -> Self {
        Self { filter_mode }
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }
}

impl SearchPolicy<Category> for CategorySearchPolicy {
    fn sortable_fields(&self) -> &[&'static str] {
        SORTABLE_FIELDS
    }

    fn matches(&self, entity: &Category, filter: &str) -> bool {
        self.filter_mode.matches(entity.name(), filter)
    }

    fn compare(&self, a: &Category, b: &Category, field: &str) -> Ordering {
        match field {
            "name" => a.name().cmp(b.name()),
            "created_at" => a.created_at().cmp(&b.created_at()),
            _ => Ordering::Equal,
        }
    }

    fn default_sort(&self) -> Option<(&'static str, SortDirection)> {
        Some(("created_at", SortDirection::Desc))
    }
}

/// In-memory category store.
pub type CategoryInMemoryRepository = InMemorySearchableRepository<Category, CategorySearchPolicy>;

/// Empty in-memory store with the given filter behavior.
pub fn in_memory_repository(filter_mode: FilterMode) -> CategoryInMemoryRepository {
    InMemorySearchableRepository::new(CategorySearchPolicy::new(filter_mode))
}
