use std::cmp::Ordering;
use std::sync::RwLock;

use tracing::debug;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::EntityIdRef;

use super::contracts::{Repository, SearchParams, SearchResult, SearchableRepository, SortDirection};

/// In-memory repository over an ordered collection.
///
/// Intended for tests/dev. Lookups are linear scans; insertion order is what
/// `find_all` returns.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    items: RwLock<Vec<E>>,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn len(&self) -> DomainResult<usize> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        self.len().map(|len| len == 0)
    }
}

impl<E: Clone> InMemoryRepository<E> {
    /// Snapshot of the stored entities, in order.
    pub fn items(&self) -> DomainResult<Vec<E>> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.clone())
    }

    /// Swap the whole backing collection (seeding fixtures).
    pub fn replace_items(&self, items: Vec<E>) -> DomainResult<()> {
        let mut guard = self.items.write().map_err(|_| lock_poisoned())?;
        *guard = items;
        Ok(())
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_poisoned() -> DomainError {
    DomainError::storage("lock poisoned")
}

fn position_of<E: Entity>(items: &[E], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

#[async_trait::async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn insert(&self, entity: E) -> DomainResult<()> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        debug!(id = entity.id(), "inserting entity");
        items.push(entity);
        Ok(())
    }

    async fn find_by_id(&self, id: EntityIdRef<'_>) -> DomainResult<E> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        position_of(&items, id.as_str())
            .map(|idx| items[idx].clone())
            .ok_or_else(|| DomainError::not_found(id))
    }

    async fn find_all(&self) -> DomainResult<Vec<E>> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.clone())
    }

    async fn update(&self, entity: E) -> DomainResult<()> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let idx = position_of(&items, entity.id()).ok_or_else(|| DomainError::not_found(entity.id()))?;
        debug!(id = entity.id(), position = idx, "replacing entity");
        items[idx] = entity;
        Ok(())
    }

    async fn delete(&self, id: EntityIdRef<'_>) -> DomainResult<()> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let idx = position_of(&items, id.as_str()).ok_or_else(|| DomainError::not_found(id))?;
        debug!(id = id.as_str(), position = idx, "removing entity");
        items.remove(idx);
        Ok(())
    }
}

/// Entity-specific search behavior for [`InMemorySearchableRepository`].
pub trait SearchPolicy<E>: Send + Sync + 'static {
    /// Fields accepted as sort keys.
    fn sortable_fields(&self) -> &[&'static str];

    /// Whether `entity` matches a (non-empty) filter.
    fn matches(&self, entity: &E, filter: &str) -> bool;

    /// Ascending comparison on one of the sortable fields.
    fn compare(&self, a: &E, b: &E, field: &str) -> Ordering;

    /// Ordering used when the caller asks for none.
    fn default_sort(&self) -> Option<(&'static str, SortDirection)> {
        None
    }
}

/// In-memory repository with filter/sort/paginate search.
#[derive(Debug)]
pub struct InMemorySearchableRepository<E, P> {
    inner: InMemoryRepository<E>,
    policy: P,
}

impl<E, P> InMemorySearchableRepository<E, P> {
    pub fn new(policy: P) -> Self {
        Self {
            inner: InMemoryRepository::new(),
            policy,
        }
    }

    pub fn with_items(policy: P, items: Vec<E>) -> Self {
        Self {
            inner: InMemoryRepository::with_items(items),
            policy,
        }
    }

    pub fn inner(&self) -> &InMemoryRepository<E> {
        &self.inner
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<E: Entity, P: SearchPolicy<E>> InMemorySearchableRepository<E, P> {
    fn apply_filter(&self, items: Vec<E>, filter: Option<&str>) -> Vec<E> {
        match filter {
            Some(filter) => items
                .into_iter()
                .filter(|item| self.policy.matches(item, filter))
                .collect(),
            None => items,
        }
    }

    fn apply_sort(&self, mut items: Vec<E>, sort: Option<&str>, dir: Option<SortDirection>) -> Vec<E> {
        let (field, dir) = match sort {
            Some(field) => match self.policy.sortable_fields().iter().find(|f| **f == field) {
                Some(field) => (*field, dir.unwrap_or(SortDirection::Asc)),
                None => return items,
            },
            None => match self.policy.default_sort() {
                Some(default) => default,
                None => return items,
            },
        };

        // `sort_by` is stable: ties keep insertion order in both directions.
        items.sort_by(|a, b| {
            let ordering = self.policy.compare(a, b, field);
            match dir {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        items
    }

    fn apply_paginate(&self, items: Vec<E>, params: &SearchParams) -> Vec<E> {
        items
            .into_iter()
            .skip(params.offset())
            .take(params.per_page() as usize)
            .collect()
    }
}

#[async_trait::async_trait]
impl<E: Entity, P: SearchPolicy<E>> Repository<E> for InMemorySearchableRepository<E, P> {
    async fn insert(&self, entity: E) -> DomainResult<()> {
        self.inner.insert(entity).await
    }

    async fn find_by_id(&self, id: EntityIdRef<'_>) -> DomainResult<E> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<E>> {
        self.inner.find_all().await
    }

    async fn update(&self, entity: E) -> DomainResult<()> {
        self.inner.update(entity).await
    }

    async fn delete(&self, id: EntityIdRef<'_>) -> DomainResult<()> {
        self.inner.delete(id).await
    }
}

#[async_trait::async_trait]
impl<E: Entity, P: SearchPolicy<E>> SearchableRepository<E> for InMemorySearchableRepository<E, P> {
    fn sortable_fields(&self) -> &[&'static str] {
        self.policy.sortable_fields()
    }

    async fn search(&self, params: SearchParams) -> DomainResult<SearchResult<E>> {
        let items = self.inner.find_all().await?;
        let filtered = self.apply_filter(items, params.filter());
        let total = filtered.len() as u64;
        let sorted = self.apply_sort(filtered, params.sort(), params.sort_dir());
        let page = self.apply_paginate(sorted, &params);

        debug!(
            total,
            page = params.page(),
            per_page = params.per_page(),
            "in-memory search"
        );
        Ok(SearchResult::new(page, total, &params))
    }
}
