use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::entity::Entity;
use crate::error::DomainResult;
use crate::id::EntityIdRef;

/// Page size used when the caller supplies none (or an invalid one).
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Persistence boundary for one entity type.
///
/// Every operation is async so in-memory and database backends are
/// interchangeable at the call site, even though the in-memory backend never
/// actually suspends.
///
/// ## Not-Found semantics
///
/// `find_by_id`, `update` and `delete` fail with `DomainError::NotFound` carrying
/// the identifier exactly as the caller supplied it, whatever the backend.
#[async_trait::async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Append an entity. No uniqueness check beyond identity is performed.
    async fn insert(&self, entity: E) -> DomainResult<()>;

    /// Look up by raw identifier or wrapped identity.
    async fn find_by_id(&self, id: EntityIdRef<'_>) -> DomainResult<E>;

    /// All entities, in insertion order.
    async fn find_all(&self) -> DomainResult<Vec<E>>;

    /// Replace the stored entity sharing `entity`'s identity.
    async fn update(&self, entity: E) -> DomainResult<()>;

    async fn delete(&self, id: EntityIdRef<'_>) -> DomainResult<()>;
}

#[async_trait::async_trait]
impl<E, R> Repository<E> for Arc<R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    async fn insert(&self, entity: E) -> DomainResult<()> {
        (**self).insert(entity).await
    }

    async fn find_by_id(&self, id: EntityIdRef<'_>) -> DomainResult<E> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<E>> {
        (**self).find_all().await
    }

    async fn update(&self, entity: E) -> DomainResult<()> {
        (**self).update(entity).await
    }

    async fn delete(&self, id: EntityIdRef<'_>) -> DomainResult<()> {
        (**self).delete(id).await
    }
}

/// Repository with paginated, sortable, filterable search.
#[async_trait::async_trait]
pub trait SearchableRepository<E: Entity>: Repository<E> {
    /// Fields accepted as `sort`; any other sort field is ignored.
    fn sortable_fields(&self) -> &[&'static str];

    /// Filter, then sort (stable), then slice one page.
    async fn search(&self, params: SearchParams) -> DomainResult<SearchResult<E>>;
}

#[async_trait::async_trait]
impl<E, R> SearchableRepository<E> for Arc<R>
where
    E: Entity,
    R: SearchableRepository<E> + ?Sized,
{
    fn sortable_fields(&self) -> &[&'static str] {
        (**self).sortable_fields()
    }

    async fn search(&self, params: SearchParams) -> DomainResult<SearchResult<E>> {
        (**self).search(params).await
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Lenient parse: anything other than `desc` (any case) is ascending.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl core::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, unvalidated search input (e.g. straight from a query string).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProps {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub filter: Option<String>,
}

/// Normalized search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    page: u32,
    per_page: u32,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<String>,
}

impl SearchParams {
    /// Normalize raw input:
    /// - page below 1 (or absent) becomes 1
    /// - per_page below 1 (or absent) becomes [`DEFAULT_PER_PAGE`]
    /// - blank sort/filter become `None`
    /// - direction only exists alongside a sort field and defaults to ascending
    pub fn new(props: SearchProps) -> Self {
        let page = props
            .page
            .filter(|p| *p >= 1)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1);
        let per_page = props
            .per_page
            .filter(|p| *p >= 1)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(DEFAULT_PER_PAGE);
        let sort = props.sort.filter(|s| !s.trim().is_empty());
        let sort_dir = sort.as_ref().map(|_| {
            props
                .sort_dir
                .as_deref()
                .map(SortDirection::parse_lenient)
                .unwrap_or(SortDirection::Asc)
        });
        let filter = props.filter.filter(|f| !f.is_empty());

        Self {
            page,
            per_page,
            sort,
            sort_dir,
            filter,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Zero-based index of the first item of the requested page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(SearchProps::default())
    }
}

/// One page of search results plus the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<E> {
    pub items: Vec<E>,
    pub total: u64,
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
    pub sort: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub filter: Option<String>,
}

impl<E> SearchResult<E> {
    pub fn new(items: Vec<E>, total: u64, params: &SearchParams) -> Self {
        let per_page = params.per_page();
        let last_page = total.div_ceil(u64::from(per_page));

        Self {
            items,
            total,
            current_page: params.page(),
            per_page,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            sort: params.sort().map(str::to_string),
            sort_dir: params.sort_dir(),
            filter: params.filter().map(str::to_string),
        }
    }

    /// Convert the items while keeping the paging metadata.
    pub fn map_items<U>(self, f: impl FnMut(E) -> U) -> SearchResult<U> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
            sort: self.sort,
            sort_dir: self.sort_dir,
            filter: self.filter,
        }
    }
}

impl<E: Entity> SearchResult<E> {
    /// Flat JSON rendering with every item serialized as `{ id, ...props }`.
    pub fn to_json(&self) -> DomainResult<JsonValue> {
        let items = self
            .items
            .iter()
            .map(Entity::to_json)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(serde_json::json!({
            "items": items,
            "total": self.total,
            "current_page": self.current_page,
            "per_page": self.per_page,
            "last_page": self.last_page,
            "sort": self.sort,
            "sort_dir": self.sort_dir,
            "filter": self.filter,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> SearchProps {
        SearchProps::default()
    }

    #[test]
    fn page_defaults_and_invalid_values() {
        assert_eq!(SearchParams::new(props()).page(), 1);
        for page in [0, -1, -100] {
            let params = SearchParams::new(SearchProps {
                page: Some(page),
                ..props()
            });
            assert_eq!(params.page(), 1, "page {page}");
        }
        let params = SearchParams::new(SearchProps {
            page: Some(3),
            ..props()
        });
        assert_eq!(params.page(), 3);
    }

    #[test]
    fn per_page_defaults_and_invalid_values() {
        assert_eq!(SearchParams::new(props()).per_page(), DEFAULT_PER_PAGE);
        let params = SearchParams::new(SearchProps {
            per_page: Some(0),
            ..props()
        });
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
        let params = SearchParams::new(SearchProps {
            per_page: Some(2),
            ..props()
        });
        assert_eq!(params.per_page(), 2);
    }

    #[test]
    fn sort_direction_requires_sort_field() {
        let params = SearchParams::new(SearchProps {
            sort_dir: Some("desc".to_string()),
            ..props()
        });
        assert_eq!(params.sort(), None);
        assert_eq!(params.sort_dir(), None);

        let params = SearchParams::new(SearchProps {
            sort: Some("name".to_string()),
            ..props()
        });
        assert_eq!(params.sort_dir(), Some(SortDirection::Asc));

        let params = SearchParams::new(SearchProps {
            sort: Some("name".to_string()),
            sort_dir: Some("DESC".to_string()),
            ..props()
        });
        assert_eq!(params.sort_dir(), Some(SortDirection::Desc));

        let params = SearchParams::new(SearchProps {
            sort: Some("  ".to_string()),
            ..props()
        });
        assert_eq!(params.sort(), None);
    }

    #[test]
    fn empty_filter_is_dropped() {
        let params = SearchParams::new(SearchProps {
            filter: Some(String::new()),
            ..props()
        });
        assert_eq!(params.filter(), None);
    }

    #[test]
    fn result_computes_last_page() {
        let params = SearchParams::new(SearchProps {
            per_page: Some(2),
            ..props()
        });
        let result = SearchResult::new(vec![1, 2], 5, &params);
        assert_eq!(result.last_page, 3);
        assert_eq!(result.current_page, 1);

        let result = SearchResult::<u8>::new(vec![], 0, &params);
        assert_eq!(result.last_page, 0);

        let mapped = SearchResult::new(vec![1, 2], 4, &params).map_items(|i| i * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.last_page, 2);
    }
}
