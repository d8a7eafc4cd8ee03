//! Postgres-backed category repository.
//!
//! Lookup, filtering, sorting and pagination all run in SQL. Rows come back
//! through [`CategoryModelMapper`], so a corrupt row fails with `LoadEntity`
//! instead of producing an invalid entity.
//!
//! ## Ordering
//!
//! The table carries a `seq BIGSERIAL` column. It is never exposed on the entity
//! but gives `find_all` the insertion order and breaks ties in `search` the same
//! way the in-memory stable sort does.
//!
//! ## Identity
//!
//! `id` is stored as text and matched exactly, so lookups agree with the
//! in-memory scan: the identity comes back in the form it was inserted with,
//! and an argument that is not that exact text is not found.

use std::sync::Arc;

use sqlx::{PgPool, Row};
use tracing::{Span, field, instrument};

use catalog_category::{Category, FilterMode, SORTABLE_FIELDS};
use catalog_core::repository::{
    Repository, SearchParams, SearchResult, SearchableRepository, SortDirection,
};
use catalog_core::{DomainError, DomainResult, Entity, EntityIdRef};

use super::mapper::{CategoryModel, CategoryModelMapper};

const SELECT_COLUMNS: &str = "id, name, description, is_active, created_at";

#[derive(Debug, Clone)]
pub struct PostgresCategoryRepository {
    pool: Arc<PgPool>,
    mapper: CategoryModelMapper,
    filter_mode: FilterMode,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            mapper: CategoryModelMapper::new(),
            filter_mode: FilterMode::default(),
        }
    }

    pub fn with_mapper(mut self, mapper: CategoryModelMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `categories` table when it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                seq BIGSERIAL NOT NULL,
                id VARCHAR(36) PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description TEXT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    fn to_entities(&self, rows: Vec<CategoryModel>) -> DomainResult<Vec<Category>> {
        rows.iter().map(|row| self.mapper.to_entity(row)).collect()
    }

    fn filter_operator(&self) -> &'static str {
        match self.filter_mode {
            FilterMode::CaseInsensitive => "ILIKE",
            FilterMode::CaseSensitive => "LIKE",
        }
    }
}

/// `%filter%` with LIKE wildcards escaped.
fn like_pattern(filter: &str) -> String {
    let escaped = filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// ORDER BY clause for the requested sort, restricted to sortable columns.
fn order_clause(params: &SearchParams) -> String {
    match params.sort() {
        Some(sort) => match SORTABLE_FIELDS.iter().find(|f| **f == sort) {
            Some(column) => {
                let dir = params.sort_dir().unwrap_or(SortDirection::Asc);
                format!("{column} {}, seq ASC", dir.as_str().to_uppercase())
            }
            None => "seq ASC".to_string(),
        },
        None => "created_at DESC, seq ASC".to_string(),
    }
}

#[async_trait::async_trait]
impl Repository<Category> for PostgresCategoryRepository {
    #[instrument(skip(self, entity), fields(id = %entity.id(), operation = field::Empty), err)]
    async fn insert(&self, entity: Category) -> DomainResult<()> {
        Span::current().record("operation", "insert_category");
        let model = CategoryModelMapper::to_model(&entity)?;

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(model.id)
        .bind(model.name)
        .bind(model.description)
        .bind(model.is_active)
        .bind(model.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_category", e))?;

        Ok(())
    }

    #[instrument(skip(self, id), fields(id = %id, operation = field::Empty), err)]
    async fn find_by_id(&self, id: EntityIdRef<'_>) -> DomainResult<Category> {
        Span::current().record("operation", "find_category");

        let row = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_category", e))?;

        match row {
            Some(row) => self.mapper.to_entity(&row),
            None => Err(DomainError::not_found(id)),
        }
    }

    #[instrument(skip(self), fields(operation = field::Empty, count = field::Empty), err)]
    async fn find_all(&self) -> DomainResult<Vec<Category>> {
        let span = Span::current();
        span.record("operation", "list_categories");

        let rows = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM categories ORDER BY seq ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_categories", e))?;

        span.record("count", rows.len());
        self.to_entities(rows)
    }

    #[instrument(skip(self, entity), fields(id = %entity.id(), operation = field::Empty), err)]
    async fn update(&self, entity: Category) -> DomainResult<()> {
        Span::current().record("operation", "update_category");
        let model = CategoryModelMapper::to_model(&entity)?;

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3, is_active = $4, created_at = $5
            WHERE id = $1
            "#,
        )
        .bind(model.id)
        .bind(model.name)
        .bind(model.description)
        .bind(model.is_active)
        .bind(model.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_category", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(entity.id()));
        }
        Ok(())
    }

    #[instrument(skip(self, id), fields(id = %id, operation = field::Empty), err)]
    async fn delete(&self, id: EntityIdRef<'_>) -> DomainResult<()> {
        Span::current().record("operation", "delete_category");

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_category", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(id));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SearchableRepository<Category> for PostgresCategoryRepository {
    fn sortable_fields(&self) -> &[&'static str] {
        SORTABLE_FIELDS
    }

    #[instrument(
        skip(self, params),
        fields(
            page = params.page(),
            per_page = params.per_page(),
            operation = field::Empty,
            total = field::Empty
        ),
        err
    )]
    async fn search(&self, params: SearchParams) -> DomainResult<SearchResult<Category>> {
        let span = Span::current();
        span.record("operation", "search_categories");

        let pattern = params.filter().map(like_pattern);
        let where_clause = format!("($1::text IS NULL OR name {} $1)", self.filter_operator());

        let count_row = sqlx::query(&format!(
            "SELECT COUNT(*) AS total FROM categories WHERE {where_clause}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_categories", e))?;

        let total: i64 = count_row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count_categories", e))?;

        let rows = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM categories WHERE {where_clause} ORDER BY {} LIMIT $2 OFFSET $3",
            order_clause(&params)
        ))
        .bind(pattern.as_deref())
        .bind(i64::from(params.per_page()))
        .bind(params.offset() as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_categories", e))?;

        span.record("total", total);
        let items = self.to_entities(rows)?;
        Ok(SearchResult::new(items, total.max(0) as u64, &params))
    }
}

/// Map SQLx errors to `DomainError::Storage`, keeping the failing operation.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => DomainError::storage(format!("duplicate key: {msg}")),
                Some("23503") | Some("23514") => {
                    DomainError::storage(format!("constraint violation: {msg}"))
                }
                _ => DomainError::storage(msg),
            }
        }
        sqlx::Error::PoolClosed => DomainError::storage(format!("connection pool closed in {operation}")),
        sqlx::Error::RowNotFound => DomainError::storage(format!("unexpected row not found in {operation}")),
        other => DomainError::storage(format!("sqlx error in {operation}: {other}")),
    }
}
