//! Postgres category repository tests.
//!
//! Run against a live database: set `DATABASE_URL`. Without it every test
//! returns early. Each test tags its rows with a unique name token and filters
//! on it, so tests can share the table and run in parallel.

use catalog_category::{
    Category, CategoryIdInput, CategoryOutput, CreateCategory, CreateCategoryInput, FilterMode, GetCategory,
    NewCategory, UpdateCategory, UpdateCategoryInput, UseCase,
};
use catalog_core::repository::{Repository, SearchParams, SearchProps, SearchableRepository};
use catalog_core::{DomainError, Entity, UniqueEntityId};
use catalog_infra::PostgresCategoryRepository;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

async fn repository() -> Option<PostgresCategoryRepository> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let _ = catalog_observability::init_with_filter("catalog_infra=debug");
    let pool = PgPool::connect(&url).await.expect("failed to connect to DATABASE_URL");
    let repository = PostgresCategoryRepository::new(pool);

    // Parallel tests may race on CREATE TABLE; the second attempt sees the table.
    if repository.ensure_schema().await.is_err() {
        repository.ensure_schema().await.expect("failed to create categories table");
    }
    Some(repository)
}

fn token() -> String {
    format!("tag{}", Uuid::new_v4().simple())
}

fn category(name: &str) -> Category {
    Category::new(NewCategory::named(name), None).unwrap()
}

fn filtered(filter: &str) -> SearchProps {
    SearchProps {
        filter: Some(filter.to_string()),
        sort: Some("name".to_string()),
        ..SearchProps::default()
    }
}

#[tokio::test]
async fn inserts_and_finds_by_raw_id_and_identity() {
    let Some(repository) = repository().await else {
        return;
    };
    let entity = category(&format!("movie {}", token()));
    repository.insert(entity.clone()).await.unwrap();

    let found = repository.find_by_id(entity.id().into()).await.unwrap();
    assert_eq!(found.to_json().unwrap(), entity.to_json().unwrap());

    let found = repository.find_by_id(entity.unique_entity_id().into()).await.unwrap();
    assert_eq!(found.to_json().unwrap(), entity.to_json().unwrap());
}

#[tokio::test]
async fn identity_text_is_kept_and_matched_exactly() {
    let Some(repository) = repository().await else {
        return;
    };
    let upper = Uuid::new_v4().hyphenated().to_string().to_uppercase();
    let id = UniqueEntityId::parse(&upper).unwrap();
    let entity = Category::new(NewCategory::named(format!("movie {}", token())), Some(id)).unwrap();
    repository.insert(entity.clone()).await.unwrap();

    let found = repository.find_by_id(upper.as_str().into()).await.unwrap();
    assert_eq!(found.id(), upper);
    assert_eq!(found.to_json().unwrap(), entity.to_json().unwrap());

    let lower = upper.to_lowercase();
    let err = repository.find_by_id(lower.as_str().into()).await.unwrap_err();
    assert_eq!(err, DomainError::not_found(&lower));

    let simple = upper.replace('-', "");
    let err = repository.find_by_id(simple.as_str().into()).await.unwrap_err();
    assert_eq!(err, DomainError::not_found(&simple));
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let Some(repository) = repository().await else {
        return;
    };

    let err = repository.find_by_id("fake id".into()).await.unwrap_err();
    assert_eq!(err, DomainError::not_found("fake id"));

    let id = UniqueEntityId::generate();
    let err = repository.find_by_id((&id).into()).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Entity not found using ID {id}"));

    let err = repository.delete((&id).into()).await.unwrap_err();
    assert_eq!(err, DomainError::not_found(&id));

    let err = repository.update(category("ghost")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn find_all_keeps_insertion_order() {
    let Some(repository) = repository().await else {
        return;
    };
    let tag = token();
    let first = category(&format!("b {tag}"));
    let second = category(&format!("a {tag}"));
    repository.insert(first.clone()).await.unwrap();
    repository.insert(second.clone()).await.unwrap();

    let all = repository.find_all().await.unwrap();
    let positions: Vec<usize> = [&first, &second]
        .iter()
        .map(|c| all.iter().position(|x| x == *c).unwrap())
        .collect();
    assert!(positions[0] < positions[1]);
}

#[tokio::test]
async fn updates_and_deletes() {
    let Some(repository) = repository().await else {
        return;
    };
    let mut entity = category(&format!("movie {}", token()));
    repository.insert(entity.clone()).await.unwrap();

    entity.update("documentary", Some("some description".to_string())).unwrap();
    entity.deactivate().unwrap();
    repository.update(entity.clone()).await.unwrap();

    let found = repository.find_by_id(entity.id().into()).await.unwrap();
    assert_eq!(found.name(), "documentary");
    assert_eq!(found.description(), Some("some description"));
    assert!(!found.is_active());

    repository.delete(entity.id().into()).await.unwrap();
    let err = repository.find_by_id(entity.id().into()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn search_filters_sorts_and_paginates() {
    let Some(repository) = repository().await else {
        return;
    };
    let tag = token();
    let names = ["c", "a", "d", "b"];
    for name in names {
        repository.insert(category(&format!("{name} {tag}"))).await.unwrap();
    }

    let page = repository
        .search(SearchParams::new(SearchProps {
            page: Some(2),
            per_page: Some(2),
            ..filtered(&tag.to_uppercase())
        }))
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(page.last_page, 2);
    let names: Vec<&str> = page.items.iter().map(Category::name).collect();
    assert_eq!(names, vec![format!("c {tag}"), format!("d {tag}")]);

    let sensitive = repository.clone().with_filter_mode(FilterMode::CaseSensitive);
    let page = sensitive
        .search(SearchParams::new(filtered(&tag.to_uppercase())))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(sensitive.sortable_fields(), &["name", "created_at"]);
}

#[tokio::test]
async fn use_cases_run_against_postgres() {
    let Some(repository) = repository().await else {
        return;
    };
    let repository = Arc::new(repository);
    let name = format!("movie {}", token());

    let created = CreateCategory::new(repository.clone())
        .execute(CreateCategoryInput {
            name: name.clone(),
            ..CreateCategoryInput::default()
        })
        .await
        .unwrap();

    let updated = UpdateCategory::new(repository.clone())
        .execute(UpdateCategoryInput {
            id: created.id.clone(),
            name: name.clone(),
            description: Some("some description".to_string()),
            is_active: Some(false),
        })
        .await
        .unwrap();

    assert_eq!(
        updated,
        CategoryOutput {
            description: Some("some description".to_string()),
            is_active: false,
            ..created.clone()
        }
    );

    let fetched = GetCategory::new(repository.clone())
        .execute(CategoryIdInput { id: created.id.clone() })
        .await
        .unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn created_output_matches_what_is_read_back() {
    let Some(repository) = repository().await else {
        return;
    };
    let repository = Arc::new(repository);

    let created = CreateCategory::new(repository.clone())
        .execute(CreateCategoryInput {
            name: format!("movie {}", token()),
            ..CreateCategoryInput::default()
        })
        .await
        .unwrap();

    let fetched = GetCategory::new(repository.clone())
        .execute(CategoryIdInput { id: created.id.clone() })
        .await
        .unwrap();
    assert_eq!(fetched, created);
}
