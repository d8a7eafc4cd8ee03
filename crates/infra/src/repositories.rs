//! Repository wiring: picks the category backend from [`DbConfig`].

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use catalog_category::{CategoryRepository, in_memory_repository};

use crate::config::{DbConfig, DbVendor};
use crate::db::PostgresCategoryRepository;

/// Open a Postgres pool for `config.host`.
pub async fn connect_pool(config: &DbConfig) -> anyhow::Result<PgPool> {
    let host = config
        .host
        .as_deref()
        .context("DB_HOST must be set when DB_VENDOR=postgres")?;

    let mut options = PgConnectOptions::from_str(host).context("invalid DB_HOST connection URL")?;
    if !config.logging {
        options = options.disable_statement_logging();
    }

    PgPoolOptions::new()
        .connect_with(options)
        .await
        .context("failed to connect to Postgres")
}

/// Build the category repository selected by `config`.
///
/// The Postgres backend gets its schema ensured before it is handed out.
pub async fn build_category_repository(config: &DbConfig) -> anyhow::Result<Arc<dyn CategoryRepository>> {
    match config.vendor {
        DbVendor::InMemory => {
            info!(filter_mode = ?config.filter_mode, "using in-memory category repository");
            Ok(Arc::new(in_memory_repository(config.filter_mode)))
        }
        DbVendor::Postgres => {
            let pool = connect_pool(config).await?;
            let repository = PostgresCategoryRepository::new(pool).with_filter_mode(config.filter_mode);
            repository
                .ensure_schema()
                .await
                .context("failed to create categories table")?;

            info!(filter_mode = ?config.filter_mode, "using postgres category repository");
            Ok(Arc::new(repository))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_category::{Category, NewCategory};
    use catalog_core::Entity;
    use catalog_core::repository::{Repository, SearchableRepository};

    #[tokio::test]
    async fn in_memory_config_builds_a_working_repository() {
        let repository = build_category_repository(&DbConfig::in_memory()).await.unwrap();
        let category = Category::new(NewCategory::named("Movie"), None).unwrap();

        repository.insert(category.clone()).await.unwrap();
        let found = repository.find_by_id(category.id().into()).await.unwrap();
        assert_eq!(found.to_json().unwrap(), category.to_json().unwrap());
        assert_eq!(repository.sortable_fields(), &["name", "created_at"]);
    }

    #[tokio::test]
    async fn postgres_without_host_is_rejected() {
        let config = DbConfig {
            vendor: DbVendor::Postgres,
            ..DbConfig::in_memory()
        };
        let err = connect_pool(&config).await.unwrap_err();
        assert!(err.to_string().contains("DB_HOST"));
    }
}
