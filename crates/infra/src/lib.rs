//! Infrastructure layer: configuration, Postgres adapters and repository wiring.

pub mod config;
pub mod db;
pub mod repositories;

pub use config::{DbConfig, DbVendor};
pub use db::{CategoryModel, CategoryModelMapper, PostgresCategoryRepository};
pub use repositories::{build_category_repository, connect_pool};
