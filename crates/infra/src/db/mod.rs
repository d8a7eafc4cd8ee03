//! Database adapters: row mapping and the Postgres repository.

pub mod mapper;
pub mod postgres;

pub use mapper::{CategoryModel, CategoryModelMapper};
pub use postgres::PostgresCategoryRepository;
