//! Repository contracts and the in-memory backends.

pub mod contracts;
pub mod in_memory;

pub use contracts::{
    DEFAULT_PER_PAGE, Repository, SearchParams, SearchProps, SearchResult, SearchableRepository,
    SortDirection,
};
pub use in_memory::{InMemoryRepository, InMemorySearchableRepository, SearchPolicy};
