//! Persistence backends
//!
//! A backend owns the rows of every table it serves. `GenericStore` drives it
//! through these traits and layers the lifecycle hooks on top.

pub mod memory;
pub mod postgres;

use crate::query_builder::{QueryBuilder, UpdateSet};
use crate::traits::TableMetadata;
use crate::StoreError;
use async_trait::async_trait;

pub use memory::MemoryBackend;
pub use postgres::PgBackend;

/// Writes a subset of a record's columns
#[async_trait]
pub trait PartialUpdate<T: TableMetadata>: Send + Sync {
    /// Persist only the columns named in `changes` on the row of `record`
    ///
    /// Returns the row as stored after the write, or `None` if no row matched.
    async fn update_columns(
        &self,
        record: &T,
        changes: &UpdateSet,
    ) -> Result<Option<T>, StoreError>;
}

/// Full row storage for one entity type
#[async_trait]
pub trait Backend<T: TableMetadata>: PartialUpdate<T> {
    /// Insert a row and return it as stored
    async fn insert(&self, record: &T) -> Result<T, StoreError>;

    /// Rows matching the query, exactly as given (no hooks applied)
    async fn select(&self, query: &QueryBuilder) -> Result<Vec<T>, StoreError>;

    /// Number of rows matching the query's conditions
    async fn count(&self, query: &QueryBuilder) -> Result<i64, StoreError>;

    /// Physically remove a row
    async fn delete_row(&self, id: &T::Id) -> Result<bool, StoreError>;
}
