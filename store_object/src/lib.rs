//! Store Object - core data layer for SoftHaus
//!
//! This crate provides the stores, backends, query builders and lifecycle
//! hooks, plus the soft-delete policy that plugs into them.

/// SQL tracing, compiled in only with the `debug-logging` feature
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod backend;
pub mod errors;
pub mod generic_store;
pub mod prelude;
pub mod query_builder;
pub mod soft_delete;
pub mod traits;
pub mod validation;

pub use backend::{Backend, MemoryBackend, PartialUpdate, PgBackend};
pub use errors::StoreError;
pub use generic_store::{GenericStore, GenericStoreTransaction};
pub use query_builder::{QueryBuilder, QueryFilter, QueryOperator, SortOrder, UpdateOperation, UpdateSet};
pub use soft_delete::{SoftDeleteConfig, SoftDeletePolicy, SoftDeleteValues};
pub use traits::{BeforeDelete, BeforeFind, DeleteEvent, SoftDeletable, StoreObject, TableMetadata};
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
