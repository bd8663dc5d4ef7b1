//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{
    BeforeDelete, BeforeFind, DeleteEvent, SoftDeletable, StoreObject, TableMetadata,
};

// Backends
pub use crate::backend::{Backend, MemoryBackend, PartialUpdate, PgBackend};

// Error types
pub use crate::errors::StoreError;

// Core store functionality
pub use crate::generic_store::GenericStore;

// Soft delete
pub use crate::soft_delete::{SoftDeleteConfig, SoftDeletePolicy, SoftDeleteValues};

// Validation
pub use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

// Query building
pub use crate::query_builder::{QueryBuilder, QueryFilter, SortOrder, UpdateSet};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::{FromRow, PgPool};
