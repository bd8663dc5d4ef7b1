//! Trait definitions
//!
//! This module defines core traits for database operations.

use crate::StoreError;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Trait that defines common database operations for all entities
///
/// Every read goes through the store's `BeforeFind` hooks and every delete
/// through its `BeforeDelete` hooks.
#[async_trait]
pub trait StoreObject: Clone + Send + Sync + Debug {
    /// The model type that this object represents
    type Model: Clone + Send + Sync + Debug + Serialize + DeserializeOwned;

    /// The ID type used for this object (UUID, i64, String, etc.)
    type Id: Clone + Send + Sync + Debug;

    /// Create a new instance of this object
    async fn create(&self, data: Self::Model) -> Result<Self::Model, StoreError>;

    /// Get an object by its ID
    async fn get_by_id(&self, id: &Self::Id) -> Result<Option<Self::Model>, StoreError>;

    /// List all objects of this type
    async fn list_all(&self) -> Result<Vec<Self::Model>, StoreError>;

    /// Write every non-key column of `data` to its row
    async fn update(&self, data: &Self::Model) -> Result<Self::Model, StoreError>;

    /// Delete an object by its ID
    ///
    /// Returns `false` when no such row exists.
    async fn delete(&self, id: &Self::Id) -> Result<bool, StoreError>;

    /// Delete a loaded record, updating it in place when the delete is soft
    async fn delete_record(&self, record: &mut Self::Model) -> Result<bool, StoreError>;

    /// Delete records matching query conditions
    async fn delete_where(
        &self,
        query: crate::QueryBuilder,
    ) -> Result<Vec<Self::Id>, StoreError>;

    /// Count total objects of this type
    async fn count(&self) -> Result<i64, StoreError>;

    /// Find records matching query conditions
    async fn find(&self, query: crate::QueryBuilder) -> Result<Vec<Self::Model>, StoreError>;

    /// Find first record matching query conditions
    async fn find_one(
        &self,
        query: crate::QueryBuilder,
    ) -> Result<Option<Self::Model>, StoreError>;

    /// Count records matching query conditions
    async fn count_where(&self, query: crate::QueryBuilder) -> Result<i64, StoreError>;
}
