//! Soft-delete operations on stores
//!
//! Default reads hide soft-deleted rows. The `*_with_deleted` and
//! `find_deleted` methods bypass that filter explicitly.

use super::core::StoreObject;
use crate::StoreError;
use async_trait::async_trait;

/// Trait for stores whose entity type may carry a soft-delete policy
#[async_trait]
pub trait SoftDeletable: StoreObject {
    /// Reset the flag column to its active value
    ///
    /// `Ok(false)` when the entity has no flag column or the row is gone.
    /// The deletion timestamp, if any, is left as it was.
    async fn undelete(&self, record: &mut Self::Model) -> Result<bool, StoreError>;

    /// Find records including soft-deleted ones
    async fn find_with_deleted(
        &self,
        query: crate::QueryBuilder,
    ) -> Result<Vec<Self::Model>, StoreError>;

    /// Find only soft-deleted records
    async fn find_deleted(
        &self,
        query: crate::QueryBuilder,
    ) -> Result<Vec<Self::Model>, StoreError>;

    /// Get an object by its ID whether or not it is soft-deleted
    async fn get_by_id_with_deleted(
        &self,
        id: &Self::Id,
    ) -> Result<Option<Self::Model>, StoreError>;

    /// Count records including soft-deleted ones
    async fn count_with_deleted(&self, query: crate::QueryBuilder) -> Result<i64, StoreError>;

    /// Remove the row physically, skipping the delete hooks
    async fn hard_delete(&self, record: &Self::Model) -> Result<bool, StoreError>;
}
