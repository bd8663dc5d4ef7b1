//! `SoftDeletable` for `GenericStore`

use super::core::GenericStore;
use super::store_object::by_id;
use crate::backend::Backend;
use crate::errors::StoreError;
use crate::query_builder::QueryBuilder;
use crate::traits::{SoftDeletable, TableMetadata};
use async_trait::async_trait;
use signal_system::EventType;

#[async_trait]
impl<T, B> SoftDeletable for GenericStore<T, B>
where
    T: TableMetadata,
    B: Backend<T>,
{
    async fn undelete(&self, record: &mut Self::Model) -> Result<bool, StoreError> {
        let Some(policy) = &self.soft_delete else {
            return Ok(false);
        };

        let restored = policy.undelete(self.writer(), record).await?;
        if restored {
            self.emit_record_event(EventType::Restore, record);
        }
        Ok(restored)
    }

    async fn find_with_deleted(
        &self,
        query: QueryBuilder,
    ) -> Result<Vec<Self::Model>, StoreError> {
        self.backend.select(&query).await
    }

    async fn find_deleted(&self, query: QueryBuilder) -> Result<Vec<Self::Model>, StoreError> {
        let filter = self
            .soft_delete
            .as_ref()
            .and_then(|policy| policy.deleted_filter())
            .ok_or_else(|| {
                StoreError::validation(
                    T::table_name(),
                    "soft_delete",
                    "Entity has no soft-delete flag column",
                )
            })?;

        self.backend.select(&query.filter(filter)).await
    }

    async fn get_by_id_with_deleted(
        &self,
        id: &Self::Id,
    ) -> Result<Option<Self::Model>, StoreError> {
        Ok(self.backend.select(&by_id::<T>(id)?).await?.into_iter().next())
    }

    async fn count_with_deleted(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        self.backend.count(&query).await
    }

    async fn hard_delete(&self, record: &Self::Model) -> Result<bool, StoreError> {
        let deleted = self.backend.delete_row(&record.extract_id()).await?;
        if deleted {
            self.emit_record_event(EventType::Delete, record);
        }
        Ok(deleted)
    }
}
