//! `StoreObject` for `GenericStore`
//!
//! Reads are scoped by the `BeforeFind` hooks and deletes go through the
//! `BeforeDelete` hooks before anything is removed.

use super::core::GenericStore;
use crate::backend::Backend;
use crate::errors::StoreError;
use crate::query_builder::{QueryBuilder, QueryFilter, UpdateSet};
use crate::traits::{BeforeDelete, DeleteEvent, StoreObject, TableMetadata};
use async_trait::async_trait;
use serde_json::Value;
use signal_system::EventType;
use tracing::{debug, info};

pub(crate) fn by_id<T: TableMetadata>(id: &T::Id) -> Result<QueryBuilder, StoreError> {
    Ok(QueryBuilder::new()
        .filter(QueryFilter::eq(T::primary_key_field(), T::id_value(id)?))
        .limit(1))
}

#[async_trait]
impl<T, B> StoreObject for GenericStore<T, B>
where
    T: TableMetadata,
    B: Backend<T>,
{
    type Model = T;
    type Id = T::Id;

    async fn create(&self, data: Self::Model) -> Result<Self::Model, StoreError> {
        let created = self.backend.insert(&data).await?;
        self.emit_record_event(EventType::Create, &created);
        Ok(created)
    }

    async fn get_by_id(&self, id: &Self::Id) -> Result<Option<Self::Model>, StoreError> {
        let query = self.scoped(by_id::<T>(id)?);
        Ok(self.backend.select(&query).await?.into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<Self::Model>, StoreError> {
        self.backend.select(&self.scoped(QueryBuilder::new())).await
    }

    async fn update(&self, data: &Self::Model) -> Result<Self::Model, StoreError> {
        let Value::Object(mut row) = serde_json::to_value(data)? else {
            return Err(StoreError::validation(
                T::table_name(),
                "record",
                "Record must serialize to an object",
            ));
        };

        let mut changes = UpdateSet::new();
        for column in T::columns()
            .iter()
            .filter(|column| **column != T::primary_key_field())
        {
            if let Some(value) = row.remove(*column) {
                changes = changes.set(*column, value);
            }
        }
        if changes.is_empty() {
            return Err(StoreError::validation(
                T::table_name(),
                "update",
                "No columns to update",
            ));
        }

        let updated = self
            .backend
            .update_columns(data, &changes)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "{} with id {}",
                    T::table_name(),
                    T::id_string(&data.extract_id())
                ))
            })?;

        self.emit_record_event(EventType::Update, &updated);
        Ok(updated)
    }

    async fn delete(&self, id: &Self::Id) -> Result<bool, StoreError> {
        // Unscoped lookup: deleting an already soft-deleted row is allowed
        let Some(mut record) = self.backend.select(&by_id::<T>(id)?).await?.into_iter().next()
        else {
            return Ok(false);
        };
        self.delete_record(&mut record).await
    }

    async fn delete_record(&self, record: &mut Self::Model) -> Result<bool, StoreError> {
        let mut event = DeleteEvent::new();
        if let Some(policy) = &self.soft_delete {
            policy.before_delete(self.writer(), record, &mut event).await?;
        }

        let id = record.extract_id();
        if event.handled {
            info!(table = T::table_name(), id = %T::id_string(&id), "record soft-deleted");
            self.emit_record_event(EventType::SoftDelete, record);
            return Ok(true);
        }
        if !event.is_valid {
            debug!(table = T::table_name(), id = %T::id_string(&id), "delete vetoed");
            return Ok(false);
        }

        let deleted = self.backend.delete_row(&id).await?;
        if deleted {
            self.emit_record_event(EventType::Delete, record);
        }
        Ok(deleted)
    }

    async fn delete_where(&self, query: QueryBuilder) -> Result<Vec<Self::Id>, StoreError> {
        let mut deleted_ids = Vec::new();
        for mut record in self.find(query).await? {
            if self.delete_record(&mut record).await? {
                deleted_ids.push(record.extract_id());
            }
        }
        Ok(deleted_ids)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.backend.count(&self.scoped(QueryBuilder::new())).await
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<Self::Model>, StoreError> {
        self.backend.select(&self.scoped(query)).await
    }

    async fn find_one(&self, query: QueryBuilder) -> Result<Option<Self::Model>, StoreError> {
        let query = self.scoped(query.limit(1));
        Ok(self.backend.select(&query).await?.into_iter().next())
    }

    async fn count_where(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        self.backend.count(&self.scoped(query)).await
    }
}
