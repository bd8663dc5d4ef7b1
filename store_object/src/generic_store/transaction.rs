//! Transaction support for PostgreSQL-backed stores
//!
//! The two writes of a soft delete are not atomic on their own. Callers who
//! need them to be can run their own statements inside one of these.

use super::GenericStore;
use crate::backend::PgBackend;
use crate::errors::StoreError;
use crate::traits::TableMetadata;
use sqlx::{Postgres, Transaction};
use std::marker::PhantomData;

/// A transactional context for a `GenericStore`
///
/// # Example
/// ```ignore
/// let mut tx = store.begin_transaction().await?;
///
/// sqlx::query("UPDATE notes SET deleted = 1, dt_deleted = NOW() WHERE id = $1")
///     .bind(note_id)
///     .execute(&mut **tx.as_mut())
///     .await?;
///
/// tx.commit().await?;
/// ```
pub struct GenericStoreTransaction<T: TableMetadata> {
    tx: Transaction<'static, Postgres>,
    _phantom: PhantomData<T>,
}

impl<T: TableMetadata> GenericStore<T, PgBackend> {
    /// Begin a new database transaction
    pub async fn begin_transaction(&self) -> Result<GenericStoreTransaction<T>, StoreError> {
        let tx = self.backend.pool().begin().await.map_err(|e| {
            StoreError::DatabaseError(format!("Failed to begin transaction: {}", e))
        })?;
        Ok(GenericStoreTransaction {
            tx,
            _phantom: PhantomData,
        })
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &sqlx::PgPool {
        self.backend.pool()
    }
}

impl<T: TableMetadata> GenericStoreTransaction<T> {
    /// Commit the transaction
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(|e| {
            StoreError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })
    }

    /// Rollback the transaction
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(|e| {
            StoreError::DatabaseError(format!("Failed to rollback transaction: {}", e))
        })
    }

    /// Get a mutable reference to the underlying transaction
    pub fn as_mut(&mut self) -> &mut Transaction<'static, Postgres> {
        &mut self.tx
    }
}
