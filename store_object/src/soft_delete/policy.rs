use crate::backend::PartialUpdate;
use crate::errors::StoreError;
use crate::query_builder::{QueryBuilder, QueryFilter, UpdateSet};
use crate::traits::{BeforeDelete, BeforeFind, DeleteEvent, TableMetadata};
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use async_trait::async_trait;
use config::{ConfigError, SoftDeleteConfig, SoftDeleteValues};
use tracing::{debug, info, warn};

pub const FLAG_UPDATE_FAILED: &str = "soft-delete flag update failed";
pub const TIMESTAMP_UPDATE_FAILED: &str = "soft-delete timestamp update failed";
pub const RESTORE_FAILED: &str = "soft-delete restore failed";

/// Soft-delete behavior resolved for one entity type
///
/// Built once with [`SoftDeletePolicy::attach`] and shared by every store of
/// that type. Only columns the type actually declares are kept, so a policy
/// whose columns are all missing behaves like no policy at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftDeletePolicy {
    table: &'static str,
    flag_column: Option<ValidatedFieldName>,
    timestamp_column: Option<ValidatedFieldName>,
    values: SoftDeleteValues,
}

impl SoftDeletePolicy {
    /// Resolve `config` against the columns of `T`
    pub fn attach<T: TableMetadata>(config: &SoftDeleteConfig) -> Result<Self, StoreError> {
        config.validate().map_err(|e| match e {
            ConfigError::Invalid(message) => StoreError::invalid_configuration(message),
            other => StoreError::Config(other),
        })?;
        let table = ValidatedTableName::new(T::table_name()).map_err(|e| {
            StoreError::invalid_configuration(format!("soft-delete table: {}", e))
        })?;

        let policy = Self {
            table: T::table_name(),
            flag_column: resolve_column::<T>(config.flag_column.as_deref(), "flag")?,
            timestamp_column: resolve_column::<T>(config.timestamp_column.as_deref(), "timestamp")?,
            values: config.values.clone(),
        };

        debug!(
            table = %table,
            flag_column = ?policy.flag_column(),
            timestamp_column = ?policy.timestamp_column(),
            "soft-delete policy attached"
        );
        Ok(policy)
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn flag_column(&self) -> Option<&str> {
        self.flag_column.as_ref().map(ValidatedFieldName::as_str)
    }

    pub fn timestamp_column(&self) -> Option<&str> {
        self.timestamp_column.as_ref().map(ValidatedFieldName::as_str)
    }

    pub fn values(&self) -> &SoftDeleteValues {
        &self.values
    }

    /// Whether deletes of this type are intercepted
    pub fn is_enabled(&self) -> bool {
        self.flag_column.is_some() || self.timestamp_column.is_some()
    }

    /// `flag = active`, or `None` when reads are not filtered
    pub fn read_filter(&self) -> Option<QueryFilter> {
        self.flag_column()
            .map(|flag| QueryFilter::eq(flag, self.values.active.clone()))
    }

    /// `flag = deleted`, selecting only soft-deleted rows
    pub fn deleted_filter(&self) -> Option<QueryFilter> {
        self.flag_column()
            .map(|flag| QueryFilter::eq(flag, self.values.deleted.clone()))
    }

    /// Put the flag back to its active value
    ///
    /// `Ok(false)` when there is no flag column or the row no longer exists.
    /// The deletion timestamp is kept.
    pub async fn undelete<T: TableMetadata>(
        &self,
        writer: &dyn PartialUpdate<T>,
        record: &mut T,
    ) -> Result<bool, StoreError> {
        let Some(flag) = self.flag_column() else {
            debug!(table = self.table, "undelete not possible without a flag column");
            return Ok(false);
        };

        let changes = UpdateSet::new().set(flag, self.values.active.clone());
        match writer.update_columns(record, &changes).await {
            Ok(Some(stored)) => {
                *record = stored;
                info!(
                    table = self.table,
                    id = %T::id_string(&record.extract_id()),
                    "record restored"
                );
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => Err(StoreError::persistence(self.table, RESTORE_FAILED, Some(e))),
        }
    }

    async fn persist<T: TableMetadata>(
        &self,
        writer: &dyn PartialUpdate<T>,
        record: &T,
        changes: &UpdateSet,
        failure: &str,
    ) -> Result<T, StoreError> {
        match writer.update_columns(record, changes).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(StoreError::persistence(
                self.table,
                failure,
                Some(StoreError::NotFound(format!(
                    "{} row {}",
                    self.table,
                    T::id_string(&record.extract_id())
                ))),
            )),
            Err(e) => Err(StoreError::persistence(self.table, failure, Some(e))),
        }
    }
}

fn resolve_column<T: TableMetadata>(
    name: Option<&str>,
    role: &str,
) -> Result<Option<ValidatedFieldName>, StoreError> {
    let Some(name) = name else {
        return Ok(None);
    };

    let column = ValidatedFieldName::new(name).map_err(|e| {
        StoreError::invalid_configuration(format!("soft-delete {} column: {}", role, e))
    })?;

    if !T::has_column(column.as_str()) {
        warn!(
            table = T::table_name(),
            column = column.as_str(),
            "soft-delete {} column not declared by entity, ignoring it",
            role
        );
        return Ok(None);
    }
    Ok(Some(column))
}

#[async_trait]
impl<T: TableMetadata> BeforeDelete<T> for SoftDeletePolicy {
    async fn before_delete(
        &self,
        writer: &dyn PartialUpdate<T>,
        record: &mut T,
        event: &mut DeleteEvent,
    ) -> Result<(), StoreError> {
        if !event.is_open() {
            return Ok(());
        }

        // Flag and timestamp are written separately, never batched
        if let Some(flag) = self.flag_column() {
            event.take_over();
            let changes = UpdateSet::new().set(flag, self.values.deleted.clone());
            let stored = self
                .persist(writer, record, &changes, FLAG_UPDATE_FAILED)
                .await?;
            *record = stored;
        }

        if let Some(timestamp) = self.timestamp_column() {
            event.take_over();
            let changes = UpdateSet::new().set_current_timestamp(timestamp);
            let stored = self
                .persist(writer, record, &changes, TIMESTAMP_UPDATE_FAILED)
                .await?;
            *record = stored;
        }

        Ok(())
    }
}

impl BeforeFind for SoftDeletePolicy {
    fn before_find(&self, criteria: &mut QueryBuilder) {
        if let Some(filter) = self.read_filter() {
            criteria.merge_filter(filter);
        }
    }
}
