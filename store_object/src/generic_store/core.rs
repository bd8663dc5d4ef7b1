use crate::backend::{Backend, PartialUpdate, PgBackend};
use crate::errors::StoreError;
use crate::query_builder::QueryBuilder;
use crate::soft_delete::{SoftDeleteConfig, SoftDeletePolicy};
use crate::traits::{BeforeFind, TableMetadata};
use signal_system::{serialize_to_payload, DatabaseEvent, EventType, SignalManager};
use std::marker::PhantomData;
use std::sync::Arc;

/// Generic store that runs the lifecycle hooks of `T` around a backend
pub struct GenericStore<T: TableMetadata, B = PgBackend> {
    pub(crate) backend: Arc<B>,
    pub(crate) soft_delete: Option<Arc<SoftDeletePolicy>>,
    pub(crate) signal_manager: Option<Arc<SignalManager>>,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T: TableMetadata, B> Clone for GenericStore<T, B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            soft_delete: self.soft_delete.clone(),
            signal_manager: self.signal_manager.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: TableMetadata, B> std::fmt::Debug for GenericStore<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericStore")
            .field("table", &T::table_name())
            .field("soft_delete", &self.soft_delete)
            .field("has_signals", &self.has_signals())
            .finish()
    }
}

impl<T: TableMetadata, B> GenericStore<T, B> {
    pub fn new(backend: B, signal_manager: Option<Arc<SignalManager>>) -> Self {
        Self {
            backend: Arc::new(backend),
            soft_delete: None,
            signal_manager,
            _phantom: PhantomData,
        }
    }

    /// Attach a soft-delete policy built from `config`
    pub fn with_soft_delete(self, config: &SoftDeleteConfig) -> Result<Self, StoreError> {
        let policy = SoftDeletePolicy::attach::<T>(config)?;
        Ok(self.with_policy(Arc::new(policy)))
    }

    /// Attach an already resolved policy, shared with other stores of `T`
    pub fn with_policy(mut self, policy: Arc<SoftDeletePolicy>) -> Self {
        self.soft_delete = Some(policy);
        self
    }

    pub fn soft_delete_policy(&self) -> Option<&SoftDeletePolicy> {
        self.soft_delete.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set signal manager for this store
    pub fn set_signal_manager(&mut self, signal_manager: Arc<SignalManager>) {
        self.signal_manager = Some(signal_manager);
    }

    /// Remove signal manager from this store
    pub fn remove_signal_manager(&mut self) {
        self.signal_manager = None;
    }

    /// Check if signal manager is set
    pub fn has_signals(&self) -> bool {
        self.signal_manager.is_some()
    }

    /// Apply the read hooks to `query`
    pub(crate) fn scoped(&self, mut query: QueryBuilder) -> QueryBuilder {
        if let Some(policy) = &self.soft_delete {
            policy.before_find(&mut query);
        }
        query
    }

    pub(crate) fn emit_signal(&self, event: DatabaseEvent) {
        if let Some(signal_manager) = &self.signal_manager {
            signal_manager.emit(event);
        }
    }

    /// Emit an event carrying the record's id and serialized columns
    pub(crate) fn emit_record_event(&self, event_type: EventType, record: &T) {
        if self.signal_manager.is_none() {
            return;
        }
        let mut event = DatabaseEvent::new(event_type, T::table_name().to_string())
            .with_record_id(T::id_string(&record.extract_id()));
        event.extend_payload(serialize_to_payload(record));
        self.emit_signal(event);
    }
}

impl<T: TableMetadata, B: Backend<T>> GenericStore<T, B> {
    pub(crate) fn writer(&self) -> &dyn PartialUpdate<T> {
        self.backend.as_ref()
    }
}
