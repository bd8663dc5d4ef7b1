//! Record lifecycle hooks
//!
//! Stores call these capability traits directly before deleting a record and
//! before running a read, instead of dispatching through an event bus.

use crate::backend::PartialUpdate;
use crate::query_builder::QueryBuilder;
use crate::traits::table_metadata::TableMetadata;
use crate::StoreError;
use async_trait::async_trait;

/// Mutable context handed to `BeforeDelete` handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteEvent {
    /// Whether the physical delete should still run
    pub is_valid: bool,
    /// Whether a handler already fully processed the delete
    pub handled: bool,
}

impl DeleteEvent {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            handled: false,
        }
    }

    /// Mark the delete as taken over: no physical removal follows
    pub fn take_over(&mut self) {
        self.is_valid = false;
        self.handled = true;
    }

    /// Whether handlers may still act on this event
    pub fn is_open(&self) -> bool {
        self.is_valid && !self.handled
    }
}

impl Default for DeleteEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook run once per delete request, before any row is removed
#[async_trait]
pub trait BeforeDelete<T: TableMetadata>: Send + Sync {
    /// An `Err` aborts the whole delete request.
    async fn before_delete(
        &self,
        writer: &dyn PartialUpdate<T>,
        record: &mut T,
        event: &mut DeleteEvent,
    ) -> Result<(), StoreError>;
}

/// Hook run on the criteria of every read before it executes
pub trait BeforeFind: Send + Sync {
    fn before_find(&self, criteria: &mut QueryBuilder);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_is_open() {
        let event = DeleteEvent::default();
        assert!(event.is_valid);
        assert!(!event.handled);
        assert!(event.is_open());
    }

    #[test]
    fn test_take_over_closes_event() {
        let mut event = DeleteEvent::new();
        event.take_over();
        assert_eq!(
            event,
            DeleteEvent {
                is_valid: false,
                handled: true
            }
        );
        assert!(!event.is_open());
    }
}
