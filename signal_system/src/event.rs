//! Database event types and definitions
//!
//! This module defines the structure of database events
//! that flow through the signal system.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Database event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Create,
    Update,
    /// Row physically removed
    Delete,
    /// Row flagged and/or stamped as deleted, still stored
    SoftDelete,
    /// Soft-deleted row made visible again
    Restore,
}

/// Database event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseEvent {
    /// Event type
    pub event_type: EventType,
    /// Table name
    pub table_name: String,
    /// Record ID (if available)
    pub record_id: Option<String>,
    /// Additional data
    pub payload: HashMap<String, Value>,
    /// Event timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl DatabaseEvent {
    pub fn new(event_type: EventType, table_name: String) -> Self {
        Self {
            event_type,
            table_name,
            record_id: None,
            payload: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_record_id(mut self, record_id: String) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn with_payload(mut self, key: String, value: Value) -> Self {
        self.payload.insert(key, value);
        self
    }

    pub fn add_payload(&mut self, key: String, value: Value) {
        self.payload.insert(key, value);
    }

    /// Merge a whole payload map, overwriting existing keys
    pub fn extend_payload(&mut self, payload: HashMap<String, Value>) {
        self.payload.extend(payload);
    }
}
