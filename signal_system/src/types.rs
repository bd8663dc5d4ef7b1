//! Type definitions for signal system
//!
//! Callback type and payload serialization helpers.

use crate::event::DatabaseEvent;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Event callback invoked synchronously for every emitted event
pub type EventCallback = Arc<dyn Fn(&DatabaseEvent) + Send + Sync>;

/// Flatten a serializable record into an event payload
///
/// Records that do not serialize to a JSON object produce an empty payload.
pub fn serialize_to_payload<T: Serialize>(record: &T) -> HashMap<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => HashMap::new(),
    }
}
