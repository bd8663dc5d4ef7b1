//! Static table metadata for entity types
//!
//! Column existence is declared here once per type instead of being
//! discovered from records at runtime.

use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Metadata about database table structure
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use store_object::TableMetadata;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Note {
///     pub id: i64,
///     pub title: String,
///     pub deleted: i32,
/// }
///
/// impl TableMetadata for Note {
///     type Id = i64;
///
///     fn table_name() -> &'static str {
///         "notes"
///     }
///
///     fn columns() -> &'static [&'static str] {
///         &["id", "title", "deleted"]
///     }
///
///     fn extract_id(&self) -> i64 {
///         self.id
///     }
/// }
///
/// assert!(Note::has_column("deleted"));
/// assert!(!Note::has_column("dt_deleted"));
/// ```
pub trait TableMetadata:
    Clone + Send + Sync + Debug + Serialize + DeserializeOwned + Unpin + 'static
{
    /// The type used for the primary key
    type Id: Clone + Send + Sync + Debug + PartialEq + Serialize;

    /// The table name in the database
    fn table_name() -> &'static str;

    /// Every persisted column, primary key included
    fn columns() -> &'static [&'static str];

    /// Extract ID from model instance
    fn extract_id(&self) -> Self::Id;

    /// Get the primary key field name
    fn primary_key_field() -> &'static str {
        "id"
    }

    /// Whether the table has a column with this name
    fn has_column(name: &str) -> bool {
        Self::columns().contains(&name)
    }

    /// Primary key as a bindable value
    fn id_value(id: &Self::Id) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(id)?)
    }

    /// Primary key rendered for logs and events
    fn id_string(id: &Self::Id) -> String {
        match serde_json::to_value(id) {
            Ok(Value::String(s)) => s,
            Ok(other) => other.to_string(),
            Err(_) => format!("{:?}", id),
        }
    }
}
