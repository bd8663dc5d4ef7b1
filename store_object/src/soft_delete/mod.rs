//! Soft delete
//!
//! Instead of removing a row, a delete sets a flag column to its "deleted"
//! value and/or stamps a timestamp column with the database clock. Reads
//! through a store are then restricted to rows whose flag is "active".
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use store_object::soft_delete::{SoftDeleteConfig, SoftDeletePolicy};
//! use store_object::TableMetadata;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Note {
//!     pub id: i64,
//!     pub deleted: i32,
//! }
//!
//! impl TableMetadata for Note {
//!     type Id = i64;
//!
//!     fn table_name() -> &'static str {
//!         "notes"
//!     }
//!
//!     fn columns() -> &'static [&'static str] {
//!         &["id", "deleted"]
//!     }
//!
//!     fn extract_id(&self) -> i64 {
//!         self.id
//!     }
//! }
//!
//! let policy = SoftDeletePolicy::attach::<Note>(&SoftDeleteConfig::default()).unwrap();
//! assert_eq!(policy.flag_column(), Some("deleted"));
//! // `notes` has no dt_deleted column
//! assert_eq!(policy.timestamp_column(), None);
//! ```

mod policy;


pub use crate::traits::DeleteEvent;
pub use config::{SoftDeleteConfig, SoftDeleteValues};
pub use policy::{SoftDeletePolicy, FLAG_UPDATE_FAILED, RESTORE_FAILED, TIMESTAMP_UPDATE_FAILED};
