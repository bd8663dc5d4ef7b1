//! # SoftHaus
//!
//! Soft deletes for PostgreSQL stores. Deleting a record sets its flag column
//! to the "deleted" value and/or stamps its timestamp column with `NOW()`;
//! reads through the store only see rows whose flag is "active" until the
//! record is undeleted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use softhaus::prelude::*;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
//! pub struct Note {
//!     pub id: i64,
//!     pub title: String,
//!     pub deleted: i32,
//!     pub dt_deleted: Option<chrono::DateTime<chrono::Utc>>,
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
//!         &["id", "title", "deleted", "dt_deleted"]
//!     }
//!
//!     fn extract_id(&self) -> i64 {
//!         self.id
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let softhaus = SoftHaus::new(config).await?;
//!
//!     let notes = softhaus.store::<Note>()?;
//!     notes.delete(&1).await?; // row kept, deleted = 1, dt_deleted = NOW()
//!     assert!(notes.get_by_id(&1).await?.is_none());
//!
//!     if let Some(mut note) = notes.get_by_id_with_deleted(&1).await? {
//!         notes.undelete(&mut note).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use self::core::SoftHaus;
pub use errors::SoftHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, SoftDeleteConfig, SoftDeleteValues};

// Re-export internal crates used by the public API
pub use signal_system;
pub use store_object;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
