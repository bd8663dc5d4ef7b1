//! Traits for database operations
//!
//! This module contains all the traits that define the interface for database operations
//! and record lifecycle hooks.

pub mod core;
pub mod hooks;
pub mod soft_deletable;
pub mod table_metadata;

pub use self::core::StoreObject;
pub use hooks::{BeforeDelete, BeforeFind, DeleteEvent};
pub use soft_deletable::SoftDeletable;
pub use table_metadata::TableMetadata;
