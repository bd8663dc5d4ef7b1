//! Signal system for database event handling
//!
//! This crate provides event types and a callback registry that stores use
//! to report create, update, delete, soft-delete and restore operations.

pub mod event;
pub mod manager;
pub mod prelude;
pub mod types;

pub use event::{DatabaseEvent, EventType};
pub use manager::SignalManager;
pub use types::{serialize_to_payload, EventCallback};
