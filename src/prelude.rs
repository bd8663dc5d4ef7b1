//! Convenience re-exports for common SoftHaus usage
//!
//! # Example
//!
//! ```rust
//! use softhaus::prelude::*;
//!
//! let config = SoftDeleteConfig::flag_only("is_deleted").with_values(SoftDeleteValues::boolean());
//! assert!(config.validate().is_ok());
//! ```

// Core SoftHaus components
pub use crate::core::SoftHaus;
pub use crate::errors::SoftHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, SoftDeleteConfig, SoftDeleteValues};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;
pub use store_object;

// Re-export signal system for event handling
pub use signal_system::prelude::*;

// Common external dependencies
pub use async_trait;
pub use chrono;
pub use sqlx;
pub use tokio;
pub use uuid::Uuid;
