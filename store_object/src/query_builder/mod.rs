//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

pub mod builder;
pub mod filter;
pub mod ordering;
pub mod sql_generation;
pub mod update;


pub use builder::QueryBuilder;
pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use ordering::SortOrder;
pub use update::{UpdateOperation, UpdateSet};
