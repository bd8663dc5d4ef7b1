pub mod core;
pub mod soft_deletable;
pub mod store_object;
pub mod transaction;


pub use self::core::GenericStore;
pub use transaction::GenericStoreTransaction;
