//! Core SoftHaus functionality
//!
//! The `SoftHaus` coordinator owns the connection pool and the soft-delete
//! settings, and hands out stores with the policy already attached.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::SoftHausError;
use config::{AppConfig, DatabaseConfig, SoftDeleteConfig};
use signal_system::SignalManager;
use store_object::traits::{StoreObject, TableMetadata};
use store_object::{GenericStore, PgBackend};

/// Main SoftHaus coordinator
pub struct SoftHaus {
    pool: PgPool,
    soft_delete: SoftDeleteConfig,
    signal_manager: Option<Arc<SignalManager>>,
    stores: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
}

impl SoftHaus {
    /// Connect using a loaded application config
    pub async fn new(config: AppConfig) -> Result<Self, SoftHausError> {
        config.validate()?;
        let pool = pool_options(&config.database)
            .connect(&config.database.connection_string())
            .await?;
        tracing::info!(
            host = %config.database.host,
            database = %config.database.database,
            "connected"
        );
        Ok(Self::with_pool(pool, config.soft_delete))
    }

    /// Build without opening a connection until the first query
    pub fn new_lazy(config: AppConfig) -> Result<Self, SoftHausError> {
        config.validate()?;
        let pool =
            pool_options(&config.database).connect_lazy(&config.database.connection_string())?;
        Ok(Self::with_pool(pool, config.soft_delete))
    }

    /// Connect with default soft-delete settings
    pub async fn connect(database: DatabaseConfig) -> Result<Self, SoftHausError> {
        Self::new(AppConfig {
            database,
            soft_delete: SoftDeleteConfig::default(),
        })
        .await
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: PgPool, soft_delete: SoftDeleteConfig) -> Self {
        Self {
            pool,
            soft_delete,
            signal_manager: None,
            stores: HashMap::new(),
        }
    }

    /// Report store events through `signal_manager`
    pub fn with_signals(mut self, signal_manager: Arc<SignalManager>) -> Self {
        self.signal_manager = Some(signal_manager);
        self
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Soft-delete settings applied by `store`
    pub fn soft_delete_config(&self) -> &SoftDeleteConfig {
        &self.soft_delete
    }

    /// Store for `T` with the configured soft-delete policy
    pub fn store<T: TableMetadata>(&self) -> Result<GenericStore<T, PgBackend>, SoftHausError> {
        self.store_with(&self.soft_delete)
    }

    /// Store for `T` with entity-specific soft-delete settings
    pub fn store_with<T: TableMetadata>(
        &self,
        soft_delete: &SoftDeleteConfig,
    ) -> Result<GenericStore<T, PgBackend>, SoftHausError> {
        let backend = PgBackend::new(self.pool.clone());
        let store = GenericStore::<T, PgBackend>::new(backend, self.signal_manager.clone())
            .with_soft_delete(soft_delete)?;
        Ok(store)
    }

    /// Register a store object with a given name
    pub fn register_store<S>(&mut self, name: String, store: S) -> Result<(), SoftHausError>
    where
        S: StoreObject + Send + Sync + 'static,
    {
        if self.stores.contains_key(&name) {
            return Err(SoftHausError::StoreAlreadyRegistered(name));
        }

        self.stores.insert(name, Box::new(store));
        Ok(())
    }

    /// Get a registered store object by name
    pub fn get_store<S>(&self, name: &str) -> Result<&S, SoftHausError>
    where
        S: StoreObject + Send + Sync + 'static,
    {
        self.stores
            .get(name)
            .and_then(|store| store.downcast_ref::<S>())
            .ok_or_else(|| SoftHausError::StoreNotFound(name.to_string()))
    }

    /// List all registered store names
    pub fn list_stores(&self) -> Vec<&String> {
        self.stores.keys().collect()
    }

    /// Remove a store object by name
    pub fn unregister_store(&mut self, name: &str) -> Result<(), SoftHausError> {
        self.stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SoftHausError::StoreNotFound(name.to_string()))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), SoftHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

fn pool_options(config: &DatabaseConfig) -> sqlx::postgres::PgPoolOptions {
    let mut pool_options = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    if config.max_lifetime_seconds > 0 {
        pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
    }
    pool_options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use store_object::MemoryBackend;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Entry {
        id: i64,
        removed: bool,
    }

    impl TableMetadata for Entry {
        type Id = i64;

        fn table_name() -> &'static str {
            "entries"
        }

        fn columns() -> &'static [&'static str] {
            &["id", "removed"]
        }

        fn extract_id(&self) -> i64 {
            self.id
        }
    }

    fn lazy_config() -> AppConfig {
        AppConfig::from_toml_str(
            r#"
            [database]
            host = "localhost"
            port = 5432
            database = "softhaus_test"
            username = "postgres"
            password = "password"
            min_connections = 1
            max_connections = 2
            connection_timeout_seconds = 1
            idle_timeout_seconds = 60
            max_lifetime_seconds = 0

            [soft_delete]
            flag_column = "removed"
            timestamp_column = ""
            active_value = false
            deleted_value = true
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_store_gets_configured_policy() {
        let softhaus = SoftHaus::new_lazy(lazy_config()).unwrap();

        let store = softhaus.store::<Entry>().unwrap();
        let policy = store.soft_delete_policy().unwrap();

        assert_eq!(policy.flag_column(), Some("removed"));
        assert_eq!(policy.timestamp_column(), None);
        assert_eq!(policy.values().deleted, serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_store_with_rejects_bad_config() {
        let softhaus = SoftHaus::new_lazy(lazy_config()).unwrap();
        let config = SoftDeleteConfig::flag_only("removed")
            .with_values(config::SoftDeleteValues::new(true, true));

        let result = softhaus.store_with::<Entry>(&config);
        assert!(matches!(result, Err(SoftHausError::Store(_))));
    }

    #[tokio::test]
    async fn test_store_registry() {
        let mut softhaus = SoftHaus::new_lazy(lazy_config()).unwrap();
        let store: GenericStore<Entry, MemoryBackend> = GenericStore::new(MemoryBackend::new(), None);

        softhaus.register_store("entries".to_string(), store.clone()).unwrap();
        assert!(matches!(
            softhaus.register_store("entries".to_string(), store),
            Err(SoftHausError::StoreAlreadyRegistered(_))
        ));

        assert!(softhaus.get_store::<GenericStore<Entry, MemoryBackend>>("entries").is_ok());
        assert_eq!(softhaus.list_stores().len(), 1);

        softhaus.unregister_store("entries").unwrap();
        assert!(matches!(
            softhaus.get_store::<GenericStore<Entry, MemoryBackend>>("entries"),
            Err(SoftHausError::StoreNotFound(_))
        ));
    }
}
