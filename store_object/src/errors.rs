use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error on {table} during {operation}: {source}")]
    DatabaseOperation {
        table: String,
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A partial update needed by soft delete or undelete did not persist
    #[error("Persistence error on {table}: {message}")]
    Persistence {
        table: String,
        message: String,
        #[source]
        source: Option<Box<StoreError>>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error on {table}.{field}: {message}")]
    Validation {
        table: String,
        field: String,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl StoreError {
    pub fn database_operation(table: &str, operation: &str, source: sqlx::Error) -> Self {
        Self::DatabaseOperation {
            table: table.to_string(),
            operation: operation.to_string(),
            source,
        }
    }

    pub fn persistence(table: &str, message: &str, source: Option<StoreError>) -> Self {
        Self::Persistence {
            table: table.to_string(),
            message: message.to_string(),
            source: source.map(Box::new),
        }
    }

    pub fn validation(table: &str, field: &str, message: &str) -> Self {
        Self::Validation {
            table: table.to_string(),
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_persistence_error_keeps_source() {
        let err = StoreError::persistence(
            "notes",
            "soft-delete flag update failed",
            Some(StoreError::DatabaseError("connection reset".to_string())),
        );

        assert!(err.is_persistence());
        assert_eq!(
            err.to_string(),
            "Persistence error on notes: soft-delete flag update failed"
        );
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Database error: connection reset".to_string())
        );
    }
}
