//! PostgreSQL backend
//!
//! Generates SQL from query builders and update sets and runs it through a
//! `sqlx` pool. Identifiers come from `TableMetadata`; values are always bound.

use super::{Backend, PartialUpdate};
use crate::errors::StoreError;
use crate::query_builder::{QueryBuilder, UpdateSet};
use crate::traits::TableMetadata;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{PgPool, Postgres, Row};

// Shared JSON-to-Postgres parameter binding
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            Value::String(s) => {
                // Try to parse as RFC3339 timestamp first
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                    $query.bind(dt.with_timezone(&chrono::Utc))
                // Try to parse as UUID
                } else if let Ok(uuid) = uuid::Uuid::parse_str(&s) {
                    $query.bind(uuid)
                } else {
                    $query.bind(s)
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                        $query.bind(i as i32)
                    } else {
                        $query.bind(i)
                    }
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            Value::Bool(b) => $query.bind(b),
            Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(sqlx::types::Json(other)),
        }
    };
}

type PgQueryAs<'q, O> = sqlx::query::QueryAs<'q, Postgres, O, PgArguments>;
type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

fn bind_params_as<'q, O>(mut query: PgQueryAs<'q, O>, params: Vec<Value>) -> PgQueryAs<'q, O> {
    for param in params {
        query = bind_json_param!(query, param);
    }
    query
}

fn bind_params<'q>(mut query: PgQuery<'q>, params: Vec<Value>) -> PgQuery<'q> {
    for param in params {
        query = bind_json_param!(query, param);
    }
    query
}

/// Joins non-empty SQL fragments with single spaces
fn assemble(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Backend that stores rows in PostgreSQL
#[derive(Clone, Debug)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl<T> PartialUpdate<T> for PgBackend
where
    T: TableMetadata + for<'r> sqlx::FromRow<'r, PgRow>,
{
    async fn update_columns(
        &self,
        record: &T,
        changes: &UpdateSet,
    ) -> Result<Option<T>, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::validation(
                T::table_name(),
                "update",
                "Partial update without columns",
            ));
        }

        let (set_clause, mut params) = changes.build_set_clause(1);
        params.push(T::id_value(&record.extract_id())?);
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING *",
            T::table_name(),
            set_clause,
            T::primary_key_field(),
            params.len()
        );
        debug_log!("[UPDATE_COLUMNS] SQL: {}", sql);

        bind_params_as(sqlx::query_as::<_, T>(&sql), params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "update_columns", e))
    }
}

#[async_trait]
impl<T> Backend<T> for PgBackend
where
    T: TableMetadata + for<'r> sqlx::FromRow<'r, PgRow>,
{
    async fn insert(&self, record: &T) -> Result<T, StoreError> {
        let Value::Object(row) = serde_json::to_value(record)? else {
            return Err(StoreError::validation(
                T::table_name(),
                "record",
                "Record must serialize to an object",
            ));
        };

        // NULL columns are left to their database defaults
        let mut columns = Vec::new();
        let mut params = Vec::new();
        for column in T::columns() {
            match row.get(*column) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    columns.push(*column);
                    params.push(value.clone());
                }
            }
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES RETURNING *", T::table_name())
        } else {
            let placeholders: Vec<String> =
                (1..=columns.len()).map(|i| format!("${}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
                T::table_name(),
                columns.join(", "),
                placeholders.join(", ")
            )
        };
        debug_log!("[INSERT] SQL: {}", sql);

        bind_params_as(sqlx::query_as::<_, T>(&sql), params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "insert", e))
    }

    async fn select(&self, query: &QueryBuilder) -> Result<Vec<T>, StoreError> {
        let (where_clause, order_clause, limit_clause, params) = query.build();
        let base_sql = format!("SELECT * FROM {}", T::table_name());
        let sql = assemble(&[
            base_sql.as_str(),
            where_clause.as_str(),
            order_clause.as_str(),
            limit_clause.as_str(),
        ]);
        debug_log!("[SELECT] SQL: {} ({} params)", sql, params.len());

        bind_params_as(sqlx::query_as::<_, T>(&sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "select", e))
    }

    async fn count(&self, query: &QueryBuilder) -> Result<i64, StoreError> {
        let (where_clause, params) = query.build_where_clause();
        let base_sql = format!("SELECT COUNT(*) AS total FROM {}", T::table_name());
        let sql = assemble(&[base_sql.as_str(), where_clause.as_str()]);
        debug_log!("[COUNT] SQL: {}", sql);

        let row = bind_params(sqlx::query(&sql), params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "count", e))?;

        row.try_get::<i64, _>("total")
            .map_err(|e| StoreError::database_operation(T::table_name(), "count", e))
    }

    async fn delete_row(&self, id: &T::Id) -> Result<bool, StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            T::table_name(),
            T::primary_key_field()
        );
        debug_log!("[DELETE] SQL: {}", sql);

        let result = bind_params(sqlx::query(&sql), vec![T::id_value(id)?])
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::assemble;

    #[test]
    fn test_assemble_skips_empty_parts() {
        assert_eq!(
            assemble(&["SELECT * FROM notes", "", "ORDER BY id ASC", ""]),
            "SELECT * FROM notes ORDER BY id ASC"
        );
    }
}
