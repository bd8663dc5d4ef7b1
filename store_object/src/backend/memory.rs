//! In-process backend
//!
//! Rows are kept as JSON objects per table and query filters are evaluated
//! directly against them, following PostgreSQL semantics where they matter
//! (NULL never compares equal, empty `IN` matches nothing). The backend clock
//! supplies `NOW()` at write time.

use super::{Backend, PartialUpdate};
use crate::errors::StoreError;
use crate::query_builder::{
    LogicalOperator, QueryBuilder, QueryCondition, QueryFilter, QueryOperator, SortOrder,
    UpdateOperation, UpdateSet,
};
use crate::traits::TableMetadata;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

type Row = Map<String, Value>;

/// Backend that keeps every table in memory
///
/// Locks are never held across an await point.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    rejected_columns: RwLock<HashSet<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every partial update that writes `column`
    pub fn reject_writes_to(&self, column: &str) {
        if let Ok(mut rejected) = self.rejected_columns.write() {
            rejected.insert(column.to_string());
        }
    }

    /// Undo `reject_writes_to`
    pub fn accept_writes_to(&self, column: &str) {
        if let Ok(mut rejected) = self.rejected_columns.write() {
            rejected.remove(column);
        }
    }

    /// Physically stored rows of a table, bypassing every filter
    pub fn raw_rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.get(table).cloned())
            .unwrap_or_default()
    }

    fn current_timestamp() -> Value {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn lock_error(table: &str) -> StoreError {
        StoreError::DatabaseError(format!("memory table '{}' lock poisoned", table))
    }

    fn check_writable(&self, table: &str, changes: &UpdateSet) -> Result<(), StoreError> {
        let rejected = self
            .rejected_columns
            .read()
            .map_err(|_| Self::lock_error(table))?;
        match changes.columns().into_iter().find(|c| rejected.contains(*c)) {
            Some(column) => Err(StoreError::DatabaseError(format!(
                "write to {}.{} rejected",
                table, column
            ))),
            None => Ok(()),
        }
    }

    fn to_row<T: TableMetadata>(record: &T) -> Result<Row, StoreError> {
        match serde_json::to_value(record)? {
            Value::Object(row) => Ok(row),
            _ => Err(StoreError::validation(
                T::table_name(),
                "record",
                "Record must serialize to an object",
            )),
        }
    }

    fn from_row<T: TableMetadata>(row: &Row) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(row.clone()))?)
    }

    fn matching_rows<'a>(rows: &'a [Row], query: &QueryBuilder) -> Vec<&'a Row> {
        rows.iter()
            .filter(|row| query.conditions().iter().all(|f| matches_filter(f, row)))
            .collect()
    }
}

#[async_trait]
impl<T: TableMetadata> PartialUpdate<T> for MemoryBackend {
    async fn update_columns(
        &self,
        record: &T,
        changes: &UpdateSet,
    ) -> Result<Option<T>, StoreError> {
        let table = T::table_name();
        if changes.is_empty() {
            return Err(StoreError::validation(
                table,
                "update",
                "Partial update without columns",
            ));
        }
        self.check_writable(table, changes)?;

        let id = T::id_value(&record.extract_id())?;
        let mut tables = self.tables.write().map_err(|_| Self::lock_error(table))?;
        let row = tables.get_mut(table).and_then(|rows| {
            rows.iter_mut()
                .find(|row| row.get(T::primary_key_field()) == Some(&id))
        });
        let Some(row) = row else {
            return Ok(None);
        };

        // Stored row is replaced only once the result decodes
        let mut updated = row.clone();
        for (column, operation) in changes.iter() {
            let value = match operation {
                UpdateOperation::Set(value) => value.clone(),
                UpdateOperation::CurrentTimestamp => Self::current_timestamp(),
            };
            updated.insert(column.to_string(), value);
        }

        let stored = Self::from_row(&updated)?;
        *row = updated;
        Ok(Some(stored))
    }
}

#[async_trait]
impl<T: TableMetadata> Backend<T> for MemoryBackend {
    async fn insert(&self, record: &T) -> Result<T, StoreError> {
        let table = T::table_name();
        let row = Self::to_row(record)?;
        let id = T::id_value(&record.extract_id())?;

        let mut tables = self.tables.write().map_err(|_| Self::lock_error(table))?;
        let rows = tables.entry(table.to_string()).or_default();
        if rows
            .iter()
            .any(|existing| existing.get(T::primary_key_field()) == Some(&id))
        {
            return Err(StoreError::DatabaseError(format!(
                "duplicate key {} on {}.{}",
                id,
                table,
                T::primary_key_field()
            )));
        }

        let stored = Self::from_row(&row)?;
        rows.push(row);
        Ok(stored)
    }

    async fn select(&self, query: &QueryBuilder) -> Result<Vec<T>, StoreError> {
        let table = T::table_name();
        let tables = self.tables.read().map_err(|_| Self::lock_error(table))?;
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or(&[]);

        let mut matched = Self::matching_rows(rows, query);
        matched.sort_by(|a, b| compare_rows(a, b, query.ordering()));

        let offset = query.offset_value().unwrap_or(0).max(0) as usize;
        let limit = query
            .limit_value()
            .map(|l| l.max(0) as usize)
            .unwrap_or(usize::MAX);

        matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(Self::from_row)
            .collect()
    }

    async fn count(&self, query: &QueryBuilder) -> Result<i64, StoreError> {
        let table = T::table_name();
        let tables = self.tables.read().map_err(|_| Self::lock_error(table))?;
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or(&[]);

        Ok(Self::matching_rows(rows, query).len() as i64)
    }

    async fn delete_row(&self, id: &T::Id) -> Result<bool, StoreError> {
        let table = T::table_name();
        let id = T::id_value(id)?;
        let mut tables = self.tables.write().map_err(|_| Self::lock_error(table))?;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };

        let before = rows.len();
        rows.retain(|row| row.get(T::primary_key_field()) != Some(&id));
        Ok(rows.len() < before)
    }
}

fn compare_rows(a: &Row, b: &Row, ordering: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in ordering {
        // NULLs sort last ascending, first descending
        let ord = match (a.get(field), b.get(field)) {
            (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
            (None | Some(Value::Null), _) => Ordering::Greater,
            (_, None | Some(Value::Null)) => Ordering::Less,
            (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
        };
        let ord = match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ if a == b && !a.is_null() => Some(Ordering::Equal),
        _ => None,
    }
}

fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    // Integers compare exactly; f64 loses precision above 2^53
    match (x.as_i64(), y.as_i64(), x.as_u64(), y.as_u64()) {
        (Some(a), Some(b), _, _) => Some(a.cmp(&b)),
        (_, _, Some(a), Some(b)) => Some(a.cmp(&b)),
        (Some(_), _, _, Some(_)) => Some(Ordering::Less),
        (_, Some(_), Some(_), _) => Some(Ordering::Greater),
        _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Some(Ordering::Equal)
}

pub(crate) fn matches_filter(filter: &QueryFilter, row: &Row) -> bool {
    match filter {
        QueryFilter::Condition(condition) => matches_condition(condition, row),
        QueryFilter::Group {
            operator: LogicalOperator::And,
            filters,
        } => filters.iter().all(|f| matches_filter(f, row)),
        QueryFilter::Group {
            operator: LogicalOperator::Or,
            filters,
        } => filters.iter().any(|f| matches_filter(f, row)),
    }
}

fn matches_condition(condition: &QueryCondition, row: &Row) -> bool {
    let actual = row.get(&condition.field).unwrap_or(&Value::Null);
    let expected = condition.value.as_ref().filter(|v| !v.is_null());

    match (condition.operator, expected) {
        (QueryOperator::IsNull, _) | (QueryOperator::Eq, None) => actual.is_null(),
        (QueryOperator::IsNotNull, _) | (QueryOperator::Ne, None) => !actual.is_null(),
        (QueryOperator::Eq, Some(v)) => values_equal(actual, v),
        (QueryOperator::Ne, Some(v)) => {
            !actual.is_null() && compare_values(actual, v).map_or(true, |o| o != Ordering::Equal)
        }
        (QueryOperator::Gt, Some(v)) => compare_values(actual, v) == Some(Ordering::Greater),
        (QueryOperator::Gte, Some(v)) => matches!(
            compare_values(actual, v),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        (QueryOperator::Lt, Some(v)) => compare_values(actual, v) == Some(Ordering::Less),
        (QueryOperator::Lte, Some(v)) => matches!(
            compare_values(actual, v),
            Some(Ordering::Less | Ordering::Equal)
        ),
        (QueryOperator::Like, Some(Value::String(pattern))) => match actual {
            Value::String(text) => like_match(text, pattern),
            _ => false,
        },
        (QueryOperator::ILike, Some(Value::String(pattern))) => match actual {
            Value::String(text) => like_match(&text.to_lowercase(), &pattern.to_lowercase()),
            _ => false,
        },
        (QueryOperator::In, Some(Value::Array(values))) => {
            values.iter().any(|v| values_equal(actual, v))
        }
        (QueryOperator::NotIn, Some(Value::Array(values))) => {
            values.is_empty()
                || (!actual.is_null() && !values.iter().any(|v| values_equal(actual, v)))
        }
        (QueryOperator::NotIn, None) => true,
        _ => false,
    }
}

/// SQL LIKE matching: `%` is any run of characters, `_` exactly one
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = backtrack {
            p = star_p + 1;
            t = star_t + 1;
            backtrack = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Task {
        id: i64,
        title: String,
        priority: i32,
        archived_at: Option<String>,
    }

    impl TableMetadata for Task {
        type Id = i64;

        fn table_name() -> &'static str {
            "tasks"
        }

        fn columns() -> &'static [&'static str] {
            &["id", "title", "priority", "archived_at"]
        }

        fn extract_id(&self) -> i64 {
            self.id
        }
    }

    fn task(id: i64, title: &str, priority: i32) -> Task {
        Task {
            id,
            title: title.to_string(),
            priority,
            archived_at: None,
        }
    }

    async fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::new();
        for t in [task(1, "Write docs", 2), task(2, "Fix bug", 5), task(3, "Review", 3)] {
            Backend::<Task>::insert(&backend, &t).await.unwrap();
        }
        backend
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_limits() {
        let backend = seeded().await;
        let query = QueryBuilder::new()
            .filter(QueryFilter::gte("priority", json!(3)))
            .order_by("priority", SortOrder::Desc);

        let rows = Backend::<Task>::select(&backend, &query).await.unwrap();
        assert_eq!(rows.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3]);

        let rows = Backend::<Task>::select(&backend, &query.limit(1).offset(1))
            .await
            .unwrap();
        assert_eq!(rows, vec![task(3, "Review", 3)]);
    }

    #[tokio::test]
    async fn test_count_and_delete_row() {
        let backend = seeded().await;

        assert_eq!(Backend::<Task>::count(&backend, &QueryBuilder::new()).await.unwrap(), 3);
        assert!(Backend::<Task>::delete_row(&backend, &2).await.unwrap());
        assert!(!Backend::<Task>::delete_row(&backend, &2).await.unwrap());
        assert_eq!(backend.raw_rows("tasks").len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let backend = seeded().await;
        let result = Backend::<Task>::insert(&backend, &task(1, "Again", 1)).await;
        assert!(matches!(result, Err(StoreError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_update_columns_writes_only_named_columns() {
        let backend = seeded().await;
        let mut stale = task(1, "Stale title", 2);
        stale.priority = 9;

        let changes = UpdateSet::new().set("priority", json!(7));
        let stored = backend.update_columns(&stale, &changes).await.unwrap().unwrap();

        assert_eq!(stored.priority, 7);
        assert_eq!(stored.title, "Write docs");
    }

    #[tokio::test]
    async fn test_update_columns_current_timestamp() {
        let backend = seeded().await;
        let before = Utc::now();

        let changes = UpdateSet::new().set_current_timestamp("archived_at");
        let stored = backend
            .update_columns(&task(3, "Review", 3), &changes)
            .await
            .unwrap()
            .unwrap();

        let stamped = chrono::DateTime::parse_from_rfc3339(stored.archived_at.as_deref().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        assert!(stamped >= before - chrono::Duration::milliseconds(1));
        assert!(stamped <= Utc::now());
    }

    #[tokio::test]
    async fn test_update_columns_missing_row() {
        let backend = seeded().await;
        let changes = UpdateSet::new().set("priority", json!(1));
        let result = backend.update_columns(&task(99, "Ghost", 0), &changes).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rejected_column_fails_update() {
        let backend = seeded().await;
        backend.reject_writes_to("priority");

        let changes = UpdateSet::new().set("priority", json!(1));
        let result = backend.update_columns(&task(1, "Write docs", 2), &changes).await;
        assert!(matches!(result, Err(StoreError::DatabaseError(_))));

        backend.accept_writes_to("priority");
        let result = backend.update_columns(&task(1, "Write docs", 2), &changes).await;
        assert!(matches!(result, Ok(Some(_))));
    }

    #[tokio::test]
    async fn test_undecodable_update_leaves_row_intact() {
        let backend = seeded().await;
        let before = backend.raw_rows("tasks");

        let changes = UpdateSet::new().set("priority", json!(true));
        let result = backend.update_columns(&task(1, "Write docs", 2), &changes).await;
        assert!(matches!(result, Err(StoreError::SerializationError(_))));

        assert_eq!(backend.raw_rows("tasks"), before);
        let rows = Backend::<Task>::select(&backend, &QueryBuilder::new()).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_ids_above_f64_precision_stay_distinct() {
        let backend = MemoryBackend::new();
        let low = 9_007_199_254_740_992_i64;
        let high = low + 1;
        Backend::<Task>::insert(&backend, &task(low, "low", 1)).await.unwrap();
        Backend::<Task>::insert(&backend, &task(high, "high", 1)).await.unwrap();

        let query = QueryBuilder::new().filter(QueryFilter::eq("id", json!(high)));
        let rows = Backend::<Task>::select(&backend, &query).await.unwrap();
        assert_eq!(rows, vec![task(high, "high", 1)]);

        let ordered = Backend::<Task>::select(
            &backend,
            &QueryBuilder::new().order_by("id", SortOrder::Desc),
        )
        .await
        .unwrap();
        assert_eq!(ordered[0].id, high);
    }

    #[test]
    fn test_number_comparison_mixes_signs_and_floats() {
        assert_eq!(compare_values(&json!(-1), &json!(u64::MAX)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(u64::MAX), &json!(-1)), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(2), &json!(2.0)), Some(Ordering::Equal));
        assert_eq!(compare_values(&json!(1.5), &json!(2)), Some(Ordering::Less));
    }

    #[test]
    fn test_null_semantics() {
        let row: Row = serde_json::from_value(json!({"id": 1, "archived_at": null})).unwrap();

        assert!(matches_filter(&QueryFilter::is_null("archived_at"), &row));
        assert!(matches_filter(&QueryFilter::eq("archived_at", json!(null)), &row));
        assert!(!matches_filter(&QueryFilter::ne("archived_at", json!("x")), &row));
        assert!(!matches_filter(
            &QueryFilter::not_in_values("archived_at", vec![json!("x")]),
            &row
        ));
        assert!(matches_filter(&QueryFilter::is_null("missing_column"), &row));
    }

    #[test]
    fn test_groups_and_lists() {
        let row: Row = serde_json::from_value(json!({"status": "open", "priority": 2})).unwrap();

        let filter = QueryFilter::or(vec![
            QueryFilter::eq("status", json!("closed")),
            QueryFilter::in_values("priority", vec![json!(1), json!(2)]),
        ]);
        assert!(matches_filter(&filter, &row));
        assert!(!matches_filter(&QueryFilter::or(vec![]), &row));
        assert!(matches_filter(&QueryFilter::and(vec![]), &row));
        assert!(!matches_filter(&QueryFilter::in_values("priority", vec![]), &row));
    }

    #[test]
    fn test_like_patterns() {
        assert!(like_match("soft delete", "soft%"));
        assert!(like_match("soft delete", "%del_te"));
        assert!(like_match("abc", "%"));
        assert!(!like_match("abc", "a_"));
        assert!(!like_match("abc", "%d%"));

        let row: Row = serde_json::from_value(json!({"title": "Fix Bug"})).unwrap();
        assert!(matches_filter(&QueryFilter::ilike("title", "fix%"), &row));
        assert!(!matches_filter(&QueryFilter::like("title", "fix%"), &row));
    }
}
