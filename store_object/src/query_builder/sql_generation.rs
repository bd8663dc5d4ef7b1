//! SQL text generation for query builder parts
//!
//! Every value becomes a `$n` placeholder; callers bind the returned values in
//! order.

use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::SortOrder;
use serde_json::Value;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause from conditions, numbering placeholders from `first_param`
    pub fn build_where_clause(conditions: &[QueryFilter], first_param: usize) -> (String, Vec<Value>) {
        if conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut values = Vec::new();
        let mut param_counter = first_param;

        let conditions_sql = conditions
            .iter()
            .map(|condition| Self::build_condition_sql(condition, &mut values, &mut param_counter))
            .collect::<Vec<_>>()
            .join(" AND ");

        (format!("WHERE {}", conditions_sql), values)
    }

    fn build_condition_sql(
        filter: &QueryFilter,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> String {
        match filter {
            QueryFilter::Condition(condition) => {
                Self::build_single_condition_sql(condition, values, param_counter)
            }
            QueryFilter::Group { operator, filters } => {
                if filters.is_empty() {
                    // Neutral element of the group
                    return match operator {
                        LogicalOperator::And => "1=1".to_string(),
                        LogicalOperator::Or => "1=0".to_string(),
                    };
                }

                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, values, param_counter))
                    .collect::<Vec<_>>()
                    .join(operator_str);

                format!("({})", group_conditions)
            }
        }
    }

    fn next_param(value: &Value, values: &mut Vec<Value>, param_counter: &mut usize) -> String {
        values.push(value.clone());
        let param = format!("${}", param_counter);
        *param_counter += 1;
        param
    }

    fn build_single_condition_sql(
        condition: &QueryCondition,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> String {
        let field = &condition.field;

        let comparison = match condition.operator {
            QueryOperator::Eq => "=",
            QueryOperator::Ne => "!=",
            QueryOperator::Gt => ">",
            QueryOperator::Gte => ">=",
            QueryOperator::Lt => "<",
            QueryOperator::Lte => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::ILike => "ILIKE",
            QueryOperator::In | QueryOperator::NotIn => {
                return Self::build_list_condition_sql(condition, values, param_counter);
            }
            QueryOperator::IsNull => return format!("{} IS NULL", field),
            QueryOperator::IsNotNull => return format!("{} IS NOT NULL", field),
        };

        match (&condition.value, condition.operator) {
            (Some(Value::Null) | None, QueryOperator::Eq) => format!("{} IS NULL", field),
            (Some(Value::Null) | None, QueryOperator::Ne) => format!("{} IS NOT NULL", field),
            (Some(Value::Null) | None, _) => "1=0".to_string(), // Invalid condition
            (Some(value), _) => {
                let param = Self::next_param(value, values, param_counter);
                format!("{} {} {}", field, comparison, param)
            }
        }
    }

    fn build_list_condition_sql(
        condition: &QueryCondition,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> String {
        let negated = condition.operator == QueryOperator::NotIn;
        let array_values = match &condition.value {
            Some(Value::Array(array_values)) if !array_values.is_empty() => array_values,
            // Empty IN matches nothing, empty NOT IN matches everything
            _ => return if negated { "1=1".to_string() } else { "1=0".to_string() },
        };

        let placeholders: Vec<String> = array_values
            .iter()
            .map(|value| Self::next_param(value, values, param_counter))
            .collect();

        let keyword = if negated { "NOT IN" } else { "IN" };
        format!("{} {} ({})", condition.field, keyword, placeholders.join(", "))
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> String {
        if order_by.is_empty() {
            return String::new();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(field, order)| format!("{} {}", field, order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(limit: Option<i64>, offset: Option<i64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }
}
