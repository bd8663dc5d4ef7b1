use serde_json::Value;

/// Value written to a single column by a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperation {
    /// Set field to a specific value: field = $N
    Set(Value),

    /// Set field to the database clock at write time: field = NOW()
    ///
    /// The timestamp is produced by the persistence layer, never by the caller.
    CurrentTimestamp,
}

impl UpdateOperation {
    /// Generate the SQL assignment for this operation
    pub fn to_sql(&self, field_name: &str, param_number: usize) -> String {
        match self {
            UpdateOperation::Set(_) => format!("{} = ${}", field_name, param_number),
            UpdateOperation::CurrentTimestamp => format!("{} = NOW()", field_name),
        }
    }

    /// Get the value to bind as a parameter, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            UpdateOperation::Set(v) => Some(v),
            UpdateOperation::CurrentTimestamp => None,
        }
    }
}

/// Ordered set of column assignments for a partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    operations: Vec<(String, UpdateOperation)>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a specific value
    pub fn set(self, field: impl Into<String>, value: Value) -> Self {
        self.with(field.into(), UpdateOperation::Set(value))
    }

    /// Set a field to the server-side current timestamp
    pub fn set_current_timestamp(self, field: impl Into<String>) -> Self {
        self.with(field.into(), UpdateOperation::CurrentTimestamp)
    }

    // A repeated field replaces the earlier assignment in place
    fn with(mut self, field: String, operation: UpdateOperation) -> Self {
        match self.operations.iter_mut().find(|(name, _)| *name == field) {
            Some(existing) => existing.1 = operation,
            None => self.operations.push((field, operation)),
        }
        self
    }

    /// Check if there are any operations
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Names of the columns this update writes
    pub fn columns(&self) -> Vec<&str> {
        self.operations.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UpdateOperation)> {
        self.operations.iter().map(|(name, op)| (name.as_str(), op))
    }

    /// Build the SET clause body, numbering placeholders from `first_param`
    ///
    /// Returns the assignments and the values to bind, in placeholder order.
    pub fn build_set_clause(&self, first_param: usize) -> (String, Vec<Value>) {
        let mut values = Vec::new();
        let mut param_number = first_param;

        let assignments: Vec<String> = self
            .operations
            .iter()
            .map(|(field, op)| {
                let sql = op.to_sql(field, param_number);
                if let Some(value) = op.value() {
                    values.push(value.clone());
                    param_number += 1;
                }
                sql
            })
            .collect();

        (assignments.join(", "), values)
    }
}
