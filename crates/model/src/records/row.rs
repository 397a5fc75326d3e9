use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

/// One hydrated row: the entity it was read from plus its full attribute set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    /// Names of all columns present on this row.
    pub fn columns(&self) -> Vec<String> {
        self.field_values.iter().map(|f| f.name.clone()).collect()
    }
}
