use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single column value as returned by a row source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// SQL-ish type name, used in decode errors
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "NULL",
            FieldValue::Integer(_) => "INTEGER",
            FieldValue::Real(_) => "REAL",
            FieldValue::Text(_) => "TEXT",
            FieldValue::Blob(_) => "BLOB",
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("NULL"),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Real(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// One result row: an ordered field-name/value mapping
///
/// Column names are shared between all rows of one result set, so a row
/// only owns its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<FieldValue>,
}

impl Row {
    /// Build a row; `values` must line up with `columns`
    pub fn new(columns: Arc<[String]>, values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Look up a field by column name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| &self.values[i])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fields in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<FieldValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_by_name_and_order() {
        let row = Row::new(
            columns(&["age", "name"]),
            vec![FieldValue::Integer(30), FieldValue::from("Ada")],
        );

        assert_eq!(row.get("name").and_then(FieldValue::as_str), Some("Ada"));
        assert_eq!(row.get("age").and_then(FieldValue::as_i64), Some(30));
        assert!(row.get("email").is_none());

        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["age", "name"]);
    }
}
