use crate::error::{Result, TrickleError};
use crate::types::row::{FieldValue, Row};
use serde::{Deserialize, Serialize};

/// A user row as read from the table
///
/// Rows are created by the import tooling and are read-only here.
/// Decoding rejects any row with a missing or null field, or an empty
/// `name` or `email`, rather than skipping it, so a stream never silently
/// shrinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl UserRecord {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        age: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            age,
        }
    }
}

impl TryFrom<Row> for UserRecord {
    type Error = TrickleError;

    fn try_from(row: Row) -> Result<Self> {
        Ok(Self {
            user_id: text_field(&row, "user_id")?,
            name: non_empty_text_field(&row, "name")?,
            email: non_empty_text_field(&row, "email")?,
            age: decode_age(&row)?,
        })
    }
}

/// Decode the `age` column of a row
pub fn decode_age(row: &Row) -> Result<u32> {
    match field(row, "age")? {
        FieldValue::Integer(v) => u32::try_from(*v)
            .map_err(|_| TrickleError::Decode(format!("age out of range: {}", v))),
        other => Err(type_mismatch("age", "INTEGER", other)),
    }
}

fn field<'r>(row: &'r Row, name: &str) -> Result<&'r FieldValue> {
    match row.get(name) {
        None => Err(TrickleError::Decode(format!("missing column '{}'", name))),
        Some(FieldValue::Null) => Err(TrickleError::Decode(format!("column '{}' is NULL", name))),
        Some(value) => Ok(value),
    }
}

fn text_field(row: &Row, name: &str) -> Result<String> {
    match field(row, name)? {
        FieldValue::Text(s) => Ok(s.clone()),
        other => Err(type_mismatch(name, "TEXT", other)),
    }
}

fn non_empty_text_field(row: &Row, name: &str) -> Result<String> {
    let value = text_field(row, name)?;
    if value.is_empty() {
        return Err(TrickleError::Decode(format!("column '{}' is empty", name)));
    }
    Ok(value)
}

fn type_mismatch(name: &str, expected: &str, got: &FieldValue) -> TrickleError {
    TrickleError::Decode(format!(
        "column '{}' expected {}, got {}",
        name,
        expected,
        got.type_name()
    ))
}
