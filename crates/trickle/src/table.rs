//! The user table as seen by every stream
//!
//! `UserTable` pairs a connector with the table name and builds the few
//! read queries the streams issue. The traversal operations themselves are
//! added by the `scan`, `batch`, `pagination` and `aggregate` modules.

use std::sync::Arc;
use trickle_core::{error::Result, Connector, FieldValue, RowSource, RowsOf};

/// Handle to one user table behind a connector
///
/// Cheap to clone. Holds no connection itself: every stream opened from it
/// connects on its own.
#[derive(Debug, Clone)]
pub struct UserTable<C> {
    connector: C,
    name: Arc<str>,
    quoted: Arc<str>,
}

impl<C: Connector> UserTable<C> {
    pub fn new(connector: C, table: impl Into<String>) -> Self {
        let name: String = table.into();
        let quoted = quote_identifier(&name);
        Self {
            connector,
            name: name.into(),
            quoted: quoted.into(),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Unquoted table name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn select_users_sql(&self) -> String {
        format!("SELECT user_id, name, email, age FROM {}", self.quoted)
    }

    pub(crate) fn select_page_sql(&self) -> String {
        format!("{} LIMIT ?1 OFFSET ?2", self.select_users_sql())
    }

    pub(crate) fn select_ages_sql(&self) -> String {
        format!("SELECT age FROM {}", self.quoted)
    }

    /// Connect and start one lazy query
    pub(crate) fn open_rows(&self, sql: &str, params: &[FieldValue]) -> Result<RowsOf<C>> {
        self.connector.connect()?.execute_query(sql, params)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryConnector;

    #[test]
    fn test_queries_quote_table_name() {
        let table = UserTable::new(MemoryConnector::with_ages(&[]), "user\"data");
        assert_eq!(table.name(), "user\"data");
        assert_eq!(
            table.select_users_sql(),
            "SELECT user_id, name, email, age FROM \"user\"\"data\""
        );
        assert!(table.select_page_sql().ends_with("LIMIT ?1 OFFSET ?2"));
        assert_eq!(table.select_ages_sql(), "SELECT age FROM \"user\"\"data\"");
    }
}
