use crate::cursor::SqliteRows;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Statement};
use std::sync::Arc;
use trickle_core::{
    error::{Result, TrickleError},
    observe, ConnectionLease, FieldValue, Row, RowSource,
};

/// A single open SQLite connection, ready to run one read query
#[derive(Debug)]
pub struct SqliteRowSource {
    conn: Connection,
    lease: ConnectionLease,
}

impl SqliteRowSource {
    pub(crate) fn new(conn: Connection, lease: ConnectionLease) -> Self {
        Self { conn, lease }
    }

    /// Get direct access to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn into_parts(self) -> (Connection, ConnectionLease) {
        (self.conn, self.lease)
    }
}

impl RowSource for SqliteRowSource {
    type Rows = SqliteRows;

    fn execute_query(self, sql: &str, params: &[FieldValue]) -> Result<Self::Rows> {
        tracing::debug!(sql, params = params.len(), "executing query");
        SqliteRows::spawn(self, sql.to_string(), to_sql_values(params))
    }

    fn fetch_all(self, sql: &str, params: &[FieldValue]) -> Result<Vec<Row>> {
        tracing::debug!(sql, params = params.len(), "executing bounded query");
        let (conn, lease) = self.into_parts();
        let rows = collect_rows(&conn, sql, &to_sql_values(params));
        close(conn);
        drop(lease);
        rows.map_err(query_error)
    }
}

fn collect_rows(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let columns = column_names(&stmt);
    let mut cursor = stmt.query(params_from_iter(params.iter()))?;

    let mut rows = Vec::new();
    while let Some(row) = cursor.next()? {
        rows.push(decode_row(&columns, row)?);
    }
    Ok(rows)
}

pub(crate) fn column_names(stmt: &Statement<'_>) -> Arc<[String]> {
    stmt.column_names()
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn decode_row(
    columns: &Arc<[String]>,
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<Row> {
    let values = (0..columns.len())
        .map(|i| row.get::<_, Value>(i).map(from_sql_value))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(Row::new(Arc::clone(columns), values))
}

pub(crate) fn close(conn: Connection) {
    if let Err((_, e)) = conn.close() {
        tracing::warn!("Failed to close connection cleanly: {}", e);
    }
}

pub(crate) fn query_error(e: rusqlite::Error) -> TrickleError {
    observe::record_query_failure();
    TrickleError::Query(e.to_string())
}

fn from_sql_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Integer(v) => FieldValue::Integer(v),
        Value::Real(v) => FieldValue::Real(v),
        Value::Text(s) => FieldValue::Text(s),
        Value::Blob(b) => FieldValue::Blob(b),
    }
}

fn to_sql_values(params: &[FieldValue]) -> Vec<Value> {
    params
        .iter()
        .map(|p| match p {
            FieldValue::Null => Value::Null,
            FieldValue::Integer(v) => Value::Integer(*v),
            FieldValue::Real(v) => Value::Real(*v),
            FieldValue::Text(s) => Value::Text(s.clone()),
            FieldValue::Blob(b) => Value::Blob(b.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteConnector;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use trickle_core::{Connector, SourceConfig};

    fn create_test_db() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE user_data (user_id TEXT PRIMARY KEY, name TEXT NOT NULL, email TEXT NOT NULL, age INTEGER NOT NULL);
             INSERT INTO user_data VALUES ('u1', 'Ada', 'ada@example.com', 36);
             INSERT INTO user_data VALUES ('u2', 'Grace', 'grace@example.com', 45);
             INSERT INTO user_data VALUES ('u3', 'Linus', 'linus@example.com', 21);",
        )
        .unwrap();
        drop(conn);

        (temp_dir, db_path)
    }

    #[test]
    fn test_fetch_all_with_params() {
        let (_temp_dir, db_path) = create_test_db();
        let connector = SqliteConnector::new(SourceConfig::new(db_path));

        let rows = connector
            .connect()
            .unwrap()
            .fetch_all(
                "SELECT name, age FROM user_data LIMIT ?1 OFFSET ?2",
                &[FieldValue::Integer(2), FieldValue::Integer(1)],
            )
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].columns(), ["name".to_string(), "age".to_string()]);
        assert_eq!(rows[0].get("name"), Some(&FieldValue::from("Grace")));
        assert_eq!(rows[1].get("age"), Some(&FieldValue::Integer(21)));
        assert_eq!(connector.open_connections(), 0);
    }

    #[test]
    fn test_fetch_all_bad_query_releases_connection() {
        let (_temp_dir, db_path) = create_test_db();
        let connector = SqliteConnector::new(SourceConfig::new(db_path));

        let err = connector
            .connect()
            .unwrap()
            .fetch_all("SELECT nope FROM user_data", &[])
            .unwrap_err();

        assert!(err.is_query());
        assert_eq!(connector.open_connections(), 0);
    }
}
