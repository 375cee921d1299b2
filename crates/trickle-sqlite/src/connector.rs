//! SQLite Connector
//!
//! Opens one SQLite connection per row source. Connections are read-only
//! by default and every one of them is tracked by a shared gauge until the
//! row handle that owns it is finished.

use crate::source::SqliteRowSource;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use trickle_core::{
    error::{Result, TrickleError},
    ConnectionGauge, Connector, SourceConfig,
};

/// Connector for a single SQLite database file
///
/// Cheap to clone; clones share the same connection gauge.
///
/// # Example
///
/// ```ignore
/// let connector = SqliteConnector::new(SourceConfig::new("users.db".into()));
/// let rows = connector.connect()?.execute_query("SELECT age FROM user_data", &[])?;
/// // Connection is released when `rows` is exhausted or dropped
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    config: Arc<SourceConfig>,
    gauge: ConnectionGauge,
}

impl SqliteConnector {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config: Arc::new(config),
            gauge: ConnectionGauge::new(),
        }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Get the database path
    pub fn db_path(&self) -> &Path {
        &self.config.path
    }

    /// Shared gauge of connections opened by this connector
    pub fn gauge(&self) -> &ConnectionGauge {
        &self.gauge
    }

    /// Number of connections currently held by live row handles
    pub fn open_connections(&self) -> usize {
        self.gauge.open_connections()
    }

    fn open_flags(&self) -> OpenFlags {
        let mode = if self.config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };
        mode | OpenFlags::SQLITE_OPEN_NO_MUTEX
    }
}

impl Connector for SqliteConnector {
    type Source = SqliteRowSource;

    fn connect(&self) -> Result<Self::Source> {
        let conn = Connection::open_with_flags(&self.config.path, self.open_flags()).map_err(
            |e| {
                TrickleError::Connection(format!(
                    "cannot open {}: {}",
                    self.config.path.display(),
                    e
                ))
            },
        )?;

        conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))
            .map_err(|e| TrickleError::Connection(e.to_string()))?;

        tracing::debug!(path = %self.config.path.display(), "opened connection");
        Ok(SqliteRowSource::new(conn, self.gauge.acquire()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_database_is_connection_error() {
        let temp_dir = TempDir::new().unwrap();
        let connector = SqliteConnector::new(SourceConfig::new(temp_dir.path().join("nope.db")));

        let err = connector.connect().unwrap_err();
        assert!(err.is_connection());
        assert_eq!(connector.open_connections(), 0);
        assert!(!temp_dir.path().join("nope.db").exists());
    }

    #[test]
    fn test_connect_tracks_open_connections() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("users.db");
        Connection::open(&db_path)
            .unwrap()
            .execute_batch("CREATE TABLE user_data (age INTEGER)")
            .unwrap();

        let connector = SqliteConnector::new(SourceConfig::new(db_path));
        let first = connector.connect().unwrap();
        let second = connector.clone().connect().unwrap();
        assert_eq!(connector.open_connections(), 2);

        drop(first);
        assert_eq!(connector.open_connections(), 1);
        drop(second);
        assert_eq!(connector.open_connections(), 0);
    }
}
