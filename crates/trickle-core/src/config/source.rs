use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the data source every stream connects to
///
/// Passed explicitly into each connector; there is no process-wide
/// connection state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,

    /// Table holding the user rows
    /// Default: "user_data"
    #[serde(default = "default_table")]
    pub table: String,

    /// Open connections read-only (default: true)
    ///
    /// Streams only ever read. A read-only open also refuses to create a
    /// missing database file, so a wrong path fails at connect time.
    #[serde(default = "default_true")]
    pub read_only: bool,

    /// How long a query waits on a locked database, in milliseconds (default: 5000)
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

fn default_table() -> String {
    "user_data".to_string()
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout() -> u64 {
    5000
}

impl SourceConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: default_table(),
            read_only: default_true(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_busy_timeout(mut self, timeout_ms: u64) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_when_missing() {
        let cfg: SourceConfig = serde_json::from_str(r#"{"path": "users.db"}"#).unwrap();
        assert_eq!(cfg.path, PathBuf::from("users.db"));
        assert_eq!(cfg.table, "user_data");
        assert!(cfg.read_only);
        assert_eq!(cfg.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = SourceConfig::new(PathBuf::from("a.db"))
            .with_table("people")
            .with_read_only(false)
            .with_busy_timeout(250);
        assert_eq!(cfg.table, "people");
        assert!(!cfg.read_only);
        assert_eq!(cfg.busy_timeout_ms, 250);
    }
}
