//! SQLite fixtures for command tests

use rusqlite::{params, Connection};
use tempfile::TempDir;
use trickle::TrickleDb;

pub(crate) fn create_test_db(ages: &[u32]) -> (TrickleDb, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("users.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE user_data (user_id TEXT PRIMARY KEY, name TEXT, email TEXT, age INTEGER)",
    )
    .unwrap();
    for (i, age) in ages.iter().enumerate() {
        conn.execute(
            "INSERT INTO user_data VALUES (?1, ?2, ?3, ?4)",
            params![
                format!("id-{}", i),
                format!("User {}", i),
                format!("user{}@example.com", i),
                age
            ],
        )
        .unwrap();
    }
    drop(conn);

    (TrickleDb::open(&path).unwrap(), temp_dir)
}
