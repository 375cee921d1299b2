//! SQLite-backed row source implementation
//!
//! Provides lazy, bounded-memory access to rows of a SQLite table.
//!
//! Key features:
//! - One read-only connection per stream, opened with explicit config
//! - Cursor runs on a worker thread and steps only when the consumer pulls
//! - Connection closed on exhaustion, error, or drop of the row handle

pub mod connector;
pub mod cursor;
pub mod source;

pub use connector::SqliteConnector;
pub use cursor::SqliteRows;
pub use source::SqliteRowSource;
