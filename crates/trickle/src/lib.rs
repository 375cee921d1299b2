//! Trickle: bounded-memory traversal of large SQL tables
//!
//! Trickle reads a user table without ever materializing it:
//! - **Row streaming**: one record per pull from a single lazy query
//! - **Batching**: fixed-size chunks, plus filtering applied per chunk
//! - **Pagination**: `LIMIT`/`OFFSET` pages, fetched on demand
//! - **Aggregation**: single-pass running sum and count
//! - **Async**: any of the above as a `futures::Stream`
//!
//! Every stream owns its own connection and gives it back as soon as it is
//! exhausted, fails, or is dropped.
//!
//! # Quick Start
//!
//! ```no_run
//! use trickle::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let db = TrickleDb::open("./users.db")?;
//!
//! for user in db.stream()? {
//!     let user = user?;
//!     println!("{} is {}", user.name, user.age);
//! }
//!
//! for batch in db.stream_in_batches(50)? {
//!     println!("batch of {}", batch?.len());
//! }
//!
//! println!("average age: {:?}", db.average_age()?);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod async_stream;
pub mod batch;
pub mod db;
pub mod pagination;
pub mod prelude;
pub mod scan;
pub mod table;

#[cfg(test)]
mod testing;

// Re-export core types
pub use trickle_core::{
    config::{SourceConfig, StreamConfig, TrickleConfig},
    error::{Result, TrickleError},
    traits::{Connector, RowSource, RowsOf},
    types::{FieldValue, Row, UserRecord},
    ConnectionGauge, ConnectionLease,
};

// Re-export implementations
pub use trickle_sqlite::{SqliteConnector, SqliteRowSource, SqliteRows};

// Re-export main types from this crate
pub use aggregate::RunningAggregator;
pub use async_stream::AsyncStream;
pub use batch::{
    is_over_age_threshold, AdultUsers, BatchFilter, BatchStream, UserBatches, AGE_THRESHOLD,
};
pub use db::TrickleDb;
pub use pagination::{LazyPaginationStream, Paginator};
pub use scan::{AgeStream, RowStream, Scan};
pub use table::UserTable;
