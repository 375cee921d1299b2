//! Trickle Prelude
//!
//! Import this to get all commonly used types and traits:
//!
//! ```
//! use trickle::prelude::*;
//! ```

// Core types
pub use crate::{FieldValue, Result, Row, TrickleDb, TrickleError, UserRecord};

// Configs
pub use crate::{SourceConfig, StreamConfig, TrickleConfig};

// Traits
pub use crate::{Connector, RowSource};

// Implementations
pub use crate::{SqliteConnector, UserTable};

// Streams
pub use crate::{
    AdultUsers, AgeStream, AsyncStream, BatchStream, LazyPaginationStream, RowStream,
    RunningAggregator, UserBatches,
};

// Re-export common external deps
pub use futures::StreamExt;
pub use tracing;
