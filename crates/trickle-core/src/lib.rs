//! Trickle Core: Traits and types for bounded-memory table traversal
//!
//! This crate defines the abstractions shared by every trickle backend:
//! - `Connector` / `RowSource`: open a connection and run one read query
//! - `Row` / `FieldValue`: result rows as ordered field-name/value mappings
//! - `UserRecord`: the decoded unit entity every stream yields
//! - `ConnectionGauge`: shared count of live connections, released on drop
//!
//! Key properties:
//! - Every stream owns exactly one connection for exactly as long as it runs
//! - Connection failures surface from the call, never as a partial stream
//! - Connections are released on exhaustion, error and early abandonment

pub mod config;
pub mod error;
pub mod lease;
pub mod observe;
pub mod traits;
pub mod types;

pub use config::{SourceConfig, StreamConfig, TrickleConfig};
pub use error::{Result, TrickleError};
pub use lease::{ConnectionGauge, ConnectionLease};
pub use traits::{Connector, RowSource, RowsOf};
pub use types::{decode_age, FieldValue, Row, UserRecord};
