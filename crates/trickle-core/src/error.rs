use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrickleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The data source could not be opened. Fatal for the call that
    /// triggered it; no partial stream is ever returned.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A query was rejected or the cursor failed mid-stream.
    #[error("Query error: {0}")]
    Query(String),

    /// A row did not match the expected record shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl TrickleError {
    /// True for failures to reach the data source at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, TrickleError::Connection(_))
    }

    /// True for failures raised while a query was running.
    pub fn is_query(&self) -> bool {
        matches!(self, TrickleError::Query(_))
    }
}

pub type Result<T> = std::result::Result<T, TrickleError>;
