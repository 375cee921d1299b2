//! Unified Trickle database interface
//!
//! Provides a single entry point over a SQLite user table: configuration,
//! the connector, and every traversal strategy.

use crate::aggregate::RunningAggregator;
use crate::async_stream::AsyncStream;
use crate::batch::{AdultUsers, UserBatches};
use crate::pagination::LazyPaginationStream;
use crate::scan::{AgeStream, RowStream};
use crate::table::UserTable;
use std::path::Path;
use trickle_core::{
    error::{Result, TrickleError},
    SourceConfig, StreamConfig, TrickleConfig, UserRecord,
};
use trickle_sqlite::{SqliteConnector, SqliteRows};

/// Unified Trickle database
///
/// Holds configuration only. Every stream opened through it acquires its
/// own connection and releases it when finished or dropped.
#[derive(Debug, Clone)]
pub struct TrickleDb {
    users: UserTable<SqliteConnector>,
    stream_config: StreamConfig,
}

impl TrickleDb {
    /// Open a database file with default settings
    ///
    /// Does not connect; a missing or unreadable file is reported by the
    /// first stream opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(TrickleConfig::new(path.as_ref().to_path_buf()))
    }

    /// Open with custom configuration
    pub fn open_with_config(config: TrickleConfig) -> Result<Self> {
        validate(&config)?;
        let TrickleConfig { source, stream } = config;
        let table = source.table.clone();

        tracing::debug!(path = %source.path.display(), table = %table, "opening trickle db");
        Ok(Self {
            users: UserTable::new(SqliteConnector::new(source), table),
            stream_config: stream,
        })
    }

    /// Get reference to the user table
    pub fn users(&self) -> &UserTable<SqliteConnector> {
        &self.users
    }

    pub fn connector(&self) -> &SqliteConnector {
        self.users.connector()
    }

    pub fn source_config(&self) -> &SourceConfig {
        self.connector().config()
    }

    pub fn stream_config(&self) -> &StreamConfig {
        &self.stream_config
    }

    /// Connections currently held by live streams
    pub fn open_connections(&self) -> usize {
        self.connector().open_connections()
    }

    pub fn stream(&self) -> Result<RowStream<SqliteRows>> {
        self.users.stream()
    }

    pub fn stream_in_batches(&self, batch_size: usize) -> Result<UserBatches<SqliteConnector>> {
        self.users.stream_in_batches(batch_size)
    }

    pub fn batch_process(&self, batch_size: usize) -> Result<AdultUsers<SqliteConnector>> {
        self.users.batch_process(batch_size)
    }

    pub fn fetch_page(&self, page_size: usize, offset: u64) -> Result<Vec<UserRecord>> {
        self.users.fetch_page(page_size, offset)
    }

    pub fn lazy_paginate(&self, page_size: usize) -> Result<LazyPaginationStream<SqliteConnector>> {
        self.users.lazy_paginate(page_size)
    }

    pub fn stream_ages(&self) -> Result<AgeStream<SqliteRows>> {
        self.users.stream_ages()
    }

    pub fn average_age(&self) -> Result<Option<f64>> {
        self.users.average_age()
    }

    /// Sum, count and mean of ages in one pass
    pub fn age_summary(&self) -> Result<RunningAggregator> {
        RunningAggregator::consume(self.users.stream_ages()?)
    }

    /// Async full scan buffered by `StreamConfig::async_buffer`
    pub fn stream_async(&self) -> Result<AsyncStream<UserRecord>> {
        self.users.stream_async(self.stream_config.async_buffer)
    }

    /// Async pagination buffered by `StreamConfig::async_buffer`
    pub fn lazy_paginate_async(&self, page_size: usize) -> Result<AsyncStream<Vec<UserRecord>>> {
        self.users
            .lazy_paginate_async(page_size, self.stream_config.async_buffer)
    }
}

fn validate(config: &TrickleConfig) -> Result<()> {
    if config.source.table.trim().is_empty() {
        return Err(TrickleError::Config("table name must not be empty".into()));
    }
    if config.stream.batch_size == 0 {
        return Err(TrickleError::Config("batch_size must be positive".into()));
    }
    if config.stream.page_size == 0 {
        return Err(TrickleError::Config("page_size must be positive".into()));
    }
    Ok(())
}
