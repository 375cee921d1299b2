//! Offset pagination
//!
//! [`Paginator`] fetches one `LIMIT`/`OFFSET` page per call on a fresh
//! connection. [`LazyPaginationStream`] keeps a single offset and asks for
//! the next page only when pulled, ending at the first empty page.
//!
//! Pages are independent queries: if the table changes during a run, rows
//! can be skipped or repeated. This is not detected.

use crate::batch::positive;
use crate::table::UserTable;
use std::num::NonZeroUsize;
use std::time::Instant;
use trickle_core::{
    error::{Result, TrickleError},
    observe, Connector, FieldValue, Row, RowSource, UserRecord,
};

/// Fetches single pages of the user table
#[derive(Debug, Clone)]
pub struct Paginator<C> {
    table: UserTable<C>,
}

impl<C: Connector> Paginator<C> {
    pub fn new(table: UserTable<C>) -> Self {
        Self { table }
    }

    /// Skip `offset` rows and return up to `page_size` rows
    ///
    /// Returns an empty page once `offset` is past the last row. The
    /// connection is closed before this returns.
    pub fn fetch_page(&self, page_size: usize, offset: u64) -> Result<Vec<UserRecord>> {
        let limit = sql_int(page_limit(page_size)?.get() as u64, "page size")?;
        let skip = sql_int(offset, "offset")?;

        let start = Instant::now();
        let rows = self.table.connector().connect()?.fetch_all(
            &self.table.select_page_sql(),
            &[FieldValue::Integer(limit), FieldValue::Integer(skip)],
        )?;
        let page = rows
            .into_iter()
            .map(<UserRecord as TryFrom<Row>>::try_from)
            .collect::<Result<Vec<_>>>()?;

        observe::record_page_fetch(start.elapsed(), page.len());
        tracing::debug!(
            table = self.table.name(),
            offset,
            rows = page.len(),
            "fetched page"
        );
        Ok(page)
    }
}

/// A page size that is positive and fits a SQL `LIMIT`
fn page_limit(page_size: usize) -> Result<NonZeroUsize> {
    let page_size = positive(page_size, "page size")?;
    sql_int(page_size.get() as u64, "page size")?;
    Ok(page_size)
}

fn sql_int(value: u64, what: &str) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| TrickleError::InvalidArgument(format!("{} out of range: {}", what, value)))
}

/// Pages of the user table, fetched on demand
///
/// A short final page is yielded normally; the following pull fetches an
/// empty page and ends the stream.
pub struct LazyPaginationStream<C> {
    paginator: Paginator<C>,
    page_size: NonZeroUsize,
    offset: u64,
    finished: bool,
}

impl<C: Connector> LazyPaginationStream<C> {
    pub fn new(paginator: Paginator<C>, page_size: NonZeroUsize) -> Self {
        Self {
            paginator,
            page_size,
            offset: 0,
            finished: false,
        }
    }

    /// Offset the next pull will fetch from
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }
}

impl<C: Connector> Iterator for LazyPaginationStream<C> {
    type Item = Result<Vec<UserRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self
            .paginator
            .fetch_page(self.page_size.get(), self.offset)
        {
            Ok(page) if page.is_empty() => {
                self.finished = true;
                None
            }
            Ok(page) => {
                self.offset = self.offset.saturating_add(self.page_size.get() as u64);
                Some(Ok(page))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<C: Connector> UserTable<C> {
    pub fn paginator(&self) -> Paginator<C> {
        Paginator::new(self.clone())
    }

    /// Fetch one page; see [`Paginator::fetch_page`]
    pub fn fetch_page(&self, page_size: usize, offset: u64) -> Result<Vec<UserRecord>> {
        self.paginator().fetch_page(page_size, offset)
    }

    /// Lazily page through the table starting at offset 0
    ///
    /// No connection is opened until the first pull.
    pub fn lazy_paginate(&self, page_size: usize) -> Result<LazyPaginationStream<C>> {
        let page_size = page_limit(page_size)?;
        Ok(LazyPaginationStream::new(self.paginator(), page_size))
    }
}
