//! Full-table scans
//!
//! A [`Scan`] decodes the rows of one lazy query into records. It owns the
//! row handle, and with it the connection, only until the handle reports
//! exhaustion or an error; after that the scan is fused and the connection
//! is already gone.

use crate::table::UserTable;
use trickle_core::{
    decode_age,
    error::Result,
    observe, Connector, Row, RowsOf, UserRecord,
};

/// Lazy sequence of decoded rows from one query
pub struct Scan<R, T> {
    rows: Option<R>,
    decode: fn(Row) -> Result<T>,
    label: &'static str,
}

/// Full scan yielding one `UserRecord` per pull
pub type RowStream<R> = Scan<R, UserRecord>;

/// Single-column scan yielding one age per pull
pub type AgeStream<R> = Scan<R, u32>;

impl<R, T> Scan<R, T>
where
    R: Iterator<Item = Result<Row>>,
{
    pub fn new(rows: R, decode: fn(Row) -> Result<T>, label: &'static str) -> Self {
        Self {
            rows: Some(rows),
            decode,
            label,
        }
    }

    /// True once the underlying rows are finished and released
    pub fn is_exhausted(&self) -> bool {
        self.rows.is_none()
    }
}

impl<R> Scan<R, UserRecord>
where
    R: Iterator<Item = Result<Row>>,
{
    pub fn users(rows: R) -> Self {
        Self::new(rows, <UserRecord as TryFrom<Row>>::try_from, "users")
    }
}

impl<R> Scan<R, u32>
where
    R: Iterator<Item = Result<Row>>,
{
    pub fn ages(rows: R) -> Self {
        Self::new(rows, |row| decode_age(&row), "ages")
    }
}

impl<R, T> Iterator for Scan<R, T>
where
    R: Iterator<Item = Result<Row>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.rows.as_mut()?;
        let decoded = match rows.next() {
            Some(Ok(row)) => (self.decode)(row),
            Some(Err(e)) => Err(e),
            None => {
                self.rows = None;
                return None;
            }
        };

        match decoded {
            Ok(item) => {
                observe::record_rows_yielded(self.label, 1);
                Some(Ok(item))
            }
            Err(e) => {
                self.rows = None;
                Some(Err(e))
            }
        }
    }
}

impl<C: Connector> UserTable<C> {
    /// Stream every user row, one record per pull
    ///
    /// Opens a dedicated connection. Connection failures are returned here;
    /// query failures surface from the pull that hits them. Each call starts
    /// a fresh scan from the beginning.
    pub fn stream(&self) -> Result<RowStream<RowsOf<C>>> {
        tracing::debug!(table = self.name(), "starting full scan");
        let rows = self.open_rows(&self.select_users_sql(), &[])?;
        Ok(Scan::users(rows))
    }
}
