use crate::error::Result;
use crate::types::{FieldValue, Row};

/// A live connection able to run exactly one read query
///
/// Executing a query consumes the source: the connection moves into the
/// returned row handle and is released when that handle reports
/// exhaustion, reports an error, or is dropped.
pub trait RowSource: Send {
    /// Forward-only rows of one result set
    type Rows: Iterator<Item = Result<Row>> + Send;

    /// Issue `sql` with positional `params` and return a lazy row handle
    ///
    /// Rows are realised one per `next()` call; the cursor never runs
    /// ahead of the consumer.
    fn execute_query(self, sql: &str, params: &[FieldValue]) -> Result<Self::Rows>;

    /// Run a bounded query and collect every row
    ///
    /// Only use this for queries with a known small result (a `LIMIT`ed
    /// page). The connection is released before this returns.
    fn fetch_all(self, sql: &str, params: &[FieldValue]) -> Result<Vec<Row>>
    where
        Self: Sized,
    {
        self.execute_query(sql, params)?.collect()
    }
}

/// Opens row sources against one configured data source
///
/// Every top-level stream calls `connect` once for itself, so streams
/// never share a connection.
pub trait Connector: Clone + Send + Sync {
    type Source: RowSource;

    /// Open a new connection
    ///
    /// Fails with `TrickleError::Connection` when the data source cannot be
    /// reached; no retry happens at this layer.
    fn connect(&self) -> Result<Self::Source>;
}

/// Row handle type produced by a connector's sources
pub type RowsOf<C> = <<C as Connector>::Source as RowSource>::Rows;
