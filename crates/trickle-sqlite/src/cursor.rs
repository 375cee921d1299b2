//! Demand-driven SQLite cursor
//!
//! A rusqlite cursor borrows its statement, which borrows its connection,
//! so the three cannot be returned together as one owned value. The cursor
//! therefore lives on a worker thread that owns the connection. The
//! consumer sends one demand token per pull and receives exactly one reply,
//! so the cursor never steps ahead of the consumer.
//!
//! The worker exits (closing the connection) when the result set is
//! exhausted, when a step fails, or when the demand channel is closed.
//! `SqliteRows` joins the worker on exhaustion, on error, and on drop, so
//! the connection is already closed by the time any of those return.

use crate::source::{close, column_names, decode_row, query_error, SqliteRowSource};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use trickle_core::{
    error::{Result, TrickleError},
    ConnectionLease, Row,
};

/// Lazy rows of one SQLite query
pub struct SqliteRows {
    demand: Option<SyncSender<()>>,
    rows: Receiver<Result<Row>>,
    worker: Option<JoinHandle<()>>,
}

impl SqliteRows {
    pub(crate) fn spawn(source: SqliteRowSource, sql: String, params: Vec<Value>) -> Result<Self> {
        let (demand_tx, demand_rx) = mpsc::sync_channel(1);
        let (rows_tx, rows_rx) = mpsc::sync_channel(1);
        let (conn, lease) = source.into_parts();

        let worker = thread::Builder::new()
            .name("trickle-cursor".to_string())
            .spawn(move || run_cursor(conn, lease, sql, params, demand_rx, rows_tx))?;

        Ok(Self {
            demand: Some(demand_tx),
            rows: rows_rx,
            worker: Some(worker),
        })
    }

    /// True once the cursor has finished and its connection is closed
    pub fn is_finished(&self) -> bool {
        self.worker.is_none()
    }

    /// Stop the worker and wait for it to release the connection
    fn finish(&mut self) -> Option<TrickleError> {
        self.demand = None;
        let worker = self.worker.take()?;
        worker
            .join()
            .err()
            .map(|_| TrickleError::Internal("row cursor worker panicked".into()))
    }
}

impl Iterator for SqliteRows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let demand = self.demand.as_ref()?;

        // A failed send means the worker already stopped; whatever it left
        // behind is still buffered in `rows`.
        let _ = demand.send(());

        match self.rows.recv() {
            Ok(Ok(row)) => Some(Ok(row)),
            Ok(Err(e)) => {
                self.finish();
                Some(Err(e))
            }
            // Worker hung up: result set exhausted, unless it panicked
            Err(_) => self.finish().map(Err),
        }
    }
}

impl Drop for SqliteRows {
    fn drop(&mut self) {
        if let Some(e) = self.finish() {
            tracing::warn!("Row cursor ended abnormally: {}", e);
        }
    }
}

fn run_cursor(
    conn: Connection,
    lease: ConnectionLease,
    sql: String,
    params: Vec<Value>,
    demand: Receiver<()>,
    rows: SyncSender<Result<Row>>,
) {
    if let Err(e) = drive(&conn, &sql, &params, &demand, &rows) {
        let _ = rows.send(Err(query_error(e)));
    }
    close(conn);
    drop(lease);
}

fn drive(
    conn: &Connection,
    sql: &str,
    params: &[Value],
    demand: &Receiver<()>,
    rows: &SyncSender<Result<Row>>,
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(sql)?;
    let columns = column_names(&stmt);
    let mut cursor = stmt.query(params_from_iter(params.iter()))?;

    while demand.recv().is_ok() {
        let Some(row) = cursor.next()? else {
            break;
        };
        let row = decode_row(&columns, row)?;
        if rows.send(Ok(row)).is_err() {
            break;
        }
    }
    Ok(())
}
