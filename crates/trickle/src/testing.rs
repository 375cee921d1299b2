//! In-memory connector for unit tests
//!
//! Serves a fixed list of records, honours `LIMIT ?1 OFFSET ?2` style
//! parameters, counts open connections, and can inject failures.

use crate::table::UserTable;
use std::sync::Arc;
use trickle_core::{
    error::{Result, TrickleError},
    ConnectionGauge, ConnectionLease, Connector, FieldValue, Row, RowSource, UserRecord,
};

#[derive(Clone)]
pub(crate) struct MemoryConnector {
    records: Arc<Vec<UserRecord>>,
    gauge: ConnectionGauge,
    fail_at: Option<usize>,
    refuse: bool,
}

impl MemoryConnector {
    pub(crate) fn new(records: Vec<UserRecord>) -> Self {
        Self {
            records: Arc::new(records),
            gauge: ConnectionGauge::new(),
            fail_at: None,
            refuse: false,
        }
    }

    pub(crate) fn with_ages(ages: &[u32]) -> Self {
        Self::new(
            ages.iter()
                .enumerate()
                .map(|(i, age)| {
                    UserRecord::new(
                        format!("user-{:04}", i),
                        format!("User {}", i),
                        format!("user{}@example.com", i),
                        *age,
                    )
                })
                .collect(),
        )
    }

    /// Fail with a query error when the record at `index` would be read
    pub(crate) fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Refuse every connection attempt
    pub(crate) fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    pub(crate) fn open_connections(&self) -> usize {
        self.gauge.open_connections()
    }

    pub(crate) fn table(&self) -> UserTable<Self> {
        UserTable::new(self.clone(), "user_data")
    }
}

impl Connector for MemoryConnector {
    type Source = MemorySource;

    fn connect(&self) -> Result<Self::Source> {
        if self.refuse {
            return Err(TrickleError::Connection("connection refused".into()));
        }
        Ok(MemorySource {
            records: Arc::clone(&self.records),
            fail_at: self.fail_at,
            lease: self.gauge.acquire(),
        })
    }
}

pub(crate) struct MemorySource {
    records: Arc<Vec<UserRecord>>,
    fail_at: Option<usize>,
    lease: ConnectionLease,
}

impl RowSource for MemorySource {
    type Rows = MemoryRows;

    fn execute_query(self, sql: &str, params: &[FieldValue]) -> Result<Self::Rows> {
        if !sql.trim_start().starts_with("SELECT") {
            return Err(TrickleError::Query(format!("not a read query: {}", sql)));
        }

        let total = self.records.len();
        let (start, end) = match params {
            [FieldValue::Integer(limit), FieldValue::Integer(offset)] => {
                let start = (*offset as usize).min(total);
                (start, start.saturating_add(*limit as usize).min(total))
            }
            _ => (0, total),
        };

        Ok(MemoryRows {
            columns: ["user_id", "name", "email", "age"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            records: self.records,
            next: start,
            end,
            fail_at: self.fail_at,
            lease: Some(self.lease),
        })
    }
}

pub(crate) struct MemoryRows {
    columns: Arc<[String]>,
    records: Arc<Vec<UserRecord>>,
    next: usize,
    end: usize,
    fail_at: Option<usize>,
    lease: Option<ConnectionLease>,
}

impl Iterator for MemoryRows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lease.as_ref()?;

        if self.fail_at == Some(self.next) {
            self.lease = None;
            return Some(Err(TrickleError::Query("injected cursor failure".into())));
        }
        if self.next >= self.end {
            self.lease = None;
            return None;
        }

        let record = &self.records[self.next];
        self.next += 1;
        Some(Ok(Row::new(
            Arc::clone(&self.columns),
            vec![
                FieldValue::from(record.user_id.as_str()),
                FieldValue::from(record.name.as_str()),
                FieldValue::from(record.email.as_str()),
                FieldValue::Integer(i64::from(record.age)),
            ],
        )))
    }
}
