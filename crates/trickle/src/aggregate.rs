//! Single-pass aggregation
//!
//! [`RunningAggregator`] folds a stream of values while holding only a
//! running sum and count, so additive aggregates over the whole table cost
//! constant memory.

use crate::scan::{AgeStream, Scan};
use crate::table::UserTable;
use trickle_core::{error::Result, Connector, RowsOf};

/// Running sum and count of non-negative integer values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningAggregator {
    total: u64,
    count: u64,
}

impl RunningAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: u32) {
        self.total += u64::from(value);
        self.count += 1;
    }

    /// Fold every value of a fallible stream, stopping at the first error
    pub fn consume<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<u32>>,
    {
        let mut agg = Self::new();
        for value in values {
            agg.push(value?);
        }
        Ok(agg)
    }

    pub fn sum(&self) -> u64 {
        self.total
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean, or `None` when no values were seen
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.total as f64 / self.count as f64)
    }
}

impl<C: Connector> UserTable<C> {
    /// Stream the `age` column, one value per pull, on its own connection
    pub fn stream_ages(&self) -> Result<AgeStream<RowsOf<C>>> {
        let rows = self.open_rows(&self.select_ages_sql(), &[])?;
        Ok(Scan::ages(rows))
    }

    /// Average age across the table
    ///
    /// Returns `Ok(None)` for an empty table.
    pub fn average_age(&self) -> Result<Option<f64>> {
        let agg = RunningAggregator::consume(self.stream_ages()?)?;
        tracing::debug!(
            table = self.name(),
            count = agg.count(),
            sum = agg.sum(),
            "aggregated ages"
        );
        Ok(agg.mean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryConnector;

    #[test]
    fn test_average_age_scenario() {
        let connector = MemoryConnector::with_ages(&[67, 119, 49, 22, 102]);
        let avg = connector.table().average_age().unwrap().unwrap();
        assert!((avg - 71.8).abs() < 1e-9);
        assert_eq!(connector.open_connections(), 0);
    }

    #[test]
    fn test_empty_table_has_no_average() {
        let connector = MemoryConnector::with_ages(&[]);
        assert_eq!(connector.table().average_age().unwrap(), None);
    }

    #[test]
    fn test_average_matches_materialized_mean() {
        let ages: Vec<u32> = (0..257).map(|i| (i * 37 + 11) % 120).collect();
        let connector = MemoryConnector::with_ages(&ages);

        let expected = ages.iter().map(|a| *a as f64).sum::<f64>() / ages.len() as f64;
        let avg = connector.table().average_age().unwrap().unwrap();
        assert!((avg - expected).abs() < 1e-9);
    }

    #[test]
    fn test_stream_ages_in_scan_order() {
        let connector = MemoryConnector::with_ages(&[3, 1, 2]);
        let ages: Vec<u32> = connector
            .table()
            .stream_ages()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(ages, vec![3, 1, 2]);
    }

    #[test]
    fn test_failure_is_not_an_average() {
        let connector = MemoryConnector::with_ages(&[10, 20, 30]).failing_at(1);
        assert!(connector.table().average_age().unwrap_err().is_query());
        assert_eq!(connector.open_connections(), 0);
    }

    #[test]
    fn test_aggregator_counts() {
        let mut agg = RunningAggregator::new();
        assert_eq!(agg.mean(), None);

        agg.push(4);
        agg.push(6);
        assert_eq!(agg.sum(), 10);
        assert_eq!(agg.count(), 2);
        assert_eq!(agg.mean(), Some(5.0));
    }
}
