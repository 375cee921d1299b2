//! Batch commands

use super::JsonLines;
use anyhow::Result;
use std::io::Write;
use trickle::TrickleDb;

/// One JSON array per batch
pub fn batches<W: Write>(
    db: &TrickleDb,
    batch_size: usize,
    mut out: JsonLines<W>,
) -> Result<()> {
    tracing::info!(batch_size, "streaming batches");
    out.write_all(db.stream_in_batches(batch_size)?)?;
    let count = out.finish()?;
    tracing::info!(batches = count, "done");
    Ok(())
}

/// One JSON object per user above the age threshold
pub fn process<W: Write>(
    db: &TrickleDb,
    batch_size: usize,
    mut out: JsonLines<W>,
) -> Result<()> {
    tracing::info!(batch_size, threshold = trickle::AGE_THRESHOLD, "filtering batches");
    out.write_all(db.batch_process(batch_size)?)?;
    out.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::create_test_db;
    use trickle::UserRecord;

    #[test]
    fn test_batches_one_array_per_line() {
        let (db, _temp) = create_test_db(&[67, 119, 49, 22, 102]);
        let mut buf = Vec::new();
        batches(&db, 2, JsonLines::new(&mut buf)).unwrap();

        let sizes: Vec<usize> = String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str::<Vec<UserRecord>>(l).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_process_filters_by_age() {
        let (db, _temp) = create_test_db(&[67, 119, 49, 22, 102]);
        let mut buf = Vec::new();
        process(&db, 2, JsonLines::new(&mut buf)).unwrap();

        let ages: Vec<u32> = String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str::<UserRecord>(l).unwrap().age)
            .collect();
        assert_eq!(ages, vec![67, 119, 49, 102]);
    }
}
