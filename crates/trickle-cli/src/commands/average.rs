//! Average command implementation

use super::JsonLines;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use trickle::TrickleDb;

#[derive(Serialize)]
struct AgeSummary {
    count: u64,
    sum: u64,
    average: Option<f64>,
}

pub fn execute<W: Write>(db: &TrickleDb, mut out: JsonLines<W>) -> Result<()> {
    let agg = db.age_summary()?;

    out.write(&AgeSummary {
        count: agg.count(),
        sum: agg.sum(),
        average: agg.mean(),
    })?;
    out.finish()?;
    Ok(())
}
