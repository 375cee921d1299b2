//! Row-at-a-time commands

use super::JsonLines;
use anyhow::Result;
use std::io::Write;
use trickle::TrickleDb;

pub fn users<W: Write>(
    db: &TrickleDb,
    limit: Option<usize>,
    mut out: JsonLines<W>,
) -> Result<()> {
    let users = db.stream()?.take(limit.unwrap_or(usize::MAX));
    out.write_all(users)?;
    out.finish()?;
    Ok(())
}

pub fn ages<W: Write>(
    db: &TrickleDb,
    limit: Option<usize>,
    mut out: JsonLines<W>,
) -> Result<()> {
    out.write_all(db.stream_ages()?.take(limit.unwrap_or(usize::MAX)))?;
    out.finish()?;
    Ok(())
}
