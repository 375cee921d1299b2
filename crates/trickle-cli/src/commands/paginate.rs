//! Paginate command implementation

use super::JsonLines;
use anyhow::Result;
use std::io::Write;
use trickle::TrickleDb;

pub fn execute<W: Write>(
    db: &TrickleDb,
    page_size: usize,
    max_pages: Option<usize>,
    mut out: JsonLines<W>,
) -> Result<()> {
    tracing::info!(page_size, ?max_pages, "paginating");

    let pages = db.lazy_paginate(page_size)?;
    out.write_all(pages.take(max_pages.unwrap_or(usize::MAX)))?;
    let count = out.finish()?;

    tracing::info!(pages = count, "done");
    Ok(())
}
