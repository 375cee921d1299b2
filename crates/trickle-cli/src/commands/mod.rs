//! Command implementations and JSON-lines output

pub mod average;
pub mod batches;
pub mod paginate;
pub mod stream;

#[cfg(test)]
mod testing;

use anyhow::Result;
use serde::Serialize;
use std::io::{self, BufWriter, Write};

/// Writes one JSON document per line
pub struct JsonLines<W: Write> {
    out: W,
    written: usize,
}

impl JsonLines<BufWriter<io::StdoutLock<'static>>> {
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout().lock()))
    }
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let line = serde_json::to_string(value)?;
        writeln!(self.out, "{}", line)?;
        self.written += 1;
        Ok(())
    }

    /// Write every item, stopping at the first stream or output error
    pub fn write_all<T, I>(&mut self, items: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = trickle::Result<T>>,
    {
        for item in items {
            self.write(&item?)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        self.out.flush()?;
        tracing::debug!(lines = self.written, "output complete");
        Ok(self.written)
    }
}

/// A closed stdout (e.g. piped into `head`) ends the command successfully
pub fn ignore_broken_pipe(result: Result<()>) -> Result<()> {
    match result {
        Err(e) if is_broken_pipe(&e) => {
            tracing::debug!("stdout closed, stopping");
            Ok(())
        }
        other => other,
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}
