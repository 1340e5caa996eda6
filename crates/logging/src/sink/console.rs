//! Console sink (stderr by default).

use std::io::{self, Write};

use super::Sink;
use crate::record::Record;

/// Writes rendered records to stderr, or to any provided writer.
pub struct ConsoleSink {
    writer: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
    fn emit(&mut self, record: &Record<'_>) -> io::Result<()> {
        writeln!(self.writer, "{}", record.render())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
