//! Output destinations for log records.
//!
//! Responsibilities:
//! - Define the `Sink` trait that `Logger` fans records out to.
//! - Provide console and rotating-file implementations.
//!
//! Does NOT handle:
//! - Level filtering (the `Logger` checks its threshold before emitting).
//!
//! Invariants:
//! - A sink writes one rendered line per record, terminated by `\n`.
//! - Sink errors are reported to the caller; they never panic.

mod console;
mod rotating;

use std::io;

use crate::record::Record;

pub use console::ConsoleSink;
pub use rotating::{FileSinkOptions, RotatingFileSink, RotationPolicy, RotationWhen};

/// A destination for rendered log records.
pub trait Sink: Send {
    fn emit(&mut self, record: &Record<'_>) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}
