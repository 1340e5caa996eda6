//! Named logger with a severity threshold and a set of sinks.
//!
//! Responsibilities:
//! - Filter records against the logger's threshold.
//! - Fan each accepted record out to every attached sink.
//! - Provide one method per severity, plus a call-timing helper.
//!
//! Does NOT handle:
//! - Reading configuration or building sinks (see `registry`).
//!
//! Invariants:
//! - Records are never forwarded to any other logger.
//! - Messages below the threshold are not rendered at all.
//! - A failing sink does not prevent the remaining sinks from receiving the record.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::level::Severity;
use crate::record::Record;
use crate::sink::Sink;

pub struct Logger {
    name: String,
    level: AtomicU8,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

impl Logger {
    /// A logger with no sinks.
    pub fn new(name: impl Into<String>, level: Severity) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(level.as_u8()),
            sinks: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn is_enabled_for(&self, level: Severity) -> bool {
        level >= self.level()
    }

    fn sinks(&self) -> MutexGuard<'_, Vec<Box<dyn Sink>>> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_sink(&self, sink: impl Sink + 'static) {
        self.sinks().push(Box::new(sink));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks().len()
    }

    /// Flush and drop all sinks.
    pub fn clear_sinks(&self) {
        let mut sinks = self.sinks();
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                tracing::error!(logger = %self.name, error = %e, "Log sink failed to flush");
            }
        }
        sinks.clear();
    }

    pub fn log(&self, level: Severity, message: impl fmt::Display) {
        if !self.is_enabled_for(level) {
            return;
        }
        let message = message.to_string();
        let record = Record::new(&self.name, level, &message);
        for sink in self.sinks().iter_mut() {
            if let Err(e) = sink.emit(&record) {
                tracing::error!(logger = %self.name, error = %e, "Log sink failed to write record");
            }
        }
    }

    pub fn devdebug(&self, message: impl fmt::Display) {
        self.log(Severity::DevDebug, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    pub fn mediumdebug(&self, message: impl fmt::Display) {
        self.log(Severity::MediumDebug, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Severity::Critical, message);
    }

    pub fn flush(&self) {
        for sink in self.sinks().iter_mut() {
            if let Err(e) = sink.flush() {
                tracing::error!(logger = %self.name, error = %e, "Log sink failed to flush");
            }
        }
    }

    /// Run `f`, logging the call, its duration and its result at DEVDEBUG.
    pub fn trace_call<T: fmt::Debug>(&self, fn_name: &str, f: impl FnOnce() -> T) -> T {
        self.devdebug(format_args!("Calling {fn_name}()"));
        let started = Instant::now();
        let result = f();
        let elapsed = started.elapsed();
        if self.is_enabled_for(Severity::DevDebug) {
            self.devdebug(format_args!(
                "{fn_name}() finished in {:.4}s, returned {result:?}",
                elapsed.as_secs_f64()
            ));
        }
        result
    }
}
