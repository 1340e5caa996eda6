//! Rotating file sink with size- or time-based rollover and optional gzip.
//!
//! Responsibilities:
//! - Append rendered records to a live log file.
//! - Roll the live file over to numbered (`app.log.1`) or timestamped
//!   (`app.log.2024-05-01`) backups and enforce the retention count.
//! - Compress each just-rotated backup to `<backup>.gz` when enabled.
//!
//! Does NOT handle:
//! - Creating the log directory (see `registry`).
//!
//! Invariants:
//! - Size rollover happens before a write that would push a non-empty file
//!   past `max_bytes`; `max_bytes == 0` disables it.
//! - Size rollover with `backup_count == 0` truncates the live file instead.
//! - Time rollover is driven by record timestamps, so replaying records with
//!   old timestamps rotates deterministically.
//! - Timestamped backups are named after the start of the period they cover.
//! - A failed compression leaves the uncompressed backup in place.

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta};
use flate2::Compression;
use flate2::write::GzEncoder;
use thiserror::Error;

use super::Sink;
use crate::error::LoggingError;
use crate::record::Record;

/// Unit of a time-based rotation interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationWhen {
    Seconds,
    Minutes,
    Hours,
    #[default]
    Days,
    /// Roll over at local (or UTC) midnight.
    Midnight,
}

/// Returned when a rotation unit code is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rotation unit '{0}' (expected S, M, H, D or MIDNIGHT)")]
pub struct UnknownRotationWhen(pub String);

impl RotationWhen {
    fn unit_seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 60 * 60,
            Self::Days | Self::Midnight => 24 * 60 * 60,
        }
    }

    /// `strftime` layout of backup suffixes for this unit.
    pub fn suffix_format(self) -> &'static str {
        match self {
            Self::Seconds => "%Y-%m-%d_%H-%M-%S",
            Self::Minutes => "%Y-%m-%d_%H-%M",
            Self::Hours => "%Y-%m-%d_%H",
            Self::Days | Self::Midnight => "%Y-%m-%d",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Seconds => "S",
            Self::Minutes => "M",
            Self::Hours => "H",
            Self::Days => "D",
            Self::Midnight => "MIDNIGHT",
        }
    }
}

impl FromStr for RotationWhen {
    type Err = UnknownRotationWhen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::Seconds),
            "M" => Ok(Self::Minutes),
            "H" => Ok(Self::Hours),
            "D" => Ok(Self::Days),
            "MIDNIGHT" => Ok(Self::Midnight),
            _ => Err(UnknownRotationWhen(s.to_string())),
        }
    }
}

/// When the live file is rolled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    Size { max_bytes: u64 },
    Time { when: RotationWhen, interval: u32 },
}

impl fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size { max_bytes } => write!(f, "size, max {max_bytes} bytes"),
            Self::Time { when, interval } => write!(f, "time, every {interval} {}", when.code()),
        }
    }
}

/// Pass-through options for opening the live file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSinkOptions {
    /// Open the file on the first record instead of at construction.
    pub delay: bool,
    /// Truncate an existing file when it is first opened.
    pub truncate: bool,
    /// Use UTC instead of local time for rollover times and backup names.
    pub utc: bool,
}

#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    policy: RotationPolicy,
    backup_count: usize,
    compress: bool,
    options: FileSinkOptions,
    file: Option<File>,
    size: u64,
    truncate_on_open: bool,
    rollover_at: Option<NaiveDateTime>,
}

impl RotatingFileSink {
    pub fn new(
        path: impl Into<PathBuf>,
        policy: RotationPolicy,
        backup_count: usize,
        compress: bool,
        options: FileSinkOptions,
    ) -> Result<Self, LoggingError> {
        let path = path.into();
        let mut sink = Self {
            path,
            policy,
            backup_count,
            compress,
            options,
            file: None,
            size: 0,
            truncate_on_open: options.truncate,
            rollover_at: None,
        };

        if let RotationPolicy::Time { when, interval } = policy
            && let Ok(modified) = fs::metadata(&sink.path).and_then(|m| m.modified())
        {
            let modified = sink.zoned(DateTime::<Local>::from(modified));
            sink.rollover_at = Some(compute_rollover(when, interval, modified));
        }

        if !options.delay {
            let path = sink.path.clone();
            sink.open().map_err(|e| LoggingError::OpenLogFile {
                path,
                source: e,
            })?;
        }
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    pub fn backup_count(&self) -> usize {
        self.backup_count
    }

    pub fn compress(&self) -> bool {
        self.compress
    }

    pub fn options(&self) -> FileSinkOptions {
        self.options
    }

    fn zoned(&self, timestamp: DateTime<Local>) -> NaiveDateTime {
        if self.options.utc {
            timestamp.naive_utc()
        } else {
            timestamp.naive_local()
        }
    }

    fn open(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = if self.truncate_on_open {
                File::create(&self.path)?
            } else {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?
            };
            self.truncate_on_open = false;
            self.size = file.metadata()?.len();
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is not open"))
    }

    fn numbered(&self, index: usize) -> PathBuf {
        with_suffix(&self.path, &format!(".{index}"))
    }

    fn rotate_by_size(&mut self) -> io::Result<()> {
        self.file = None;

        if self.backup_count == 0 {
            self.truncate_on_open = true;
            tracing::debug!(path = %self.path.display(), "Truncating log file (no backups kept)");
            return Ok(());
        }

        for index in (1..self.backup_count).rev() {
            let src = self.numbered(index);
            let dst = self.numbered(index + 1);
            let src_gz = with_suffix(&src, ".gz");
            if !src.exists() && !src_gz.exists() {
                continue;
            }
            let dst_gz = with_suffix(&dst, ".gz");
            remove_if_exists(&dst)?;
            remove_if_exists(&dst_gz)?;
            if src.exists() {
                fs::rename(&src, &dst)?;
            }
            if src_gz.exists() {
                fs::rename(&src_gz, &dst_gz)?;
            }
        }

        let first = self.numbered(1);
        remove_if_exists(&first)?;
        remove_if_exists(&with_suffix(&first, ".gz"))?;
        if self.path.exists() {
            fs::rename(&self.path, &first)?;
            tracing::debug!(backup = %first.display(), "Rotated log file by size");
            if self.compress {
                compress_backup(&first);
            }
        }
        Ok(())
    }

    fn rotate_by_time(
        &mut self,
        when: RotationWhen,
        interval: u32,
        rollover_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> io::Result<()> {
        self.file = None;

        let period_start = rollover_at
            .checked_sub_signed(interval_delta(when, interval))
            .unwrap_or(rollover_at);
        let suffix = format!(".{}", period_start.format(when.suffix_format()));
        let backup = with_suffix(&self.path, &suffix);

        remove_if_exists(&backup)?;
        remove_if_exists(&with_suffix(&backup, ".gz"))?;
        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
            tracing::debug!(backup = %backup.display(), "Rotated log file by time");
            if self.compress {
                compress_backup(&backup);
            }
        }

        if self.backup_count > 0 {
            self.prune_timed_backups(when)?;
        }
        self.rollover_at = Some(compute_rollover(when, interval, now));
        Ok(())
    }

    /// Delete the oldest timestamped backups beyond `backup_count`.
    fn prune_timed_backups(&self, when: RotationWhen) -> io::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let Some(base_name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return Ok(());
        };
        let prefix = format!("{base_name}.");
        let shape = digit_shape(
            &NaiveDateTime::default()
                .format(when.suffix_format())
                .to_string(),
        );

        let mut backups: Vec<(String, PathBuf)> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let suffix = name.strip_prefix(&prefix)?;
                let stamp = suffix.strip_suffix(".gz").unwrap_or(suffix);
                (digit_shape(stamp) == shape).then(|| (stamp.to_string(), entry.path()))
            })
            .collect();

        if backups.len() <= self.backup_count {
            return Ok(());
        }
        backups.sort();
        let excess = backups.len() - self.backup_count;
        for (_, path) in backups.into_iter().take(excess) {
            fs::remove_file(&path)?;
            tracing::debug!(path = %path.display(), "Removed expired log backup");
        }
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn emit(&mut self, record: &Record<'_>) -> io::Result<()> {
        let line = format!("{}\n", record.render());
        let len = line.len() as u64;

        match self.policy {
            RotationPolicy::Size { max_bytes } => {
                self.open()?;
                if max_bytes > 0 && self.size > 0 && self.size + len > max_bytes {
                    self.rotate_by_size()?;
                }
            }
            RotationPolicy::Time { when, interval } => {
                let now = self.zoned(record.timestamp);
                let rollover_at = *self
                    .rollover_at
                    .get_or_insert_with(|| compute_rollover(when, interval, now));
                if now >= rollover_at {
                    self.rotate_by_time(when, interval, rollover_at, now)?;
                }
            }
        }

        let file = self.open()?;
        file.write_all(line.as_bytes())?;
        self.size += len;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn interval_delta(when: RotationWhen, interval: u32) -> TimeDelta {
    TimeDelta::seconds(when.unit_seconds() * i64::from(interval.max(1)))
}

/// First rollover time strictly after `t`.
fn compute_rollover(when: RotationWhen, interval: u32, t: NaiveDateTime) -> NaiveDateTime {
    let step = interval_delta(when, interval);
    match when {
        RotationWhen::Midnight => t
            .date()
            .succ_opt()
            .map(|day| day.and_time(NaiveTime::MIN))
            .and_then(|midnight| midnight.checked_add_signed(step - TimeDelta::days(1)))
            .unwrap_or(NaiveDateTime::MAX),
        _ => t.checked_add_signed(step).unwrap_or(NaiveDateTime::MAX),
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn digit_shape(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_digit() { '0' } else { c })
        .collect()
}

/// Gzip `path` to `<path>.gz` and remove the original.
pub(crate) fn gzip_file(path: &Path) -> io::Result<PathBuf> {
    let target = with_suffix(path, ".gz");
    let mut input = File::open(path)?;
    let output = File::create(&target)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    fs::remove_file(path)?;
    Ok(target)
}

fn compress_backup(path: &Path) {
    match gzip_file(path) {
        Ok(target) => {
            tracing::debug!(path = %target.display(), "Compressed rotated log file");
        }
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to compress rotated log file"
            );
        }
    }
}
