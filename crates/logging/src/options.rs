//! Logger options and their resolution against configuration.
//!
//! Responsibilities:
//! - Collect explicit per-logger options (`LoggerOptions` builder).
//! - Resolve each setting: explicit option > named config section >
//!   `Logging` section > built-in default.
//!
//! Does NOT handle:
//! - Building sinks or loggers (see `registry`).
//!
//! Invariants:
//! - Resolution is pure with respect to its inputs: the same `Config` and
//!   options always yield the same `LoggerSettings`.
//! - Unparseable config values fall back to the next source with a warning.

use std::str::FromStr;

use chutils_config::Config;
use chutils_config::constants::LOGGING_SECTION;

use crate::level::Severity;
use crate::sink::{FileSinkOptions, RotationPolicy, RotationWhen};

/// Name used when a caller does not name its logger.
pub const DEFAULT_LOGGER_NAME: &str = "app_logger";
pub const DEFAULT_LOG_FILE_NAME: &str = "app.log";
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_BACKUP_COUNT: usize = 3;
pub const DEFAULT_ROTATION_INTERVAL: u32 = 1;

/// Config keys read from the logging sections.
pub mod keys {
    pub const LOG_LEVEL: &str = "log_level";
    pub const LOG_FILE_NAME: &str = "log_file_name";
    pub const ROTATION_TYPE: &str = "rotation_type";
    pub const ROTATION_WHEN: &str = "rotation_when";
    pub const ROTATION_INTERVAL: &str = "rotation_interval";
    pub const MAX_BYTES: &str = "max_bytes";
    pub const BACKUP_COUNT: &str = "backup_count";
    pub const LOG_BACKUP_COUNT: &str = "log_backup_count";
    pub const COMPRESS: &str = "compress";
}

/// Rotation strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationKind {
    #[default]
    Time,
    Size,
}

impl FromStr for RotationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(Self::Time),
            "size" => Ok(Self::Size),
            other => Err(format!("unknown rotation type '{other}' (expected time or size)")),
        }
    }
}

/// Explicit options for one `setup_logger` call. Unset fields come from config.
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    level: Option<Severity>,
    log_file_name: Option<String>,
    rotation: Option<RotationKind>,
    when: Option<RotationWhen>,
    interval: Option<u32>,
    max_bytes: Option<u64>,
    backup_count: Option<usize>,
    compress: Option<bool>,
    config_section: Option<String>,
    force_reconfigure: bool,
    file_options: FileSinkOptions,
    console: Option<bool>,
}

impl LoggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the level from a name; unknown names resolve to INFO.
    pub fn with_level_name(self, level: &str) -> Self {
        self.with_level(Severity::parse_or_info(level))
    }

    pub fn with_log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = Some(name.into());
        self
    }

    pub fn with_rotation(mut self, rotation: RotationKind) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_when(mut self, when: RotationWhen) -> Self {
        self.when = Some(when);
        self
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn with_backup_count(mut self, backup_count: usize) -> Self {
        self.backup_count = Some(backup_count);
        self
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = Some(compress);
        self
    }

    /// Read settings from this section before falling back to `Logging`.
    pub fn with_config_section(mut self, section: impl Into<String>) -> Self {
        self.config_section = Some(section.into());
        self
    }

    /// Rebuild an already configured logger instead of returning it as-is.
    pub fn with_force_reconfigure(mut self, force: bool) -> Self {
        self.force_reconfigure = force;
        self
    }

    /// Options passed unchanged to the file sink.
    pub fn with_file_options(mut self, options: FileSinkOptions) -> Self {
        self.file_options = options;
        self
    }

    /// Attach a stderr sink (on by default).
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = Some(console);
        self
    }

    pub fn force_reconfigure(&self) -> bool {
        self.force_reconfigure
    }

    pub fn config_section(&self) -> Option<&str> {
        self.config_section.as_deref()
    }
}

/// Fully resolved settings for one logger.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerSettings {
    pub level: Severity,
    /// Empty disables the file sink.
    pub log_file_name: String,
    pub rotation: RotationPolicy,
    pub backup_count: usize,
    pub compress: bool,
    pub file_options: FileSinkOptions,
    pub console: bool,
}

/// Sections consulted for a setting, most specific first.
fn sections<'a>(options: &'a LoggerOptions) -> impl Iterator<Item = &'a str> {
    options
        .config_section
        .as_deref()
        .filter(|s| *s != LOGGING_SECTION)
        .into_iter()
        .chain(std::iter::once(LOGGING_SECTION))
}

/// The first `(section, key)` among `names` that is present in config.
fn locate<'a>(
    config: &Config,
    options: &'a LoggerOptions,
    names: &[&'a str],
) -> Option<(&'a str, &'a str)> {
    sections(options).find_map(|section| {
        names
            .iter()
            .find(|key| config.value(section, key).is_some())
            .map(|key| (section, *key))
    })
}

fn config_string(config: &Config, options: &LoggerOptions, key: &str) -> Option<String> {
    let (section, key) = locate(config, options, &[key])?;
    Some(config.get_string(section, key, ""))
}

fn config_parsed<T: FromStr>(config: &Config, options: &LoggerOptions, key: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let (section, key) = locate(config, options, &[key])?;
    let raw = config.get_string(section, key, "");
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(section, key, value = %raw, error = %e, "Ignoring invalid logging setting");
            None
        }
    }
}

/// Resolve `options` against `config` into concrete settings.
pub fn resolve_settings(config: &Config, options: &LoggerOptions) -> LoggerSettings {
    let level = options.level.unwrap_or_else(|| {
        config_string(config, options, keys::LOG_LEVEL)
            .map(|name| Severity::parse_or_info(&name))
            .unwrap_or_default()
    });

    let log_file_name = options
        .log_file_name
        .clone()
        .or_else(|| config_string(config, options, keys::LOG_FILE_NAME))
        .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

    let rotation_kind = options
        .rotation
        .or_else(|| config_parsed(config, options, keys::ROTATION_TYPE))
        .unwrap_or_default();

    let rotation = match rotation_kind {
        RotationKind::Size => RotationPolicy::Size {
            max_bytes: options.max_bytes.unwrap_or_else(|| {
                locate(config, options, &[keys::MAX_BYTES])
                    .map(|(s, k)| config.get_int(s, k, DEFAULT_MAX_BYTES as i64))
                    .and_then(|n| u64::try_from(n).ok())
                    .unwrap_or(DEFAULT_MAX_BYTES)
            }),
        },
        RotationKind::Time => RotationPolicy::Time {
            when: options
                .when
                .or_else(|| config_parsed(config, options, keys::ROTATION_WHEN))
                .unwrap_or_default(),
            interval: options
                .interval
                .or_else(|| {
                    locate(config, options, &[keys::ROTATION_INTERVAL])
                        .map(|(s, k)| config.get_int(s, k, i64::from(DEFAULT_ROTATION_INTERVAL)))
                        .and_then(|n| u32::try_from(n).ok())
                })
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_ROTATION_INTERVAL),
        },
    };

    let backup_count = options.backup_count.unwrap_or_else(|| {
        locate(config, options, &[keys::BACKUP_COUNT, keys::LOG_BACKUP_COUNT])
            .map(|(s, k)| config.get_int(s, k, DEFAULT_BACKUP_COUNT as i64))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_BACKUP_COUNT)
    });

    let compress = options.compress.unwrap_or_else(|| {
        locate(config, options, &[keys::COMPRESS])
            .map(|(s, k)| config.get_boolean(s, k, false))
            .unwrap_or(false)
    });

    LoggerSettings {
        level,
        log_file_name,
        rotation,
        backup_count,
        compress,
        file_options: options.file_options,
        console: options.console.unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chutils_config::{ConfigFormat, parse_ini};

    fn yaml(text: &str) -> Config {
        Config::from_mapping(Some(ConfigFormat::Yaml), serde_yaml::from_str(text).unwrap())
    }

    fn ini(text: &str) -> Config {
        Config::from_mapping(Some(ConfigFormat::Ini), parse_ini(text).unwrap())
    }

    const SECTIONS_YAML: &str = "\
Logging:
  log_level: INFO
  log_file_name: general.log
  backup_count: 7
MyAuditLogger:
  log_level: DEBUG
  log_file_name: audit.log
";

    #[test]
    fn test_defaults_without_config() {
        let settings = resolve_settings(&Config::empty(), &LoggerOptions::new());
        assert_eq!(
            settings,
            LoggerSettings {
                level: Severity::Info,
                log_file_name: "app.log".to_string(),
                rotation: RotationPolicy::Time {
                    when: RotationWhen::Days,
                    interval: 1,
                },
                backup_count: 3,
                compress: false,
                file_options: FileSinkOptions::default(),
                console: true,
            }
        );
    }

    #[test]
    fn test_named_section_overrides_general() {
        let config = yaml(SECTIONS_YAML);
        let options = LoggerOptions::new().with_config_section("MyAuditLogger");
        let settings = resolve_settings(&config, &options);

        assert_eq!(settings.level, Severity::Debug);
        assert_eq!(settings.log_file_name, "audit.log");
        assert_eq!(settings.backup_count, 7, "unset keys fall through to Logging");
    }

    #[test]
    fn test_general_section_used_without_name() {
        let settings = resolve_settings(&yaml(SECTIONS_YAML), &LoggerOptions::new());
        assert_eq!(settings.level, Severity::Info);
        assert_eq!(settings.log_file_name, "general.log");
    }

    #[test]
    fn test_missing_named_section_falls_back_to_general() {
        let options = LoggerOptions::new().with_config_section("Nope");
        let settings = resolve_settings(&yaml(SECTIONS_YAML), &options);
        assert_eq!(settings.log_file_name, "general.log");
    }

    #[test]
    fn test_explicit_options_win() {
        let options = LoggerOptions::new()
            .with_config_section("MyAuditLogger")
            .with_level(Severity::DevDebug)
            .with_log_file_name("explicit.log")
            .with_backup_count(1)
            .with_compress(true);
        let settings = resolve_settings(&yaml(SECTIONS_YAML), &options);

        assert_eq!(settings.level, Severity::DevDebug);
        assert_eq!(settings.log_file_name, "explicit.log");
        assert_eq!(settings.backup_count, 1);
        assert!(settings.compress);
    }

    #[test]
    fn test_ini_size_rotation_settings() {
        let config = ini(
            "[Logging]\nrotation_type = size\nmax_bytes = 1024\nlog_backup_count = 5\ncompress = yes\nlog_level = mediumdebug\n",
        );
        let settings = resolve_settings(&config, &LoggerOptions::new());

        assert_eq!(settings.rotation, RotationPolicy::Size { max_bytes: 1024 });
        assert_eq!(settings.backup_count, 5);
        assert!(settings.compress);
        assert_eq!(settings.level, Severity::MediumDebug);
    }

    #[test]
    fn test_backup_count_preferred_over_legacy_alias() {
        let config = ini("[Logging]\nbackup_count = 2\nlog_backup_count = 9\n");
        assert_eq!(resolve_settings(&config, &LoggerOptions::new()).backup_count, 2);
    }

    #[test]
    fn test_time_rotation_settings_from_config() {
        let config = yaml("Logging:\n  rotation_when: midnight\n  rotation_interval: 2\n");
        let settings = resolve_settings(&config, &LoggerOptions::new());
        assert_eq!(
            settings.rotation,
            RotationPolicy::Time {
                when: RotationWhen::Midnight,
                interval: 2,
            }
        );
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = yaml(
            "Logging:\n  log_level: LOUD\n  rotation_type: weekly\n  rotation_when: W0\n  backup_count: many\n  rotation_interval: 0\n",
        );
        let settings = resolve_settings(&config, &LoggerOptions::new());

        assert_eq!(settings.level, Severity::Info);
        assert_eq!(
            settings.rotation,
            RotationPolicy::Time {
                when: RotationWhen::Days,
                interval: 1,
            }
        );
        assert_eq!(settings.backup_count, 3);
    }

    #[test]
    fn test_file_options_forwarded_verbatim() {
        let file_options = FileSinkOptions {
            delay: true,
            truncate: true,
            utc: true,
        };
        let options = LoggerOptions::new().with_file_options(file_options);
        assert_eq!(
            resolve_settings(&Config::empty(), &options).file_options,
            file_options
        );
    }
}
