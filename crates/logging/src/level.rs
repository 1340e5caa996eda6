//! Severity scheme with two levels finer than DEBUG.
//!
//! Responsibilities:
//! - Define the ordered `Severity` levels and their numeric values.
//! - Parse level names from config strings.
//!
//! Invariants:
//! - `DevDebug < Debug < MediumDebug < Info < Warning < Error < Critical`.
//! - Numeric values match the conventional 10/20/30/40/50 scale with 9 and 15
//!   for the extra levels.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    DevDebug = 9,
    Debug = 10,
    MediumDebug = 15,
    #[default]
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

/// Returned when a level name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level '{0}'")]
pub struct UnknownSeverity(pub String);

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::DevDebug,
        Severity::Debug,
        Severity::MediumDebug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_u8() == value)
    }

    /// Upper-case name used in formatted records.
    pub fn name(self) -> &'static str {
        match self {
            Severity::DevDebug => "DEVDEBUG",
            Severity::Debug => "DEBUG",
            Severity::MediumDebug => "MEDIUMDEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Parse a level name, falling back to `Info` (with a warning) when unknown.
    pub fn parse_or_info(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: UnknownSeverity| {
            tracing::warn!(error = %e, "Falling back to INFO log level");
            Severity::Info
        })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEVDEBUG" => Ok(Severity::DevDebug),
            "DEBUG" => Ok(Severity::Debug),
            "MEDIUMDEBUG" => Ok(Severity::MediumDebug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_places_custom_levels_around_debug() {
        assert!(Severity::DevDebug < Severity::Debug);
        assert!(Severity::Debug < Severity::MediumDebug);
        assert!(Severity::MediumDebug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(Severity::DevDebug.as_u8(), 9);
        assert_eq!(Severity::MediumDebug.as_u8(), 15);
        assert_eq!(Severity::Critical.as_u8(), 50);
        assert_eq!(Severity::from_u8(30), Some(Severity::Warning));
        assert_eq!(Severity::from_u8(11), None);
    }

    #[test]
    fn test_parse_is_case_insensitive_with_aliases() {
        assert_eq!("mediumdebug".parse(), Ok(Severity::MediumDebug));
        assert_eq!(" DevDebug ".parse(), Ok(Severity::DevDebug));
        assert_eq!("warn".parse(), Ok(Severity::Warning));
        assert_eq!("FATAL".parse(), Ok(Severity::Critical));
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_unknown_name_falls_back_to_info() {
        assert_eq!(Severity::parse_or_info("loud"), Severity::Info);
        assert_eq!(Severity::parse_or_info("error"), Severity::Error);
    }

    #[test]
    fn test_display_uses_upper_case_name() {
        assert_eq!(Severity::MediumDebug.to_string(), "MEDIUMDEBUG");
    }
}
