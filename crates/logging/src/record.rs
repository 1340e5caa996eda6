//! A single log record and its text rendering.

use chrono::{DateTime, Local};

use crate::level::Severity;

/// Timestamp layout of rendered records, e.g. `2024-05-01 12:30:45,123`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// One emitted log event, borrowed for the duration of a sink call.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub timestamp: DateTime<Local>,
    pub logger: &'a str,
    pub level: Severity,
    pub message: &'a str,
}

impl<'a> Record<'a> {
    /// A record stamped with the current local time.
    pub fn new(logger: &'a str, level: Severity, message: &'a str) -> Self {
        Self::at(Local::now(), logger, level, message)
    }

    pub fn at(timestamp: DateTime<Local>, logger: &'a str, level: Severity, message: &'a str) -> Self {
        Self {
            timestamp,
            logger,
            level,
            message,
        }
    }

    /// `<timestamp> - <logger> - <LEVEL> - <message>`, without a newline.
    pub fn render(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.logger,
            self.level,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_layout() {
        let ts = Local
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 45)
            .single()
            .unwrap()
            + chrono::TimeDelta::milliseconds(7);
        let record = Record::at(ts, "app_logger", Severity::MediumDebug, "hello");

        assert_eq!(
            record.render(),
            "2024-05-01 12:30:45,007 - app_logger - MEDIUMDEBUG - hello"
        );
    }
}
