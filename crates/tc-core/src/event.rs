//! Typed representation of one log line.

use std::fmt;

use chrono::NaiveDateTime;

use crate::timestamp::format_timestamp;

/// Reserved note text marking a pay-period boundary.
pub const SUBMISSION_MARKER: &str = "[submitted]";

/// Separator between the command and window title of an observation line.
pub const OBSERVATION_SEPARATOR: &str = " ::: ";

/// One line of the timecard log.
///
/// Events are immutable once appended; the log file itself is the only
/// persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// `-- Starting log at <timestamp> --`
    SessionStart { timestamp: NaiveDateTime },
    /// `-- Closing log at <timestamp> --`
    SessionEnd { timestamp: NaiveDateTime },
    /// `<timestamp> -- <command> ::: <window title>`
    Observation {
        timestamp: NaiveDateTime,
        command: String,
        window_title: String,
    },
    /// `<timestamp> -- [Note] <text>`
    Note {
        timestamp: NaiveDateTime,
        text: String,
    },
    /// `<timestamp> -- [Manual Adjustment] <seconds>`
    ManualAdjustment {
        timestamp: NaiveDateTime,
        seconds: i64,
    },
}

impl LogEvent {
    /// The timestamp carried by every variant.
    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::SessionStart { timestamp }
            | Self::SessionEnd { timestamp }
            | Self::Observation { timestamp, .. }
            | Self::Note { timestamp, .. }
            | Self::ManualAdjustment { timestamp, .. } => *timestamp,
        }
    }

    /// Whether this is the reserved submission-marker note.
    #[must_use]
    pub fn is_submission_marker(&self) -> bool {
        matches!(self, Self::Note { text, .. } if text == SUBMISSION_MARKER)
    }
}

/// Renders the exact line the log writer appends (no trailing newline).
impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionStart { timestamp } => {
                write!(f, "-- Starting log at {} --", format_timestamp(*timestamp))
            }
            Self::SessionEnd { timestamp } => {
                write!(f, "-- Closing log at {} --", format_timestamp(*timestamp))
            }
            Self::Observation {
                timestamp,
                command,
                window_title,
            } => write!(
                f,
                "{} -- {command}{OBSERVATION_SEPARATOR}{window_title}",
                format_timestamp(*timestamp)
            ),
            Self::Note { timestamp, text } => {
                write!(f, "{} -- [Note] {text}", format_timestamp(*timestamp))
            }
            Self::ManualAdjustment { timestamp, seconds } => write!(
                f,
                "{} -- [Manual Adjustment] {seconds}",
                format_timestamp(*timestamp)
            ),
        }
    }
}
