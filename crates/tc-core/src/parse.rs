//! Log parser: raw lines to typed events.
//!
//! Each line shape has its own pattern. A line matching none of them is
//! skipped with a warning so a partially corrupt log still summarizes;
//! only the unreadable lines are lost.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

use crate::event::LogEvent;
use crate::timestamp::{UnrecognizedDateFormat, parse_timestamp};

static START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-- Starting log at (.+?) --\s*$").unwrap());
static CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-- Closing log at (.+?) --\s*$").unwrap());
static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?) -- \[Note\] (.*)$").unwrap());
static ADJUSTMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?) -- \[Manual Adjustment\] ([+-]?\d+)\s*$").unwrap());
static OBSERVATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?) -- (.*?) ::: (.*)$").unwrap());

/// Why a single line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line matches no known event shape")]
    UnknownShape,
    #[error(transparent)]
    Timestamp(#[from] UnrecognizedDateFormat),
    #[error("adjustment seconds out of range: {0}")]
    AdjustmentSeconds(String),
}

/// The parsed log: events in file order plus what the parse itself learned.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    /// Events in the order they appear in the file.
    pub events: Vec<LogEvent>,
    /// Timestamp of the newest submission marker, if any.
    pub last_paid: Option<NaiveDateTime>,
    /// Lines skipped as unparseable.
    pub skipped: usize,
}

/// Parses one log line into an event.
pub fn parse_line(line: &str) -> Result<LogEvent, LineError> {
    let line = line.trim_end();
    if let Some(caps) = START_RE.captures(line) {
        return Ok(LogEvent::SessionStart {
            timestamp: parse_timestamp(&caps[1])?,
        });
    }
    if let Some(caps) = CLOSE_RE.captures(line) {
        return Ok(LogEvent::SessionEnd {
            timestamp: parse_timestamp(&caps[1])?,
        });
    }
    if let Some(caps) = NOTE_RE.captures(line) {
        return Ok(LogEvent::Note {
            timestamp: parse_timestamp(&caps[1])?,
            text: caps[2].to_string(),
        });
    }
    if let Some(caps) = ADJUSTMENT_RE.captures(line) {
        let seconds = caps[2]
            .parse()
            .map_err(|_| LineError::AdjustmentSeconds(caps[2].to_string()))?;
        return Ok(LogEvent::ManualAdjustment {
            timestamp: parse_timestamp(&caps[1])?,
            seconds,
        });
    }
    if let Some(caps) = OBSERVATION_RE.captures(line) {
        return Ok(LogEvent::Observation {
            timestamp: parse_timestamp(&caps[1])?,
            command: caps[2].to_string(),
            window_title: caps[3].to_string(),
        });
    }
    Err(LineError::UnknownShape)
}

/// Parses a whole log, skipping unparseable lines with a warning.
///
/// Blank lines are ignored silently. The newest submission-marker note
/// updates [`ParsedLog::last_paid`].
pub fn parse_log<'a, I>(lines: I) -> ParsedLog
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parsed = ParsedLog::default();
    for (number, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(event) => {
                if event.is_submission_marker() {
                    let ts = event.timestamp();
                    if parsed.last_paid.is_none_or(|previous| ts > previous) {
                        parsed.last_paid = Some(ts);
                    }
                }
                parsed.events.push(event);
            }
            Err(error) => {
                tracing::warn!(line = number + 1, %error, "skipping unparseable log line");
                parsed.skipped += 1;
            }
        }
    }
    parsed
}
