//! Timestamp formatting and permissive parsing.
//!
//! Log lines carry local wall-clock timestamps with no zone information,
//! written as `09:00:00, Mon Jan 01, 2024`. Reading tries the writer's own
//! format first, then a small set of common absolute spellings so range
//! expressions and hand-edited lines still resolve.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// The format the log writer emits: `09:00:00, Mon Jan 01, 2024`.
pub const LOG_FORMAT: &str = "%H:%M:%S, %a %b %d, %Y";

/// Compact form used in summary footers: `2024-01-01_09:00:00`.
pub const COMPACT_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Datetime spellings accepted by [`parse_timestamp`], tried in order.
const DATETIME_FORMATS: &[&str] = &[
    LOG_FORMAT,
    COMPACT_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%H:%M:%S, %b %d, %Y",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only spellings, resolved to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%a %b %d, %Y"];

/// The input matched none of the accepted date spellings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized date format: {0:?}")]
pub struct UnrecognizedDateFormat(pub String);

/// Renders a timestamp the way the log writer spells it.
#[must_use]
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(LOG_FORMAT).to_string()
}

/// Renders the compact `YYYY-MM-DD_HH:MM:SS` form.
#[must_use]
pub fn format_compact(ts: NaiveDateTime) -> String {
    ts.format(COMPACT_FORMAT).to_string()
}

/// Parses any accepted timestamp spelling.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, UnrecognizedDateFormat> {
    let input = input.trim();
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(UnrecognizedDateFormat(input.to_string()))
}
