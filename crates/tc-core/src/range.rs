//! Time-range expression resolution.
//!
//! Grammar: `side ['-' side]`, each side one of `now`, `today`, `all`,
//! `lastpaid`, a duration like `1w2d3h`, an integer Unix epoch, or an
//! absolute date. Absolute dates themselves contain `-`, so the whole
//! expression is tried as a single side before any `-` is treated as the
//! range separator.

use std::sync::LazyLock;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::timestamp::parse_timestamp;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+[wdhms])+$").unwrap());
static DURATION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([wdhms])").unwrap());

/// A resolved reporting window, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Builds a range from two endpoints in either order.
    #[must_use]
    pub fn from_endpoints(a: NaiveDateTime, b: NaiveDateTime) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Whether a timestamp lies inside the range (closed interval).
    #[must_use]
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Why a range expression failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// `lastpaid` was used but the log holds no submission marker.
    #[error("`lastpaid` is unresolvable: the log has no submission marker")]
    UnresolvedReference,
    /// A side matched no recognized form.
    #[error("unrecognized date format: {0:?}")]
    UnrecognizedDateFormat(String),
}

/// Resolves a range expression against a fixed `now` and the last-paid
/// marker. A bare side means "from there until now"; endpoints are sorted,
/// so `a-b` and `b-a` resolve to the same range.
pub fn resolve_range(
    expression: &str,
    now: NaiveDateTime,
    last_paid: Option<NaiveDateTime>,
) -> Result<TimeRange, RangeError> {
    let expression = expression.trim();
    match resolve_side(expression, now, last_paid) {
        Ok(side) => return Ok(TimeRange::from_endpoints(side, now)),
        Err(RangeError::UnresolvedReference) => return Err(RangeError::UnresolvedReference),
        Err(RangeError::UnrecognizedDateFormat(_)) => {}
    }

    for (index, _) in expression.match_indices('-') {
        let left = expression[..index].trim();
        if left.is_empty() {
            continue;
        }
        let left = match resolve_side(left, now, last_paid) {
            Ok(ts) => ts,
            Err(RangeError::UnresolvedReference) => return Err(RangeError::UnresolvedReference),
            Err(RangeError::UnrecognizedDateFormat(_)) => continue,
        };
        // A dangling separator means "until now".
        let right = expression[index + 1..].trim();
        let right = if right.is_empty() {
            now
        } else {
            match resolve_side(right, now, last_paid) {
                Ok(ts) => ts,
                Err(RangeError::UnresolvedReference) => {
                    return Err(RangeError::UnresolvedReference);
                }
                Err(RangeError::UnrecognizedDateFormat(_)) => continue,
            }
        };
        return Ok(TimeRange::from_endpoints(left, right));
    }

    Err(RangeError::UnrecognizedDateFormat(expression.to_string()))
}

/// Resolves one side of a range expression, in the documented priority
/// order: keyword, duration, epoch integer, absolute date.
fn resolve_side(
    side: &str,
    now: NaiveDateTime,
    last_paid: Option<NaiveDateTime>,
) -> Result<NaiveDateTime, RangeError> {
    // Keywords are case- and spacing-insensitive ("Last Paid" == "lastpaid").
    let keyword: String = side.to_lowercase().split_whitespace().collect();
    match keyword.as_str() {
        "now" => return Ok(now),
        "today" => return Ok(now.date().and_time(NaiveTime::MIN)),
        "all" => return Ok(NaiveDateTime::UNIX_EPOCH),
        "lastpaid" => return last_paid.ok_or(RangeError::UnresolvedReference),
        _ => {}
    }
    if DURATION_RE.is_match(&keyword) {
        return Ok(now - parse_duration(&keyword));
    }
    if let Ok(epoch) = keyword.parse::<i64>() {
        if let Some(ts) = Local.timestamp_opt(epoch, 0).earliest() {
            return Ok(ts.naive_local());
        }
    }
    parse_timestamp(side).map_err(|_| RangeError::UnrecognizedDateFormat(side.to_string()))
}

/// Sums duration tokens; weeks fold into days, h/m/s fold into seconds.
fn parse_duration(input: &str) -> Duration {
    let mut days = 0_i64;
    let mut seconds = 0_i64;
    for caps in DURATION_TOKEN_RE.captures_iter(input) {
        let count: i64 = caps[1].parse().unwrap_or(0);
        match &caps[2] {
            "w" => days += count * 7,
            "d" => days += count,
            "h" => seconds += count * 3600,
            "m" => seconds += count * 60,
            _ => seconds += count,
        }
    }
    Duration::days(days) + Duration::seconds(seconds)
}
