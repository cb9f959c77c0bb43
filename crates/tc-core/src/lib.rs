//! Core domain logic for the timecard time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Log events: the typed representation of one log line
//! - Span reconstruction: grouping events into recorded work sessions
//! - Time ranges: resolving the CLI range mini-language into concrete bounds
//! - Billing: clipping, totaling, and rounding worked hours
//! - Histograms: attributing elapsed time to commands and window titles
//!
//! Everything here is a pure function of the event sequence, the
//! configuration, and an injected "now"; reading the log file and writing
//! to it live in the CLI crate.

pub mod billing;
pub mod event;
pub mod histogram;
pub mod parse;
pub mod range;
pub mod span;
pub mod timestamp;

pub use billing::{AppliedAt, RoundingMode, RoundingPolicy, SpanTotal, Summary, summarize};
pub use event::{LogEvent, SUBMISSION_MARKER};
pub use histogram::{Bucket, Histogram, aggregate};
pub use parse::{LineError, ParsedLog, parse_line, parse_log};
pub use range::{RangeError, TimeRange, resolve_range};
pub use span::{Adjustment, Reconstruction, Span, reconstruct};
pub use timestamp::{UnrecognizedDateFormat, format_compact, format_timestamp, parse_timestamp};
