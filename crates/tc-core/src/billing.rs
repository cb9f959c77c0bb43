//! Billing: clipping spans to a reporting window, totaling, and rounding.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::range::TimeRange;
use crate::span::{Adjustment, Span};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Quantization direction for billed hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    Up,
    Down,
    #[default]
    Nearest,
}

/// Where in the computation the rounding step applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppliedAt {
    /// Each span is rounded and the rounded values are summed.
    #[default]
    PerSpan,
    /// Spans bill raw; only the invoice total is rounded, once.
    PerInvoice,
}

/// Billing-time quantization rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    pub mode: RoundingMode,
    /// Rounding step in hours; must be positive.
    pub granularity: f64,
    #[serde(default)]
    pub applied_at: AppliedAt,
}

impl RoundingPolicy {
    /// Quantizes raw hours to the policy's granularity.
    ///
    /// A non-positive granularity leaves the value untouched; the config
    /// loader rejects such policies before they reach this point.
    #[must_use]
    pub fn round_hours(&self, hours: f64) -> f64 {
        if self.granularity <= 0.0 {
            return hours;
        }
        let steps = hours / self.granularity;
        let stepped = match self.mode {
            RoundingMode::Up => steps.ceil(),
            RoundingMode::Down => steps.floor(),
            RoundingMode::Nearest => steps.round(),
        };
        stepped * self.granularity
    }
}

/// One span's contribution to the report, clipped to the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanTotal {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub raw_hours: f64,
    pub billed_hours: f64,
}

/// The complete billing summary for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Reporting window: the supplied range, or the outermost span bounds.
    /// `None` when there is nothing to report.
    pub window: Option<TimeRange>,
    pub spans: Vec<SpanTotal>,
    /// Sum of raw span hours.
    pub worked_hours: f64,
    /// Included manual adjustments, in hours.
    pub adjustment_hours: f64,
    /// `worked_hours + adjustment_hours`.
    pub total_hours: f64,
    /// Policy-rounded hours plus adjustments.
    pub billed_hours: f64,
}

/// Clips a span's effective interval to the window.
///
/// Returns `None` when the overlap is empty; touching endpoints count as
/// empty.
fn clip(
    start: NaiveDateTime,
    end: NaiveDateTime,
    window: &TimeRange,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let clipped_start = start.max(window.start);
    let clipped_end = end.min(window.end);
    (clipped_start < clipped_end).then_some((clipped_start, clipped_end))
}

#[expect(clippy::cast_precision_loss, reason = "second counts are far below 2^52")]
fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / SECONDS_PER_HOUR
}

/// Computes the billing summary.
///
/// With no range every span bills at its own effective bounds. With a
/// range, spans are clipped to it and zero-overlap spans are skipped;
/// adjustments are atomic, included iff their timestamp lies within the
/// range, and are never rounded.
#[must_use]
pub fn summarize(
    spans: &[Span],
    adjustments: &[Adjustment],
    range: Option<&TimeRange>,
    policy: Option<&RoundingPolicy>,
) -> Summary {
    let mut totals = Vec::new();
    for span in spans {
        let (start, end) = match range {
            Some(window) => match clip(span.start(), span.end(), window) {
                Some(bounds) => bounds,
                None => continue,
            },
            None => (span.start(), span.end()),
        };
        let raw_hours = seconds_to_hours((end - start).num_seconds());
        let billed_hours = match policy {
            Some(p) if p.applied_at == AppliedAt::PerSpan => p.round_hours(raw_hours),
            _ => raw_hours,
        };
        totals.push(SpanTotal {
            start,
            end,
            raw_hours,
            billed_hours,
        });
    }

    let worked_hours: f64 = totals.iter().map(|t| t.raw_hours).sum();
    let adjustment_seconds: i64 = adjustments
        .iter()
        .filter(|a| range.is_none_or(|r| r.contains(a.timestamp)))
        .map(|a| a.seconds)
        .sum();
    let adjustment_hours = seconds_to_hours(adjustment_seconds);

    let billed_spans = match policy {
        Some(p) if p.applied_at == AppliedAt::PerInvoice => p.round_hours(worked_hours),
        _ => totals.iter().map(|t| t.billed_hours).sum(),
    };

    let window = match range {
        Some(r) => Some(*r),
        None => match (totals.first(), totals.last()) {
            (Some(first), Some(last)) => Some(TimeRange {
                start: first.start,
                end: last.end,
            }),
            _ => None,
        },
    };

    Summary {
        window,
        spans: totals,
        worked_hours,
        adjustment_hours,
        total_hours: worked_hours + adjustment_hours,
        billed_hours: billed_spans + adjustment_hours,
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp, reason = "expected values are exactly representable")]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::parse::parse_log;
    use crate::span::reconstruct;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn window(a: NaiveDateTime, b: NaiveDateTime) -> TimeRange {
        TimeRange::from_endpoints(a, b)
    }

    fn spans_from(log: &str) -> (Vec<Span>, Vec<Adjustment>) {
        let parsed = parse_log(log.lines());
        let reconstruction = reconstruct(&parsed.events);
        (reconstruction.spans, reconstruction.adjustments)
    }

    const SIMPLE_LOG: &str = "\
-- Starting log at 09:00:00, Mon Jan 01, 2024 --
09:00:00, Mon Jan 01, 2024 -- bash ::: term
-- Closing log at 11:30:00, Mon Jan 01, 2024 --";

    #[test]
    fn rounding_up_quantizes_to_granularity() {
        let policy = RoundingPolicy {
            mode: RoundingMode::Up,
            granularity: 0.25,
            applied_at: AppliedAt::PerSpan,
        };
        assert_eq!(policy.round_hours(1.01), 1.25);
        assert_eq!(policy.round_hours(1.25), 1.25);
        assert_eq!(policy.round_hours(0.0), 0.0);
    }

    #[test]
    fn rounding_down_and_nearest() {
        let down = RoundingPolicy {
            mode: RoundingMode::Down,
            granularity: 0.5,
            applied_at: AppliedAt::PerSpan,
        };
        assert_eq!(down.round_hours(1.99), 1.5);

        let nearest = RoundingPolicy {
            mode: RoundingMode::Nearest,
            granularity: 0.5,
            applied_at: AppliedAt::PerSpan,
        };
        assert_eq!(nearest.round_hours(1.2), 1.0);
        assert_eq!(nearest.round_hours(1.3), 1.5);
    }

    #[test]
    fn simple_log_sums_to_two_and_a_half_hours() {
        let (spans, adjustments) = spans_from(SIMPLE_LOG);
        let summary = summarize(&spans, &adjustments, None, None);
        assert_eq!(summary.spans.len(), 1);
        assert_eq!(summary.spans[0].raw_hours, 2.5);
        assert_eq!(summary.total_hours, 2.5);
        assert_eq!(summary.billed_hours, 2.5);
        let window = summary.window.unwrap();
        assert_eq!(window.start, ts(9, 0));
        assert_eq!(window.end, ts(11, 30));
    }

    #[test]
    fn manual_adjustment_is_added_unrounded() {
        let log = format!(
            "{SIMPLE_LOG}\n09:05:00, Mon Jan 01, 2024 -- [Manual Adjustment] 1800"
        );
        let (spans, adjustments) = spans_from(&log);
        let summary = summarize(&spans, &adjustments, None, None);
        assert_eq!(summary.worked_hours, 2.5);
        assert_eq!(summary.adjustment_hours, 0.5);
        assert_eq!(summary.total_hours, 3.0);
        assert_eq!(summary.billed_hours, 3.0);
    }

    #[test]
    fn clipping_covers_all_four_overlap_cases() {
        let (spans, _) = spans_from(
            "\
-- Starting log at 08:00:00, Mon Jan 01, 2024 --
-- Closing log at 12:00:00, Mon Jan 01, 2024 --",
        );

        // Span fully contains the range: clip to exactly the range.
        let inner = window(ts(9, 0), ts(10, 0));
        let summary = summarize(&spans, &[], Some(&inner), None);
        assert_eq!(summary.spans[0].raw_hours, 1.0);

        // Span starts before the range: clip the start only.
        let late = window(ts(10, 0), ts(14, 0));
        let summary = summarize(&spans, &[], Some(&late), None);
        assert_eq!(summary.spans[0].start, ts(10, 0));
        assert_eq!(summary.spans[0].end, ts(12, 0));

        // Span ends after the range: clip the end only.
        let early = window(ts(6, 0), ts(9, 0));
        let summary = summarize(&spans, &[], Some(&early), None);
        assert_eq!(summary.spans[0].start, ts(8, 0));
        assert_eq!(summary.spans[0].end, ts(9, 0));

        // Span fully inside the range: unchanged.
        let outer = window(ts(6, 0), ts(14, 0));
        let summary = summarize(&spans, &[], Some(&outer), None);
        assert_eq!(summary.spans[0].start, ts(8, 0));
        assert_eq!(summary.spans[0].end, ts(12, 0));
        assert_eq!(summary.spans[0].raw_hours, 4.0);
    }

    #[test]
    fn zero_overlap_spans_are_skipped() {
        let (spans, _) = spans_from(SIMPLE_LOG);
        let disjoint = window(ts(13, 0), ts(14, 0));
        let summary = summarize(&spans, &[], Some(&disjoint), None);
        assert!(summary.spans.is_empty());
        assert_eq!(summary.billed_hours, 0.0);
        // The window is still echoed in the summary.
        assert_eq!(summary.window, Some(disjoint));

        // Touching endpoints are zero overlap too.
        let touching = window(ts(11, 30), ts(12, 0));
        let summary = summarize(&spans, &[], Some(&touching), None);
        assert!(summary.spans.is_empty());
    }

    #[test]
    fn adjustments_outside_the_range_are_excluded() {
        let adjustments = [
            Adjustment { timestamp: ts(9, 30), seconds: 3600 },
            Adjustment { timestamp: ts(15, 0), seconds: 3600 },
        ];
        let range = window(ts(9, 0), ts(10, 0));
        let summary = summarize(&[], &adjustments, Some(&range), None);
        assert_eq!(summary.adjustment_hours, 1.0);
        assert_eq!(summary.billed_hours, 1.0);
    }

    #[test]
    fn per_span_rounding_sums_rounded_values() {
        let log = "\
-- Starting log at 09:00:00, Mon Jan 01, 2024 --
-- Closing log at 10:10:00, Mon Jan 01, 2024 --
-- Starting log at 11:00:00, Mon Jan 01, 2024 --
-- Closing log at 12:10:00, Mon Jan 01, 2024 --";
        let (spans, _) = spans_from(log);
        let policy = RoundingPolicy {
            mode: RoundingMode::Up,
            granularity: 0.5,
            applied_at: AppliedAt::PerSpan,
        };
        let summary = summarize(&spans, &[], None, Some(&policy));
        // Two spans of 1h10m each round to 1.5h apiece.
        assert_eq!(summary.spans[0].billed_hours, 1.5);
        assert_eq!(summary.spans[1].billed_hours, 1.5);
        assert_eq!(summary.billed_hours, 3.0);
    }

    #[test]
    fn per_invoice_rounding_rounds_once() {
        let log = "\
-- Starting log at 09:00:00, Mon Jan 01, 2024 --
-- Closing log at 10:10:00, Mon Jan 01, 2024 --
-- Starting log at 11:00:00, Mon Jan 01, 2024 --
-- Closing log at 12:10:00, Mon Jan 01, 2024 --";
        let (spans, _) = spans_from(log);
        let policy = RoundingPolicy {
            mode: RoundingMode::Up,
            granularity: 0.5,
            applied_at: AppliedAt::PerInvoice,
        };
        let summary = summarize(&spans, &[], None, Some(&policy));
        // Spans bill raw; the 2h20m total rounds once to 2.5h.
        assert_eq!(summary.spans[0].billed_hours, summary.spans[0].raw_hours);
        assert_eq!(summary.billed_hours, 2.5);
    }

    #[test]
    fn policy_deserializes_from_config_shapes() {
        let policy: RoundingPolicy = serde_json::from_str(
            r#"{"mode":"up","granularity":0.25,"applied_at":"per_invoice"}"#,
        )
        .unwrap();
        assert_eq!(policy.mode, RoundingMode::Up);
        assert_eq!(policy.applied_at, AppliedAt::PerInvoice);

        // `applied_at` is optional and defaults to per-span.
        let defaulted: RoundingPolicy =
            serde_json::from_str(r#"{"mode":"down","granularity":1.0}"#).unwrap();
        assert_eq!(defaulted.applied_at, AppliedAt::PerSpan);
    }

    #[test]
    fn empty_log_reports_no_window() {
        let summary = summarize(&[], &[], None, None);
        assert!(summary.spans.is_empty());
        assert_eq!(summary.window, None);
        assert_eq!(summary.total_hours, 0.0);
    }
}
