//! Summary command: billable hours reconstructed from the log.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use tc_core::{
    ParsedLog, Reconstruction, RoundingPolicy, Summary, format_compact, format_timestamp,
    parse_log, reconstruct, resolve_range, summarize,
};

/// JSON shape for `summary --json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    summary: &'a Summary,
    skipped_lines: usize,
    anomalies: usize,
}

/// Parses the log text, resolves the optional range against `now`, and
/// renders the billing summary.
pub fn run<W: Write>(
    out: &mut W,
    log_text: &str,
    range_expression: Option<&str>,
    policy: Option<&RoundingPolicy>,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let parsed = parse_log(log_text.lines());
    let reconstruction = reconstruct(&parsed.events);

    let range = match range_expression {
        Some(expression) => Some(resolve_range(expression, now, parsed.last_paid)?),
        None => None,
    };

    let summary = summarize(
        &reconstruction.spans,
        &reconstruction.adjustments,
        range.as_ref(),
        policy,
    );

    if json {
        render_json(out, &summary, &parsed, &reconstruction)?;
    } else {
        render_text(out, &summary, &parsed, &reconstruction)?;
    }
    Ok(())
}

fn render_json<W: Write>(
    out: &mut W,
    summary: &Summary,
    parsed: &ParsedLog,
    reconstruction: &Reconstruction,
) -> Result<()> {
    let report = JsonReport {
        summary,
        skipped_lines: parsed.skipped,
        anomalies: reconstruction.anomalies,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

fn render_text<W: Write>(
    out: &mut W,
    summary: &Summary,
    parsed: &ParsedLog,
    reconstruction: &Reconstruction,
) -> Result<()> {
    if parsed.skipped > 0 {
        writeln!(out, "Warning: skipped {} unparseable line(s).", parsed.skipped)?;
    }
    if reconstruction.anomalies > 0 {
        writeln!(
            out,
            "Warning: {} session(s) never closed before the next one started.",
            reconstruction.anomalies
        )?;
    }

    for span in &summary.spans {
        writeln!(
            out,
            "Worked from {} to {}",
            format_timestamp(span.start),
            format_timestamp(span.end)
        )?;
        writeln!(
            out,
            "  -- {:.3} hours (billed {:.3})",
            span.raw_hours, span.billed_hours
        )?;
    }

    if summary.adjustment_hours.abs() > f64::EPSILON {
        writeln!(out, "Manual adjustments: {:+.3} hours", summary.adjustment_hours)?;
    }

    match summary.window {
        Some(window) => {
            writeln!(out)?;
            writeln!(
                out,
                "Total time worked from {} to {}:",
                format_compact(window.start),
                format_compact(window.end)
            )?;
            writeln!(
                out,
                "    {:.3} hours ({:.3} billed)",
                summary.total_hours, summary.billed_hours
            )?;
        }
        None => writeln!(out, "No work recorded.")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use insta::assert_snapshot;
    use tc_core::{AppliedAt, RoundingMode};

    use super::*;

    const SIMPLE_LOG: &str = "\
-- Starting log at 09:00:00, Mon Jan 01, 2024 --
09:00:00, Mon Jan 01, 2024 -- bash ::: term
-- Closing log at 11:30:00, Mon Jan 01, 2024 --
09:05:00, Mon Jan 01, 2024 -- [Manual Adjustment] 1800";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn render(log: &str, range: Option<&str>, policy: Option<&RoundingPolicy>) -> String {
        let mut out = Vec::new();
        run(&mut out, log, range, policy, now(), false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn simple_log_renders_spans_and_totals() {
        let output = render(SIMPLE_LOG, None, None);
        assert_snapshot!(output.trim_end(), @r"
Worked from 09:00:00, Mon Jan 01, 2024 to 11:30:00, Mon Jan 01, 2024
  -- 2.500 hours (billed 2.500)
Manual adjustments: +0.500 hours

Total time worked from 2024-01-01_09:00:00 to 2024-01-01_11:30:00:
    3.000 hours (3.000 billed)
");
    }

    #[test]
    fn rounding_policy_shows_in_billed_numbers() {
        let policy = RoundingPolicy {
            mode: RoundingMode::Up,
            granularity: 1.0,
            applied_at: AppliedAt::PerSpan,
        };
        let output = render(SIMPLE_LOG, None, Some(&policy));
        assert!(output.contains("  -- 2.500 hours (billed 3.000)"));
        assert!(output.contains("    3.000 hours (3.500 billed)"));
    }

    #[test]
    fn stale_range_selects_nothing() {
        // The log is entirely older than one day before `now`.
        let output = render(SIMPLE_LOG, Some("1d-now"), None);
        assert!(output.contains("    0.000 hours (0.000 billed)"));
        assert!(!output.contains("Worked from"));
    }

    #[test]
    fn empty_log_reports_no_data() {
        let output = render("", None, None);
        assert_eq!(output, "No work recorded.\n");
    }

    #[test]
    fn unresolvable_lastpaid_is_an_error() {
        let mut out = Vec::new();
        let error =
            run(&mut out, SIMPLE_LOG, Some("lastpaid"), None, now(), false).unwrap_err();
        assert!(error.to_string().contains("submission marker"));
    }

    #[test]
    fn skipped_lines_are_reported() {
        let log = format!("{SIMPLE_LOG}\n???");
        let output = render(&log, None, None);
        assert!(output.contains("Warning: skipped 1 unparseable line(s)."));
    }

    #[test]
    fn json_output_carries_totals_and_window() {
        let mut out = Vec::new();
        run(&mut out, SIMPLE_LOG, None, None, now(), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["total_hours"], 3.0);
        assert_eq!(value["billed_hours"], 3.0);
        assert_eq!(value["skipped_lines"], 0);
        assert_eq!(value["window"]["start"], "2024-01-01T09:00:00");
        assert_eq!(value["spans"].as_array().unwrap().len(), 1);
    }
}
