//! Analyze command: attribute recorded time to commands and windows.

use std::io::Write;

use anyhow::Result;
use tc_core::{Bucket, Histogram, aggregate, parse_log};

/// Parses the log text and renders the elapsed-time histogram.
pub fn run<W: Write>(out: &mut W, log_text: &str, json: bool) -> Result<()> {
    let parsed = parse_log(log_text.lines());
    let histogram = aggregate(&parsed.events);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&histogram)?)?;
    } else {
        render_text(out, &histogram)?;
    }
    Ok(())
}

fn render_text<W: Write>(out: &mut W, histogram: &Histogram) -> Result<()> {
    if histogram.by_command.is_empty() {
        writeln!(out, "No observations recorded.")?;
        return Ok(());
    }
    writeln!(out, "By command:")?;
    render_buckets(out, &histogram.by_command)?;
    writeln!(out)?;
    writeln!(out, "By window title:")?;
    render_buckets(out, &histogram.by_window)?;
    Ok(())
}

fn render_buckets<W: Write>(out: &mut W, buckets: &[Bucket]) -> Result<()> {
    let width = buckets
        .iter()
        .map(|bucket| bucket.key.chars().count())
        .max()
        .unwrap_or(0);
    for bucket in buckets {
        writeln!(
            out,
            "  {:<width$}  {}",
            bucket.key,
            format_seconds(bucket.seconds)
        )?;
    }
    Ok(())
}

/// Renders accumulated seconds as `2h 05m 00s`, dropping leading zero
/// units.
fn format_seconds(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}
