//! Submit command: mark a pay-period boundary.

use anyhow::Result;
use chrono::Local;
use tc_core::{LogEvent, SUBMISSION_MARKER, format_timestamp};

use crate::writer::LogWriter;

pub fn run(writer: &LogWriter) -> Result<()> {
    let timestamp = Local::now().naive_local();
    writer.append(&LogEvent::Note {
        timestamp,
        text: SUBMISSION_MARKER.to_string(),
    })?;
    println!(
        "Submission marker recorded at {}; `lastpaid` now resolves here.",
        format_timestamp(timestamp)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use tc_core::parse_log;

    use super::*;

    #[test]
    fn submit_updates_the_last_paid_marker() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LogWriter::new(dir.path().join("timecard.log"));
        run(&writer).unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let parsed = parse_log(content.lines());
        assert!(parsed.last_paid.is_some());
    }
}
