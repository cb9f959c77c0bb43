//! Adjust command: record a manual correction to total worked time.

use anyhow::Result;
use chrono::Local;
use tc_core::{LogEvent, format_timestamp};

use crate::writer::LogWriter;

pub fn run(writer: &LogWriter, seconds: i64) -> Result<()> {
    let timestamp = Local::now().naive_local();
    writer.append(&LogEvent::ManualAdjustment { timestamp, seconds })?;
    println!(
        "Recorded adjustment of {seconds} seconds at {}.",
        format_timestamp(timestamp)
    );
    Ok(())
}
