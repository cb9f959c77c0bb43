//! Note command: append a free-form annotation to the log.

use anyhow::Result;
use chrono::Local;
use tc_core::{LogEvent, format_timestamp};

use crate::writer::LogWriter;

pub fn run(writer: &LogWriter, text: &str) -> Result<()> {
    let timestamp = Local::now().naive_local();
    writer.append(&LogEvent::Note {
        timestamp,
        text: text.to_string(),
    })?;
    println!("Note saved at {}.", format_timestamp(timestamp));
    Ok(())
}
