//! Stop command: signal the recording process to clock out.

use anyhow::{Context, Result};
use chrono::Local;
use tc_core::{LogEvent, format_timestamp};

use crate::config::Config;
use crate::lock;
use crate::writer::LogWriter;

/// Signals the recorder named in the lock file; the recorder itself
/// writes the closing marker on the way down.
pub fn run(config: &Config, note: Option<&str>) -> Result<()> {
    let lock_path = config.lock_file();
    let pid = lock::read(&lock_path)?
        .context("no active recording session (lock file missing or unreadable)")?;
    if !lock::is_alive(pid) {
        anyhow::bail!(
            "lock file names pid {pid}, which is not running; remove {} by hand",
            lock_path.display()
        );
    }

    if let Some(text) = note {
        LogWriter::new(&config.log_file).append(&LogEvent::Note {
            timestamp: Local::now().naive_local(),
            text: text.to_string(),
        })?;
    }

    lock::terminate(pid)?;
    println!(
        "Clocked out at {}.",
        format_timestamp(Local::now().naive_local())
    );
    Ok(())
}
