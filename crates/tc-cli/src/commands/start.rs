//! Start command: clock in and sample the active window until stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tc_core::{LogEvent, format_timestamp};

use crate::config::Config;
use crate::lock;
use crate::observer::WindowObserver;
use crate::writer::LogWriter;

/// How often the recording loop checks for shutdown between samples.
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Runs a recording session until the shutdown flag is set (by SIGINT or
/// SIGTERM). The closing marker is written and the lock released even if
/// the loop fails.
pub fn run<O: WindowObserver>(
    config: &Config,
    observer: &O,
    interval: Option<u64>,
    note: Option<&str>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let lock_path = config.lock_file();
    if let Some(pid) = lock::read(&lock_path)? {
        if lock::is_alive(pid) {
            anyhow::bail!("a recording session is already active (pid {pid})");
        }
        tracing::warn!(pid, "replacing stale lock file");
    }
    lock::acquire(&lock_path, lock::current_pid())?;

    let writer = LogWriter::new(&config.log_file);
    let interval = Duration::from_secs(interval.unwrap_or(config.interval_secs).max(1));

    let started = Local::now().naive_local();
    writer.append(&LogEvent::SessionStart { timestamp: started })?;
    if let Some(text) = note {
        writer.append(&LogEvent::Note {
            timestamp: started,
            text: text.to_string(),
        })?;
    }
    println!("Clocked in at {}.", format_timestamp(started));

    let outcome = record_until_shutdown(&writer, observer, interval, shutdown);

    let closed = Local::now().naive_local();
    writer.append(&LogEvent::SessionEnd { timestamp: closed })?;
    if !lock::release(&lock_path, lock::current_pid())? {
        tracing::warn!("lock file changed hands during the session");
    }
    println!("Clocked out at {}.", format_timestamp(closed));
    outcome
}

/// Samples until the shutdown flag is set. A failed sample is logged and
/// skipped; the session keeps running.
fn record_until_shutdown<O: WindowObserver>(
    writer: &LogWriter,
    observer: &O,
    interval: Duration,
    shutdown: &AtomicBool,
) -> Result<()> {
    while !shutdown.load(Ordering::SeqCst) {
        match observer.sample() {
            Ok(sample) => {
                writer.append(&LogEvent::Observation {
                    timestamp: Local::now().naive_local(),
                    command: sample.command,
                    window_title: sample.window_title,
                })?;
            }
            Err(error) => tracing::warn!(%error, "window sample failed"),
        }
        let mut waited = Duration::ZERO;
        while waited < interval && !shutdown.load(Ordering::SeqCst) {
            std::thread::sleep(SHUTDOWN_POLL);
            waited += SHUTDOWN_POLL;
        }
    }
    Ok(())
}
