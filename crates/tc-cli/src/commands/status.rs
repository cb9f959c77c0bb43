//! Status command: is a recording session active?

use std::io::Write;

use anyhow::Result;

use crate::config::Config;
use crate::lock;

pub fn run<W: Write>(out: &mut W, config: &Config) -> Result<()> {
    writeln!(out, "Log file: {}", config.log_file.display())?;
    match lock::read(&config.lock_file())? {
        Some(pid) if lock::is_alive(pid) => {
            writeln!(out, "Recording session active (pid {pid}).")?;
        }
        Some(pid) => writeln!(out, "Stale lock file: pid {pid} is not running.")?,
        None => writeln!(out, "No active recording session.")?,
    }
    Ok(())
}
