//! Append-only log writer.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tc_core::LogEvent;

/// Appends events to the timecard log, one line each.
///
/// The log is append-only; nothing here ever rewrites existing lines.
#[derive(Debug, Clone)]
pub struct LogWriter {
    path: PathBuf,
}

impl LogWriter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file this writer appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one event, creating the file and parent directory on first
    /// use.
    pub fn append(&self, event: &LogEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("failed to create log directory")?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{event}")
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        Ok(())
    }
}
