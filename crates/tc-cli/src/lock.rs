//! Single-instance session lock.
//!
//! A recording session owns a lock file beside the log holding its process
//! id in text. `start` refuses to run while a live lock exists; `stop`
//! reads the pid and signals it.

use std::path::Path;

use anyhow::{Context, Result};

/// This process's pid as stored in lock files.
#[must_use]
#[expect(
    clippy::cast_possible_wrap,
    reason = "pids fit in i32 on supported platforms"
)]
pub fn current_pid() -> i32 {
    std::process::id() as i32
}

/// Reads the pid stored in the lock file.
///
/// Returns `None` when the file is missing or does not hold a pid.
pub fn read(path: &Path) -> Result<Option<i32>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content.trim().parse().ok()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            Err(e).with_context(|| format!("failed to read lock file {}", path.display()))
        }
    }
}

/// Writes the given pid, claiming the session.
pub fn acquire(path: &Path, pid: i32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create lock directory")?;
    }
    std::fs::write(path, pid.to_string())
        .with_context(|| format!("failed to write lock file {}", path.display()))
}

/// Removes the lock if it still names the given pid.
///
/// Returns `false` when the lock changed hands (or vanished) in the
/// meantime, in which case it is left alone.
pub fn release(path: &Path, pid: i32) -> Result<bool> {
    if read(path)? != Some(pid) {
        return Ok(false);
    }
    std::fs::remove_file(path)
        .with_context(|| format!("failed to remove lock file {}", path.display()))?;
    Ok(true)
}

/// Whether a process with this pid is currently running.
#[must_use]
#[expect(unsafe_code, reason = "liveness probe is signal 0 via libc::kill")]
pub fn is_alive(pid: i32) -> bool {
    // Signal 0 performs the permission check without delivering anything.
    unsafe { libc::kill(pid, 0) == 0 }
}

/// Sends SIGTERM to the process owning the lock.
#[expect(unsafe_code, reason = "process signaling requires libc::kill")]
pub fn terminate(pid: i32) -> Result<()> {
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        anyhow::bail!("failed to signal process {pid}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timecard.lock");
        assert_eq!(read(&path).unwrap(), None);
    }

    #[test]
    fn acquire_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timecard.lock");
        acquire(&path, 4242).unwrap();
        assert_eq!(read(&path).unwrap(), Some(4242));
    }

    #[test]
    fn garbage_content_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timecard.lock");
        std::fs::write(&path, "not a pid").unwrap();
        assert_eq!(read(&path).unwrap(), None);
    }

    #[test]
    fn release_only_removes_our_own_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timecard.lock");
        acquire(&path, 4242).unwrap();

        assert!(!release(&path, 9999).unwrap());
        assert!(path.exists());

        assert!(release(&path, 4242).unwrap());
        assert!(!path.exists());

        // Releasing a missing lock is a no-op.
        assert!(!release(&path, 4242).unwrap());
    }

    #[test]
    fn liveness_probe_sees_this_process() {
        assert!(is_alive(current_pid()));
        // i32::MAX is far above any real pid.
        assert!(!is_alive(i32::MAX));
    }
}
