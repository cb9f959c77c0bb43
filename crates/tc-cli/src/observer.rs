//! Active-window observation.
//!
//! The recorder samples `(command, window title)` on a timer. Production
//! sampling shells out to `xprop`: `_NET_ACTIVE_WINDOW` on the root window
//! yields the active window id, `_NET_WM_NAME` and `_NET_WM_PID` on that
//! window yield the title and owning process, and the command comes from
//! `/proc/<pid>/comm`.

use std::process::Command;

use anyhow::{Context, Result, anyhow};

/// One sample of what the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSample {
    pub command: String,
    pub window_title: String,
}

/// Source of window samples; the recorder is generic over this so tests
/// can script samples.
pub trait WindowObserver {
    fn sample(&self) -> Result<WindowSample>;
}

/// Samples the active X11 window via `xprop`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XpropObserver;

impl WindowObserver for XpropObserver {
    fn sample(&self) -> Result<WindowSample> {
        let root = xprop(&["-root", "_NET_ACTIVE_WINDOW"])?;
        let window_id = root
            .split_whitespace()
            .last()
            .filter(|id| id.starts_with("0x") && *id != "0x0")
            .ok_or_else(|| anyhow!("no active window reported by xprop"))?
            .to_string();

        let props = xprop(&["-id", &window_id, "_NET_WM_NAME", "_NET_WM_PID"])?;
        let mut window_title = String::from("(untitled)");
        let mut command = String::from("(unknown)");
        for line in props.lines() {
            let Some(value) = line.splitn(2, " = ").nth(1) else {
                continue;
            };
            if line.starts_with("_NET_WM_NAME") {
                window_title = sanitize(value.trim().trim_matches('"'));
            } else if line.starts_with("_NET_WM_PID") {
                if let Ok(pid) = value.trim().parse::<u32>() {
                    if let Ok(comm) = std::fs::read_to_string(format!("/proc/{pid}/comm")) {
                        command = sanitize(comm.trim());
                    }
                }
            }
        }

        Ok(WindowSample {
            command,
            window_title,
        })
    }
}

fn xprop(args: &[&str]) -> Result<String> {
    let output = Command::new("xprop")
        .args(args)
        .output()
        .context("failed to run xprop")?;
    if !output.status.success() {
        anyhow::bail!("xprop exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Strips anything that would corrupt the line grammar: newlines become
/// spaces and the observation separator collapses.
fn sanitize(raw: &str) -> String {
    let flat: String = raw
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    flat.replace(":::", ":").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_flattens_newlines() {
        assert_eq!(sanitize("two\nlines"), "two lines");
    }

    #[test]
    fn sanitize_collapses_the_separator() {
        assert_eq!(sanitize("a ::: b"), "a : b");
        assert_eq!(sanitize("plain title"), "plain title");
    }

    #[test]
    fn sanitize_trims_edges() {
        assert_eq!(sanitize("  padded  "), "padded");
    }
}
