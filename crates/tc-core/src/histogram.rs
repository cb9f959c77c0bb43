//! Histogram aggregation: elapsed time attributed to commands and windows.
//!
//! Sessions are segmented exactly like span reconstruction. Within a
//! segment the gap between two observation samples is credited to the
//! earlier sample's command and window title; notes and adjustments do
//! not break adjacency, a closing marker does.

use std::collections::HashMap;

use serde::Serialize;

use crate::event::LogEvent;

/// Accumulated seconds for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub seconds: i64,
}

/// Elapsed-time attribution over the whole log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Histogram {
    /// Seconds per observed command, descending.
    pub by_command: Vec<Bucket>,
    /// Seconds per observed window title, descending.
    pub by_window: Vec<Bucket>,
}

/// Insertion-ordered accumulation map.
#[derive(Debug, Default)]
struct Buckets {
    order: Vec<Bucket>,
    index: HashMap<String, usize>,
}

impl Buckets {
    fn add(&mut self, key: &str, seconds: i64) {
        if let Some(&at) = self.index.get(key) {
            self.order[at].seconds += seconds;
        } else {
            self.index.insert(key.to_string(), self.order.len());
            self.order.push(Bucket {
                key: key.to_string(),
                seconds,
            });
        }
    }

    /// Descending by accumulated time; the sort is stable, so ties keep
    /// insertion order.
    fn into_sorted(mut self) -> Vec<Bucket> {
        self.order.sort_by(|a, b| b.seconds.cmp(&a.seconds));
        self.order
    }
}

/// Attributes elapsed time between adjacent observations.
#[must_use]
pub fn aggregate(events: &[LogEvent]) -> Histogram {
    let mut by_command = Buckets::default();
    let mut by_window = Buckets::default();
    let mut open = false;
    let mut previous: Option<&LogEvent> = None;

    for event in events {
        match event {
            LogEvent::SessionStart { .. } => {
                open = true;
                previous = None;
            }
            LogEvent::SessionEnd { .. } => {
                open = false;
                previous = None;
            }
            LogEvent::Observation { timestamp, .. } if open => {
                if let Some(LogEvent::Observation {
                    timestamp: previous_ts,
                    command,
                    window_title,
                }) = previous
                {
                    let seconds = (*timestamp - *previous_ts).num_seconds();
                    by_command.add(command, seconds);
                    by_window.add(window_title, seconds);
                }
                previous = Some(event);
            }
            _ => {}
        }
    }

    Histogram {
        by_command: by_command.into_sorted(),
        by_window: by_window.into_sorted(),
    }
}
