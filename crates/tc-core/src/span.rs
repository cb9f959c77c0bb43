//! Span reconstruction: grouping events into recorded work sessions.
//!
//! The sweep is an explicit two-state machine. The anomalies the log
//! format tolerates -- a start marker arriving while a span is still open,
//! a trailing span with no closing marker -- are deliberate transitions
//! here, not incidental fallthrough.

use chrono::NaiveDateTime;

use crate::event::LogEvent;

/// One contiguous recorded work session.
///
/// Invariants: the event list is non-empty, the first event is a
/// `SessionStart`, and timestamps are non-decreasing in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    events: Vec<LogEvent>,
    terminated: bool,
}

impl Span {
    fn open(start: LogEvent) -> Self {
        Self {
            events: vec![start],
            terminated: false,
        }
    }

    /// The events of this span, in log order.
    #[must_use]
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// When recording started.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.events[0].timestamp()
    }

    /// When recording effectively ended: the closing marker, or the last
    /// event of an unterminated span.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.events
            .last()
            .expect("a span always holds its start marker")
            .timestamp()
    }

    /// Whether the span was closed by a `SessionEnd` marker.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// A manual correction to total worked time, independent of spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub timestamp: NaiveDateTime,
    pub seconds: i64,
}

/// Everything one sweep over the event stream recovers.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    /// Work spans in log order.
    pub spans: Vec<Span>,
    /// Manual adjustments, collected regardless of session boundaries.
    pub adjustments: Vec<Adjustment>,
    /// Spans that were still open when the next start marker arrived.
    pub anomalies: usize,
}

enum State {
    Closed,
    Open(Span),
}

/// Groups the event stream into spans.
///
/// Events before the first `SessionStart` never join a span; adjustments
/// among them are still collected.
#[must_use]
pub fn reconstruct(events: &[LogEvent]) -> Reconstruction {
    let mut result = Reconstruction::default();
    let mut state = State::Closed;

    for event in events {
        if let LogEvent::ManualAdjustment { timestamp, seconds } = event {
            result.adjustments.push(Adjustment {
                timestamp: *timestamp,
                seconds: *seconds,
            });
        }

        state = match (state, event) {
            (State::Open(span), LogEvent::SessionStart { .. }) => {
                tracing::warn!(
                    start = %span.start(),
                    "start marker while a span is open; keeping the open span unterminated"
                );
                result.anomalies += 1;
                result.spans.push(span);
                State::Open(Span::open(event.clone()))
            }
            (State::Closed, LogEvent::SessionStart { .. }) => {
                State::Open(Span::open(event.clone()))
            }
            (State::Open(mut span), LogEvent::SessionEnd { .. }) => {
                span.events.push(event.clone());
                span.terminated = true;
                result.spans.push(span);
                State::Closed
            }
            (State::Open(mut span), _) => {
                span.events.push(event.clone());
                State::Open(span)
            }
            (State::Closed, _) => State::Closed,
        };
    }

    if let State::Open(span) = state {
        result.spans.push(span);
    }
    result
}
