//! Enter/leave event log with a bounded presentation window.

use serde::Serialize;

/// How many of the newest events are surfaced for presentation.
const DISPLAY_LIMIT: usize = 5;
/// Events older than this many frames are expired for display (kept for audit).
const DISPLAY_HORIZON: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Entered,
    Left,
}

/// One enter or leave event, attributed to a display identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub message: String,
    pub kind: EventKind,
    pub frame: i64,
}

impl Event {
    pub fn entered(display_id: u32, frame: i64) -> Self {
        Self {
            message: format!("Sack {display_id} Entered (+1)"),
            kind: EventKind::Entered,
            frame,
        }
    }

    pub fn left(display_id: u32, frame: i64) -> Self {
        Self {
            message: format!("Sack {display_id} Left (-1)"),
            kind: EventKind::Left,
            frame,
        }
    }
}

/// Append-only event log. The full history is retained for audit; only a
/// small rolling window is surfaced for display.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The full audit log, oldest first.
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    /// Events appended at or after a previously taken `len()` mark.
    pub fn since(&self, mark: usize) -> &[Event] {
        &self.events[mark.min(self.events.len())..]
    }

    /// The presentation window at `frame`: the newest entries first, at most
    /// five, excluding anything older than 100 frames.
    pub fn recent(&self, frame: i64) -> Vec<&Event> {
        self.events
            .iter()
            .rev()
            .take(DISPLAY_LIMIT)
            .filter(|e| frame - e.frame <= DISPLAY_HORIZON)
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
