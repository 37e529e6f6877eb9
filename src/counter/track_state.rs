//! Per-track hysteresis state.

use serde::Serialize;

/// Where a display identity (or its owning track) sits in the enter/leave cycle.
///
/// Alternates strictly `None/Left -> Entered -> Left -> Entered ...`; the
/// engine never emits two consecutive events of the same kind for one
/// display identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    /// No event signaled yet
    #[default]
    None,
    /// Confirmed inside the zone
    Entered,
    /// Departed after a confirmed entry
    Left,
}

/// Frame sentinel meaning "no event recorded yet, long ago".
const NO_EVENT_FRAME: i64 = -100;

/// Mutable per-track record, keyed by the tracker's volatile track id.
///
/// Created on first sighting (possibly inheriting progress from a nearby
/// unconfirmed state), mutated every frame the track is seen or absent, and
/// deleted once absence exceeds the exit threshold.
#[derive(Debug, Clone)]
pub struct TrackState {
    /// Consecutive frames observed inside the zone
    pub inside_frames: u32,
    /// Consecutive frames observed (or assumed) outside the zone
    pub outside_frames: u32,
    /// Whether this track currently backs an Entered display identity
    pub confirmed: bool,
    /// Last observed center
    pub last_center: (f32, f32),
    /// Center at first sighting, for the motion-floor displacement check
    pub start_center: (f32, f32),
    /// Frame index of the last enter/leave event attributed to this track
    pub last_event_frame: i64,
    /// Current alert phase
    pub alert: AlertState,
}

impl TrackState {
    /// Fresh state for a track with no nearby unconfirmed predecessor.
    pub fn fresh(center: (f32, f32)) -> Self {
        Self {
            inside_frames: 0,
            outside_frames: 0,
            confirmed: false,
            last_center: center,
            start_center: center,
            last_event_frame: NO_EVENT_FRAME,
            alert: AlertState::None,
        }
    }

    /// State for a new track id that continues a nearby unconfirmed track.
    ///
    /// Hysteresis progress, the original start point, and the alert phase
    /// carry over so a silent tracker id swap does not reset confirmation.
    pub fn inherited(center: (f32, f32), donor: &TrackState) -> Self {
        Self {
            inside_frames: donor.inside_frames,
            outside_frames: 0,
            confirmed: false,
            last_center: center,
            start_center: donor.start_center,
            last_event_frame: donor.last_event_frame,
            alert: donor.alert,
        }
    }
}

/// Insertion-ordered table of live track states.
///
/// Proximity searches (duplicate collapse, inheritance) tie-break on first
/// match, so iteration order must be deterministic; a Vec-backed table keeps
/// it at insertion order.
#[derive(Debug, Default)]
pub struct TrackTable {
    entries: Vec<(u64, TrackState)>,
}

impl TrackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, track_id: u64) -> bool {
        self.entries.iter().any(|(id, _)| *id == track_id)
    }

    pub fn get(&self, track_id: u64) -> Option<&TrackState> {
        self.entries
            .iter()
            .find(|(id, _)| *id == track_id)
            .map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, track_id: u64) -> Option<&mut TrackState> {
        self.entries
            .iter_mut()
            .find(|(id, _)| *id == track_id)
            .map(|(_, s)| s)
    }

    /// Insert a state for a new track id; replaces in place if it exists.
    pub fn insert(&mut self, track_id: u64, state: TrackState) {
        match self.get_mut(track_id) {
            Some(existing) => *existing = state,
            None => self.entries.push((track_id, state)),
        }
    }

    pub fn remove(&mut self, track_id: u64) {
        self.entries.retain(|(id, _)| *id != track_id);
    }

    /// Iterate `(track_id, state)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &TrackState)> {
        self.entries.iter().map(|(id, s)| (*id, s))
    }

    /// Track ids in insertion order.
    pub fn ids(&self) -> Vec<u64> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
