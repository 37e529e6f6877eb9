//! Identity reconciliation: maps volatile track ids onto stable display
//! identities across tracker id churn, and owns the monotonic total.

use std::collections::HashMap;

use tracing::debug;

use crate::counter::geometry::center_dist;
use crate::counter::track_state::AlertState;

/// Session-global state for one display identity. Never deleted during a
/// session, only reset between sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayState {
    pub alert: AlertState,
    pub confirmed: bool,
}

/// Append-only record of a confirmation location.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmedCentroid {
    pub cx: f32,
    pub cy: f32,
    pub frame: i64,
}

/// Sliding-window record used to map a fresh track id back to an existing
/// display identity.
#[derive(Debug, Clone, Copy)]
pub struct RecentConfirmation {
    pub cx: f32,
    pub cy: f32,
    pub frame: i64,
    pub display_id: u32,
}

/// Registry of display identities and confirmation history.
///
/// Display ids are minted in increasing order starting at 1; `total_count`
/// always equals the number of ids minted and never decreases.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    total_count: u32,
    track_to_display: HashMap<u64, u32>,
    display_states: HashMap<u32, DisplayState>,
    confirmed_centroids: Vec<ConfirmedCentroid>,
    recent_confirmations: Vec<RecentConfirmation>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn display_of(&self, track_id: u64) -> Option<u32> {
        self.track_to_display.get(&track_id).copied()
    }

    pub fn display_state(&self, display_id: u32) -> Option<DisplayState> {
        self.display_states.get(&display_id).copied()
    }

    /// Bind a track id to a display identity.
    pub fn bind(&mut self, track_id: u64, display_id: u32) {
        self.track_to_display.insert(track_id, display_id);
    }

    /// Whether this location was already confirmed recently, by any track id.
    ///
    /// A match suppresses the confirmation entirely: no new display identity,
    /// no event, no count change.
    pub fn is_reconfirmation(
        &self,
        center: (f32, f32),
        frame: i64,
        radius: f32,
        horizon: i64,
    ) -> bool {
        self.confirmed_centroids
            .iter()
            .any(|c| center_dist(center, (c.cx, c.cy)) < radius && frame - c.frame < horizon)
    }

    /// Prune the sliding window, then return the first recent confirmation
    /// within `radius` (an ID jump back onto an existing display identity).
    pub fn match_recent(
        &mut self,
        center: (f32, f32),
        frame: i64,
        radius: f32,
        horizon: i64,
    ) -> Option<u32> {
        self.recent_confirmations.retain(|c| frame - c.frame < horizon);
        self.recent_confirmations
            .iter()
            .find(|c| center_dist(center, (c.cx, c.cy)) < radius)
            .map(|c| c.display_id)
    }

    /// Mint a new display identity at `center` and record the confirmation in
    /// both histories. The only place `total_count` moves.
    pub fn mint(&mut self, center: (f32, f32), frame: i64) -> u32 {
        self.total_count += 1;
        let display_id = self.total_count;
        self.display_states.insert(display_id, DisplayState::default());
        self.recent_confirmations.push(RecentConfirmation {
            cx: center.0,
            cy: center.1,
            frame,
            display_id,
        });
        self.confirmed_centroids.push(ConfirmedCentroid {
            cx: center.0,
            cy: center.1,
            frame,
        });
        debug!(display_id, frame, "minted display identity");
        display_id
    }

    /// Flip a display identity to Entered.
    pub fn set_entered(&mut self, display_id: u32) {
        let state = self.display_states.entry(display_id).or_default();
        state.alert = AlertState::Entered;
        state.confirmed = true;
    }

    /// Flip a display identity to Left.
    pub fn set_left(&mut self, display_id: u32) {
        let state = self.display_states.entry(display_id).or_default();
        state.alert = AlertState::Left;
        state.confirmed = false;
    }

    pub fn clear(&mut self) {
        self.total_count = 0;
        self.track_to_display.clear();
        self.display_states.clear();
        self.confirmed_centroids.clear();
        self.recent_confirmations.clear();
    }
}
