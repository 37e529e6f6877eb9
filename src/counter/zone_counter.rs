//! Frame orchestrator: drives one engine step per frame and owns all
//! session state.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::counter::detection::Detection;
use crate::counter::events::{Event, EventLog};
use crate::counter::filters::GeometryFilter;
use crate::counter::geometry::{Zone, center_dist};
use crate::counter::identity::IdentityRegistry;
use crate::counter::track_state::{AlertState, TrackState, TrackTable};

/// Configuration for the zone counter.
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// Only detections of this class are counted; `None` accepts every class
    pub target_class: Option<u32>,
    /// Consecutive inside frames required before a confirmation attempt.
    /// Fires at 2 by default; raise for stricter entry hysteresis.
    pub entry_confirm_frames: u32,
    /// Consecutive outside/absent frames before an exit fires (~2 s at 25 fps)
    pub exit_threshold_frames: u32,
    /// Fractional frame inset that defines the counting zone
    pub zone_margin: f32,
    /// Overlap ratio above which a box counts as inside the zone
    pub zone_overlap_thresh: f32,
    /// Fixed radius for in-frame duplicate collapse (deliberately not
    /// scale-adjusted, unlike the reconfirmation radius)
    pub dedup_radius: f32,
    /// Radius for inheriting progress from a nearby unconfirmed state
    pub inherit_radius: f32,
    /// Minimum displacement from the start center before a confirmation is
    /// treated as a moving object rather than static clutter
    pub motion_floor: f32,
    /// Lookback window (frames) for reconfirmation and ID-jump matching
    pub history_frames: i64,
    /// Boxes wider than this fraction of the frame use the large match radius
    pub large_box_frac: f32,
    /// Match radius for large boxes, as a fraction of frame width
    pub large_radius_frac: f32,
    /// Match radius for small boxes, as a fraction of frame width
    pub small_radius_frac: f32,
    /// Physical-plausibility pre-filter
    pub filter: GeometryFilter,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            target_class: None,
            entry_confirm_frames: 2,
            exit_threshold_frames: 50,
            zone_margin: 0.12,
            zone_overlap_thresh: 0.15,
            dedup_radius: 60.0,
            inherit_radius: 60.0,
            motion_floor: 5.0,
            history_frames: 100,
            large_box_frac: 0.20,
            large_radius_frac: 0.15,
            small_radius_frac: 0.06,
            filter: GeometryFilter::default(),
        }
    }
}

/// Per-frame output of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameResult {
    /// Objects inside the zone this frame
    pub occupancy: u32,
    /// Monotonic session total of distinct objects counted
    pub total_count: u32,
    /// Events emitted while processing this frame
    pub new_events: Vec<Event>,
}

/// Stateful zone-counting engine.
///
/// One instance per session; single-threaded and synchronous. The host owns
/// the instance and must serialize access, as the engine holds no locks. Each
/// frame is fully processed (filter, dedup, membership, state update,
/// reconciliation, sweep) before the next is admitted.
pub struct ZoneCounter {
    config: CounterConfig,
    frame_w: f32,
    frame_h: f32,
    zone: Zone,
    tracks: TrackTable,
    identity: IdentityRegistry,
    events: EventLog,
}

impl ZoneCounter {
    /// Build an engine for a session with the given frame dimensions. The
    /// counting zone is derived once, as an inset of the frame.
    pub fn new(config: CounterConfig, frame_w: f32, frame_h: f32) -> Self {
        let zone = Zone::inset(frame_w, frame_h, config.zone_margin);
        Self {
            config,
            frame_w,
            frame_h,
            zone,
            tracks: TrackTable::new(),
            identity: IdentityRegistry::new(),
            events: EventLog::new(),
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Monotonic session total.
    pub fn total_count(&self) -> u32 {
        self.identity.total_count()
    }

    /// Number of live track states.
    pub fn live_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Full audit log of enter/leave events.
    pub fn events(&self) -> &[Event] {
        self.events.all()
    }

    /// Presentation window of events as of `frame` (newest first, at most 5,
    /// expired entries excluded).
    pub fn recent_events(&self, frame: i64) -> Vec<&Event> {
        self.events.recent(frame)
    }

    /// Clear every map, history, and counter. Idempotent; nothing of the
    /// previous session remains observable afterwards.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.identity.clear();
        self.events.clear();
        info!("zone counter state reset");
    }

    /// Process one frame of detections.
    ///
    /// Strict order: geometry filtering, in-frame duplicate collapse, zone
    /// membership (occupancy), per-track state update with confirmation /
    /// exit attempts, then the disappearance sweep for unseen track ids.
    pub fn process_frame(&mut self, detections: &[Detection], frame: i64) -> FrameResult {
        let log_mark = self.events.len();
        let mut occupancy = 0u32;
        let mut seen: HashSet<u64> = HashSet::new();
        let mut accepted: Vec<(u64, (f32, f32))> = Vec::new();

        for det in detections {
            if let Some(target) = self.config.target_class {
                if det.class_id != target {
                    continue;
                }
            }
            if !self.config.filter.accepts(&det.bbox, self.frame_w, self.frame_h) {
                continue;
            }

            let center = det.bbox.center();

            // Collapse split detections of the same physical object: a center
            // within the dedup radius of a distinct track id already accepted
            // this frame is dropped. First accepted wins.
            let duplicate = accepted
                .iter()
                .any(|(tid, c)| *tid != det.track_id && center_dist(center, *c) < self.config.dedup_radius);
            if duplicate {
                debug!(track_id = det.track_id, "dropped in-frame duplicate detection");
                continue;
            }

            seen.insert(det.track_id);
            accepted.push((det.track_id, center));

            let inside = self.zone.overlap_ratio(&det.bbox) > self.config.zone_overlap_thresh;
            if inside {
                occupancy += 1;
            }

            self.observe(det, inside, frame);
        }

        self.sweep_missing(&seen, frame);

        FrameResult {
            occupancy,
            total_count: self.identity.total_count(),
            new_events: self.events.since(log_mark).to_vec(),
        }
    }

    /// Update (or create) the state for one accepted detection.
    fn observe(&mut self, det: &Detection, inside: bool, frame: i64) {
        let center = det.bbox.center();

        if !self.tracks.contains(det.track_id) {
            let state = match self.find_donor(center) {
                Some(donor) => {
                    debug!(
                        track_id = det.track_id,
                        inside_frames = donor.inside_frames,
                        "new track id inherits nearby unconfirmed progress"
                    );
                    TrackState::inherited(center, &donor)
                }
                None => TrackState::fresh(center),
            };
            self.tracks.insert(det.track_id, state);
        }

        let mut attempt_confirm = false;
        let mut attempt_exit = false;
        if let Some(state) = self.tracks.get_mut(det.track_id) {
            state.last_center = center;
            if inside {
                state.inside_frames += 1;
                state.outside_frames = 0;
                attempt_confirm =
                    state.inside_frames >= self.config.entry_confirm_frames && !state.confirmed;
            } else {
                state.outside_frames += 1;
                state.inside_frames = 0;
                attempt_exit =
                    state.outside_frames >= self.config.exit_threshold_frames && state.confirmed;
            }
        }

        if attempt_confirm {
            self.try_confirm(det, center, frame);
        }
        if attempt_exit {
            self.mark_left(det.track_id, frame, true);
        }
    }

    /// Closest unconfirmed state within the inheritance radius, ties broken
    /// by insertion order.
    fn find_donor(&self, center: (f32, f32)) -> Option<TrackState> {
        let mut best: Option<&TrackState> = None;
        let mut min_dist = self.config.inherit_radius;
        for (_, state) in self.tracks.iter() {
            if state.confirmed {
                continue;
            }
            let d = center_dist(center, state.last_center);
            if d < min_dist {
                min_dist = d;
                best = Some(state);
            }
        }
        best.cloned()
    }

    /// Dynamic match radius: wider for large boxes, narrower for small ones.
    fn match_radius(&self, box_width: f32) -> f32 {
        if box_width > self.frame_w * self.config.large_box_frac {
            self.frame_w * self.config.large_radius_frac
        } else {
            self.frame_w * self.config.small_radius_frac
        }
    }

    /// Attempt to confirm a track that has satisfied the entry hysteresis.
    ///
    /// Resolution order: motion floor, global reconfirmation suppression,
    /// ID-jump mapping, then minting a new display identity.
    fn try_confirm(&mut self, det: &Detection, center: (f32, f32), frame: i64) {
        let start = match self.tracks.get(det.track_id) {
            Some(state) => state.start_center,
            None => return,
        };
        if center_dist(center, start) <= self.config.motion_floor {
            // Static detection, likely environmental clutter
            return;
        }

        let radius = self.match_radius(det.bbox.width);

        if self
            .identity
            .is_reconfirmation(center, frame, radius, self.config.history_frames)
        {
            debug!(
                track_id = det.track_id,
                "confirmation suppressed: location already counted recently"
            );
            return;
        }

        let display_id = match self
            .identity
            .match_recent(center, frame, radius, self.config.history_frames)
        {
            Some(existing) => {
                // ID jump: the tracker handed this object a fresh id after
                // confirmation. Re-attach, no new count.
                self.identity.bind(det.track_id, existing);
                let display = self.identity.display_state(existing).unwrap_or_default();
                if let Some(state) = self.tracks.get_mut(det.track_id) {
                    state.alert = display.alert;
                    state.confirmed = display.confirmed;
                }
                debug!(track_id = det.track_id, display_id = existing, "id jump reattached");
                existing
            }
            None => {
                let minted = self.identity.mint(center, frame);
                self.identity.bind(det.track_id, minted);
                info!(track_id = det.track_id, display_id = minted, frame, "new object counted");
                minted
            }
        };

        let already_entered = self
            .identity
            .display_state(display_id)
            .map(|s| s.alert == AlertState::Entered)
            .unwrap_or(false);
        if !already_entered {
            self.identity.set_entered(display_id);
            if let Some(state) = self.tracks.get_mut(det.track_id) {
                state.alert = AlertState::Entered;
                state.confirmed = true;
                state.last_event_frame = frame;
            }
            self.events.push(Event::entered(display_id, frame));
            info!(display_id, frame, "entered");
        }
    }

    /// Exit transition for a track, guarded at the display level: fires only
    /// when the owning display identity is currently Entered. `visible` marks
    /// an exit observed outside the zone rather than inferred from absence.
    fn mark_left(&mut self, track_id: u64, frame: i64, visible: bool) {
        let Some(display_id) = self.identity.display_of(track_id) else {
            // Never confirmed; nothing to signal
            return;
        };
        let entered = self
            .identity
            .display_state(display_id)
            .map(|s| s.alert == AlertState::Entered)
            .unwrap_or(false);
        if !entered {
            return;
        }

        self.identity.set_left(display_id);
        if visible {
            if let Some(state) = self.tracks.get_mut(track_id) {
                state.confirmed = false;
                state.alert = AlertState::Left;
                state.last_event_frame = frame;
            }
        }
        self.events.push(Event::left(display_id, frame));
        info!(display_id, frame, "left");
    }

    /// Age every track id absent from this frame; past the exit threshold the
    /// exit transition is attempted and the state deleted. Handles tracks the
    /// detector drops entirely, not just ones that leave the zone.
    fn sweep_missing(&mut self, seen: &HashSet<u64>, frame: i64) {
        for track_id in self.tracks.ids() {
            if seen.contains(&track_id) {
                continue;
            }
            let expired = match self.tracks.get_mut(track_id) {
                Some(state) => {
                    state.outside_frames += 1;
                    state.outside_frames >= self.config.exit_threshold_frames
                }
                None => false,
            };
            if expired {
                self.mark_left(track_id, frame, false);
                self.tracks.remove(track_id);
                debug!(track_id, frame, "vanished track removed");
            }
        }
    }
}
