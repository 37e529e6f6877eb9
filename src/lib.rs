//! Zone-counting engine for per-frame tracker detections.
//!
//! Turns a noisy, id-churning stream of detections into a stable, monotonic
//! count of distinct physical objects crossing a counting zone, with
//! enter/leave events and deduplication guarantees. The detector/tracker,
//! video I/O, and serving layer are external collaborators: the engine
//! consumes frame dimensions plus per-frame detection lists and returns
//! occupancy, a cumulative total, and discrete events.
//!
//! # Example
//!
//! ```
//! use zonecount_rs::{CounterConfig, Detection, ZoneCounter};
//!
//! let mut counter = ZoneCounter::new(CounterConfig::default(), 1000.0, 800.0);
//! let detections = vec![Detection::new(500.0, 400.0, 60.0, 60.0, 0, 7)];
//! let result = counter.process_frame(&detections, 0);
//! assert_eq!(result.occupancy, 1);
//! ```

pub mod counter;
pub mod integration;

pub use counter::{
    AlertState, BBox, CounterConfig, Detection, Event, EventKind, FrameResult, GeometryFilter,
    Zone, ZoneCounter,
};
pub use integration::{
    CountingSession, DetectionBuilder, DetectionStream, SessionOutcome, SessionStatus, StreamError,
};
