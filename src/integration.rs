//! Integration module for connecting detection feeds with the zone counter.
//!
//! This module provides the trait a host implements to feed per-frame
//! detections into the engine, plus a session runner that drives one
//! counting pass per video.

mod builder;
mod session;
mod stream;

pub use builder::DetectionBuilder;
pub use session::{CountingSession, SessionOutcome, SessionStatus};
pub use stream::{DetectionStream, StreamError};
