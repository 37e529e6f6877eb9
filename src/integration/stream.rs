//! Trait for per-frame detection feeds.

use thiserror::Error;

use crate::counter::Detection;

/// Failures a detection feed can report.
///
/// `ModelNotLoaded` and `SourceUnavailable` are terminal: they surface as a
/// session status, not as mid-stream errors. `Decode` is per-frame: the
/// session drops that frame's detections and continues.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("detection model is not loaded")]
    ModelNotLoaded,
    #[error("failed to open source: {0}")]
    SourceUnavailable(String),
    #[error("frame decode failed: {0}")]
    Decode(String),
}

/// A per-frame detection feed for one counting session.
///
/// Implement this to connect any detector/tracker pairing to the engine.
///
/// # Example
///
/// ```ignore
/// use zonecount_rs::{Detection, DetectionStream, StreamError};
///
/// struct MyFeed { /* decoder + model */ }
///
/// impl DetectionStream for MyFeed {
///     fn open(&mut self) -> Result<(f32, f32), StreamError> {
///         Ok((1920.0, 1080.0))
///     }
///
///     fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, StreamError> {
///         // Decode a frame, run the tracker, convert its output
///         Ok(None)
///     }
/// }
/// ```
pub trait DetectionStream {
    /// Open the feed and return the frame dimensions `(width, height)`.
    fn open(&mut self) -> Result<(f32, f32), StreamError>;

    /// Detections for the next frame, or `None` once the feed is exhausted.
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, StreamError>;
}
