//! Session runner: drives the counting engine over a detection feed.

use serde::Serialize;
use tracing::{info, warn};

use crate::counter::{CounterConfig, FrameResult, ZoneCounter};
use crate::integration::stream::{DetectionStream, StreamError};

/// Terminal status of a counting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Completed,
    ModelNotLoaded,
    FailedToOpenSource,
}

/// Result of one counting session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    /// Occupancy of the last processed frame
    pub final_occupancy: u32,
    /// Monotonic session total of distinct objects counted
    pub total_count: u32,
    pub status: SessionStatus,
}

impl SessionOutcome {
    fn terminal(status: SessionStatus) -> Self {
        Self {
            final_occupancy: 0,
            total_count: 0,
            status,
        }
    }
}

/// One counting pass over one detection feed.
///
/// Owns the feed and builds a fresh engine per run, so every run starts from
/// zero state. Single-threaded: the host must not share a session across
/// threads, and there is no cancellation primitive: a session ends when the
/// feed is exhausted or the host stops feeding it.
pub struct CountingSession<S: DetectionStream> {
    stream: S,
    config: CounterConfig,
    progress_every: i64,
}

impl<S: DetectionStream> CountingSession<S> {
    /// Create a session over `stream` with the given engine configuration.
    pub fn new(stream: S, config: CounterConfig) -> Self {
        Self {
            stream,
            config,
            progress_every: 2,
        }
    }

    /// Change how often the progress callback fires (every Nth frame).
    pub fn progress_every(mut self, frames: i64) -> Self {
        self.progress_every = frames.max(1);
        self
    }

    /// Get a reference to the underlying detection stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Get a mutable reference to the underlying detection stream.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Run the session to exhaustion with no progress reporting.
    pub fn run(&mut self) -> SessionOutcome {
        self.run_with_progress(|_| {})
    }

    /// Run the session to exhaustion, invoking `on_update` with the frame
    /// result every Nth frame.
    ///
    /// The callback is fire-and-forget side output: the engine never blocks
    /// on it and its return is ignored. Source failures surface once as a
    /// terminal status; a frame that fails to decode simply contributes no
    /// detections (its tracks recover through the disappearance path).
    pub fn run_with_progress<F>(&mut self, mut on_update: F) -> SessionOutcome
    where
        F: FnMut(&FrameResult),
    {
        let (frame_w, frame_h) = match self.stream.open() {
            Ok(dims) => dims,
            Err(StreamError::ModelNotLoaded) => {
                warn!("session aborted: detection model not loaded");
                return SessionOutcome::terminal(SessionStatus::ModelNotLoaded);
            }
            Err(err) => {
                warn!("session aborted: {err}");
                return SessionOutcome::terminal(SessionStatus::FailedToOpenSource);
            }
        };

        let mut counter = ZoneCounter::new(self.config.clone(), frame_w, frame_h);
        let mut frame: i64 = 0;
        let mut final_occupancy = 0u32;

        loop {
            let detections = match self.stream.next_frame() {
                Ok(Some(detections)) => detections,
                Ok(None) => break,
                Err(err) => {
                    warn!(frame, "frame dropped: {err}");
                    Vec::new()
                }
            };

            let result = counter.process_frame(&detections, frame);
            final_occupancy = result.occupancy;
            if frame % self.progress_every == 0 {
                on_update(&result);
            }
            frame += 1;
        }

        info!(
            frames = frame,
            total_count = counter.total_count(),
            "session completed"
        );
        SessionOutcome {
            final_occupancy,
            total_count: counter.total_count(),
            status: SessionStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Detection;

    /// Feed that replays a scripted list of frames, with optional decode
    /// failures at chosen frame indices.
    struct ScriptedStream {
        frames: Vec<Vec<Detection>>,
        decode_failures: Vec<usize>,
        cursor: usize,
        open_error: Option<StreamError>,
    }

    impl ScriptedStream {
        fn new(frames: Vec<Vec<Detection>>) -> Self {
            Self {
                frames,
                decode_failures: Vec::new(),
                cursor: 0,
                open_error: None,
            }
        }

        fn failing(error: StreamError) -> Self {
            Self {
                frames: Vec::new(),
                decode_failures: Vec::new(),
                cursor: 0,
                open_error: Some(error),
            }
        }

        fn with_decode_failures(mut self, indices: Vec<usize>) -> Self {
            self.decode_failures = indices;
            self
        }
    }

    impl DetectionStream for ScriptedStream {
        fn open(&mut self) -> Result<(f32, f32), StreamError> {
            match self.open_error.take() {
                Some(err) => Err(err),
                None => Ok((1000.0, 800.0)),
            }
        }

        fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, StreamError> {
            if self.cursor >= self.frames.len() {
                return Ok(None);
            }
            let index = self.cursor;
            self.cursor += 1;
            if self.decode_failures.contains(&index) {
                return Err(StreamError::Decode(format!("frame {index}")));
            }
            Ok(Some(self.frames[index].clone()))
        }
    }

    #[test]
    fn test_model_not_loaded_status() {
        let mut session = CountingSession::new(
            ScriptedStream::failing(StreamError::ModelNotLoaded),
            CounterConfig::default(),
        );
        let outcome = session.run();
        assert_eq!(outcome.status, SessionStatus::ModelNotLoaded);
        assert_eq!(outcome.total_count, 0);
    }

    #[test]
    fn test_unreadable_source_status() {
        let mut session = CountingSession::new(
            ScriptedStream::failing(StreamError::SourceUnavailable("gone.mp4".into())),
            CounterConfig::default(),
        );
        let outcome = session.run();
        assert_eq!(outcome.status, SessionStatus::FailedToOpenSource);
    }

    #[test]
    fn test_empty_stream_completes() {
        let mut session =
            CountingSession::new(ScriptedStream::new(Vec::new()), CounterConfig::default());
        let outcome = session.run();
        assert_eq!(outcome.status, SessionStatus::Completed);
        assert_eq!(outcome.final_occupancy, 0);
        assert_eq!(outcome.total_count, 0);
    }

    #[test]
    fn test_progress_cadence() {
        // 11 empty frames, callback every 2nd frame: frames 0,2,4,6,8,10
        let frames = vec![Vec::new(); 11];
        let mut session = CountingSession::new(ScriptedStream::new(frames), CounterConfig::default());
        let mut calls = 0;
        session.run_with_progress(|_| calls += 1);
        assert_eq!(calls, 6);
    }

    #[test]
    fn test_counts_scripted_object() {
        // One object drifting through the zone: confirmed once displacement
        // clears the motion floor.
        let frames = vec![
            vec![Detection::new(500.0, 400.0, 60.0, 60.0, 0, 7)],
            vec![Detection::new(503.0, 400.0, 60.0, 60.0, 0, 7)],
            vec![Detection::new(508.0, 400.0, 60.0, 60.0, 0, 7)],
        ];
        let mut session = CountingSession::new(ScriptedStream::new(frames), CounterConfig::default());
        let outcome = session.run();
        assert_eq!(outcome.status, SessionStatus::Completed);
        assert_eq!(outcome.total_count, 1);
        assert_eq!(outcome.final_occupancy, 1);
        assert_eq!(session.stream().cursor, 3);

        // Rewinding the feed and running again starts from a fresh engine
        session.stream_mut().cursor = 0;
        let rerun = session.run();
        assert_eq!(rerun.total_count, 1);
        assert_eq!(rerun.final_occupancy, 1);
    }

    #[test]
    fn test_decode_error_drops_frame_and_session_recovers() {
        // Object confirms over frames 0..=2, then every following frame fails
        // to decode. Each failed frame contributes no detections, so the
        // track ages out through the disappearance path and the session
        // still completes.
        let mut frames = vec![
            vec![Detection::new(500.0, 400.0, 60.0, 60.0, 0, 7)],
            vec![Detection::new(503.0, 400.0, 60.0, 60.0, 0, 7)],
            vec![Detection::new(508.0, 400.0, 60.0, 60.0, 0, 7)],
        ];
        frames.extend(vec![Vec::new(); 50]);
        let stream = ScriptedStream::new(frames).with_decode_failures((3..=52).collect());

        let mut session =
            CountingSession::new(stream, CounterConfig::default()).progress_every(1);
        let mut results = Vec::new();
        let outcome = session.run_with_progress(|r| results.push(r.clone()));

        assert_eq!(outcome.status, SessionStatus::Completed);
        assert_eq!(outcome.total_count, 1);
        assert_eq!(outcome.final_occupancy, 0);

        // The dropped frames processed as empty, not as aborts
        assert_eq!(results.len(), 53);
        assert_eq!(results[3].occupancy, 0);
        assert_eq!(results[2].new_events.len(), 1);
        // Absence across the dropped frames still triggers the exit
        assert_eq!(results[52].new_events.len(), 1);
        assert_eq!(results[52].new_events[0].frame, 52);
    }
}
