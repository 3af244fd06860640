//! Output contracts from the engine.
//!
//! `ApplyReport` summarizes one `apply_all` pass, with per-track failures kept
//! separate so one malformed property never hides the others. `ControllerEvent`
//! carries discrete playback signals for the host UI.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// One track that could not be applied during a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackFailure {
    pub track_id: String,
    pub error: AnimationError,
}

/// Result of applying every registered track at one time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyReport {
    /// Time the tracks were sampled at (seconds).
    pub time: f64,
    /// Number of sinks that accepted a value.
    pub applied: usize,
    pub failures: Vec<TrackFailure>,
}

impl ApplyReport {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, track_id: &str) -> Option<&AnimationError> {
        self.failures
            .iter()
            .find(|f| f.track_id == track_id)
            .map(|f| &f.error)
    }
}

/// Discrete signals emitted by the controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ControllerEvent {
    PlaybackStarted { time: f64 },
    PlaybackPaused { time: f64 },
    /// Reset, or any explicit transition to `Stopped`.
    PlaybackStopped { time: f64 },
    /// Playback reached the end of the timeline.
    PlaybackEnded { time: f64 },
    TimeChanged { old_time: f64, new_time: f64 },
}
