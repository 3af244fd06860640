//! Frame export: drive the controller one seek per output frame, or bake
//! every track into per-frame samples without touching sinks.

use std::ops::ControlFlow;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::controller::AnimationController;
use crate::error::AnimationError;
use crate::value::{AnimatableValue, ValueKind};
use crate::Result;

/// Absorbs float error in `duration * frame_rate` (e.g. 0.29 * 100).
const FRAME_COUNT_GUARD: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output frames per second.
    pub frame_rate: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::default_for(&Config::default())
    }
}

impl ExportConfig {
    pub fn new(frame_rate: f64) -> Self {
        Self { frame_rate }
    }

    pub fn default_for(cfg: &Config) -> Self {
        Self::new(cfg.export_frame_rate)
    }

    fn validated_rate(&self) -> Result<f64> {
        let frame_rate = self.frame_rate;
        if frame_rate.is_finite() && frame_rate > 0.0 {
            Ok(frame_rate)
        } else {
            Err(AnimationError::InvalidFrameRate { frame_rate })
        }
    }
}

/// Number of frames in `[0, duration)` at `frame_rate`: `floor(duration * frame_rate)`.
pub fn frame_count(duration: f64, frame_rate: f64) -> usize {
    let frames = duration * frame_rate;
    if !frames.is_finite() || frames <= 0.0 {
        return 0;
    }
    (frames + FRAME_COUNT_GUARD).floor() as usize
}

/// Frame times `index / frame_rate`, strictly increasing.
pub fn frame_times(duration: f64, frame_rate: f64) -> impl Iterator<Item = f64> {
    (0..frame_count(duration, frame_rate)).map(move |i| i as f64 / frame_rate)
}

/// The frame an export callback is asked to produce.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExportFrame {
    pub index: usize,
    pub time: f64,
    /// Total frames in this export.
    pub total: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Frames handed to the callback.
    pub frames: usize,
    pub cancelled: bool,
    /// Track failures summed over every frame's `apply_all`.
    pub failed_applies: usize,
}

/// Every track sampled at every frame time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedTrack {
    pub id: String,
    pub kind: ValueKind,
    /// One entry per frame; `None` where the track has no keyframes.
    pub values: Vec<Option<AnimatableValue>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedAnimation {
    pub frame_rate: f64,
    pub frame_times: Vec<f64>,
    /// Sorted by track id.
    pub tracks: Vec<BakedTrack>,
}

impl BakedAnimation {
    pub fn track(&self, id: &str) -> Option<&BakedTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl AnimationController {
    /// Export driver.
    ///
    /// Pauses live playback, then for each frame seeks to `index / frame_rate`
    /// and hands the frame to `on_frame` while the applied values are current.
    /// `on_frame` returning `ControlFlow::Break` cancels the export. The
    /// controller is left paused at the last exported frame.
    pub fn export_frames<F>(&mut self, cfg: &ExportConfig, mut on_frame: F) -> Result<ExportSummary>
    where
        F: FnMut(ExportFrame, &AnimationController) -> ControlFlow<()>,
    {
        let frame_rate = cfg.validated_rate()?;
        self.pause();
        let total = frame_count(self.duration(), frame_rate);
        info!("export: {total} frames at {frame_rate} fps");

        let mut summary = ExportSummary::default();
        for (index, time) in frame_times(self.duration(), frame_rate).enumerate() {
            let report = self.seek(time);
            summary.failed_applies += report.failures.len();
            summary.frames += 1;
            let frame = ExportFrame { index, time, total };
            if on_frame(frame, self).is_break() {
                debug!("export: cancelled after frame {index}");
                summary.cancelled = true;
                break;
            }
        }
        Ok(summary)
    }

    /// Sample every track at every frame time. Sinks and the playhead are untouched.
    pub fn bake(&self, cfg: &ExportConfig) -> Result<BakedAnimation> {
        let frame_rate = cfg.validated_rate()?;
        let frame_times: Vec<f64> = frame_times(self.duration(), frame_rate).collect();
        let mut tracks: Vec<BakedTrack> = self
            .registry()
            .tracks()
            .map(|track| BakedTrack {
                id: track.id().to_string(),
                kind: track.kind(),
                values: frame_times.iter().map(|&t| track.value_at(t).ok()).collect(),
            })
            .collect();
        tracks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(BakedAnimation {
            frame_rate,
            frame_times,
            tracks,
        })
    }
}
