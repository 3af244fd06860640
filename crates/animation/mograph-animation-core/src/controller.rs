//! Animation controller: timeline duration, playhead, and the play/pause/seek
//! state machine driving the track registry.
//!
//! States: `Stopped -> Playing -> Paused -> Playing -> ...`; `reset` returns
//! to `Stopped` from anywhere, and playback reaching the end stops (no loop).
//!
//! The clock is explicit. The engine never reads wall-clock time: the UI
//! timer (or a test) passes the elapsed seconds to [`AnimationController::tick`].
//! Every operation is synchronous and runs to completion.
//!
//! # Single writer
//!
//! The controller and its registry are shared mutable state with exactly one
//! writer at a time. The live UI timer is that writer during playback. An
//! export job takes over by pausing playback and then issuing one `seek` per
//! output frame in strictly increasing time order (see
//! [`AnimationController::export_frames`]). The host application must lock
//! keyframe editing for the duration of an export; edits racing an in-flight
//! export are not detected here. Cancelling an export just stops seeking;
//! nothing needs to be released.

use std::collections::VecDeque;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::binding::{BoxedSink, ValueSink};
use crate::config::Config;
use crate::error::AnimationError;
use crate::outputs::{ApplyReport, ControllerEvent};
use crate::registry::TrackRegistry;
use crate::track::{AnyTrack, Track};
use crate::value::{Animatable, ValueKind};
use crate::Result;

/// Playback state of the controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Owns the timeline clock and, exclusively, the track registry.
#[derive(Debug)]
pub struct AnimationController {
    duration: f64,
    current_time: f64,
    state: PlaybackState,
    registry: TrackRegistry,
    cfg: Config,
    events: VecDeque<ControllerEvent>,
}

fn validate_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(AnimationError::InvalidDuration { duration })
    }
}

impl AnimationController {
    /// Controller with the default [`Config`]. `duration` is in seconds.
    pub fn new(duration: f64) -> Result<Self> {
        Self::with_config(duration, Config::default())
    }

    pub fn with_config(duration: f64, cfg: Config) -> Result<Self> {
        validate_duration(duration)?;
        Ok(Self {
            duration,
            current_time: 0.0,
            state: PlaybackState::Stopped,
            registry: TrackRegistry::with_epsilon(cfg.time_epsilon),
            cfg,
            events: VecDeque::new(),
        })
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Read-only view of the registry. Mutations go through the controller.
    #[inline]
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    #[inline]
    pub(crate) fn registry_mut(&mut self) -> &mut TrackRegistry {
        &mut self.registry
    }

    /// Change the timeline length. The playhead is re-clamped and re-applied.
    pub fn set_duration(&mut self, duration: f64) -> Result<ApplyReport> {
        validate_duration(duration)?;
        self.duration = duration;
        let t = self.clamp_time(self.current_time);
        self.set_time(t);
        Ok(self.registry.apply_all(t))
    }

    /// Start or resume playback. At the end of the timeline, restarts from 0.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        if self.current_time >= self.duration {
            self.set_time(0.0);
        }
        self.transition(PlaybackState::Playing);
        self.push_event(ControllerEvent::PlaybackStarted {
            time: self.current_time,
        });
    }

    /// Pause playback. No-op unless playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.transition(PlaybackState::Paused);
        self.push_event(ControllerEvent::PlaybackPaused {
            time: self.current_time,
        });
    }

    pub fn toggle_play_pause(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewind to 0, stop, and apply every track at 0.
    pub fn reset(&mut self) -> ApplyReport {
        self.set_time(0.0);
        if self.state != PlaybackState::Stopped {
            self.transition(PlaybackState::Stopped);
            self.push_event(ControllerEvent::PlaybackStopped { time: 0.0 });
        }
        self.registry.apply_all(0.0)
    }

    /// Move the playhead to `t` (clamped into `[0, duration]`) and apply
    /// every track synchronously, whatever the play state.
    pub fn seek(&mut self, t: f64) -> ApplyReport {
        let t = self.clamp_time(t);
        self.set_time(t);
        self.registry.apply_all(t)
    }

    /// Advance the clock by `dt` seconds while playing.
    ///
    /// Returns `None` (and does nothing) unless playing. Negative or
    /// non-finite `dt` counts as zero. Reaching the end stops playback.
    pub fn tick(&mut self, dt: f64) -> Option<ApplyReport> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let t = (self.current_time + dt).min(self.duration);
        self.set_time(t);
        let report = self.registry.apply_all(t);
        if self.current_time >= self.duration {
            self.transition(PlaybackState::Stopped);
            self.push_event(ControllerEvent::PlaybackEnded {
                time: self.current_time,
            });
        }
        Some(report)
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        self.events.drain(..).collect()
    }

    fn clamp_time(&self, t: f64) -> f64 {
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, self.duration)
        }
    }

    fn set_time(&mut self, t: f64) {
        let old_time = self.current_time;
        self.current_time = t;
        if old_time != t {
            self.push_event(ControllerEvent::TimeChanged {
                old_time,
                new_time: t,
            });
        }
    }

    fn transition(&mut self, next: PlaybackState) {
        debug!(
            "playback {:?} -> {:?} at t={}",
            self.state, next, self.current_time
        );
        self.state = next;
    }

    fn push_event(&mut self, event: ControllerEvent) {
        if self.cfg.max_events == 0 {
            return;
        }
        while self.events.len() >= self.cfg.max_events {
            if let Some(dropped) = self.events.pop_front() {
                trace!("event queue full; dropping {dropped:?}");
            }
        }
        self.events.push_back(event);
    }
}

/// Track management. The controller owns the registry, so editors and the
/// canvas register, edit and remove tracks through these.
impl AnimationController {
    pub fn register_track<V, S>(&mut self, id: impl Into<String>, sink: S) -> Result<()>
    where
        V: Animatable,
        S: ValueSink + Send + 'static,
    {
        self.registry.register_track::<V, S>(id, sink)
    }

    pub fn register_track_kind(
        &mut self,
        id: impl Into<String>,
        kind: ValueKind,
        sink: BoxedSink,
    ) -> Result<()> {
        self.registry.register_track_kind(id, kind, sink)
    }

    pub fn bind_sink(&mut self, id: &str, sink: BoxedSink) -> Result<()> {
        self.registry.bind_sink(id, sink)
    }

    pub fn remove_track(&mut self, id: &str) -> Option<AnyTrack> {
        self.registry.remove_track(id)
    }

    pub fn get_track(&self, id: &str) -> Option<&AnyTrack> {
        self.registry.get_track(id)
    }

    pub fn track<V: Animatable>(&self, id: &str) -> Result<&Track<V>> {
        self.registry.track::<V>(id)
    }

    pub fn track_mut<V: Animatable>(&mut self, id: &str) -> Result<&mut Track<V>> {
        self.registry.track_mut::<V>(id)
    }

    /// Apply every track at the current playhead (e.g. after a keyframe edit).
    pub fn refresh(&mut self) -> ApplyReport {
        self.registry.apply_all(self.current_time)
    }
}
