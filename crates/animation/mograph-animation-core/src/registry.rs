//! Track registry: heterogeneous tracks keyed by id, each paired with the
//! sink its owner supplied.
//!
//! Tracks are independent of each other, so `apply_all` visits them in no
//! particular order. A failure on one track is reported and the pass moves on.

use std::fmt;

use hashbrown::HashMap;
use log::{debug, warn};

use crate::binding::{BoxedSink, ValueSink};
use crate::error::AnimationError;
use crate::outputs::{ApplyReport, TrackFailure};
use crate::track::{AnyTrack, Track, DEFAULT_TIME_EPSILON};
use crate::value::{Animatable, AnimatableValue, ValueKind};
use crate::Result;

struct TrackEntry {
    track: AnyTrack,
    sink: BoxedSink,
}

impl fmt::Debug for TrackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackEntry")
            .field("track", &self.track)
            .finish_non_exhaustive()
    }
}

/// Named collection of tracks of any value kind.
#[derive(Debug)]
pub struct TrackRegistry {
    entries: HashMap<String, TrackEntry>,
    epsilon: f64,
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &str) -> AnimationError {
    AnimationError::TrackNotFound {
        track_id: id.to_string(),
    }
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_TIME_EPSILON)
    }

    /// Registry whose new tracks use `epsilon` for keyframe-time equality.
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            entries: HashMap::new(),
            epsilon: epsilon.abs(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &AnyTrack> {
        self.entries.values().map(|e| &e.track)
    }

    pub fn kind_of(&self, id: &str) -> Option<ValueKind> {
        self.entries.get(id).map(|e| e.track.kind())
    }

    /// Register a typed track under `id`.
    pub fn register_track<V, S>(&mut self, id: impl Into<String>, sink: S) -> Result<()>
    where
        V: Animatable,
        S: ValueSink + Send + 'static,
    {
        self.register_track_kind(id, V::KIND, Box::new(sink))
    }

    /// Register a track of `kind` under `id`.
    ///
    /// An unseen id gets an empty track. A known id of the same kind keeps
    /// its keyframes and takes the new sink. A known id of another kind is
    /// rejected with `TypeMismatch` and left untouched.
    pub fn register_track_kind(
        &mut self,
        id: impl Into<String>,
        kind: ValueKind,
        sink: BoxedSink,
    ) -> Result<()> {
        let id = id.into();
        if let Some(entry) = self.entries.get_mut(&id) {
            let existing = entry.track.kind();
            if existing != kind {
                return Err(AnimationError::TypeMismatch {
                    track_id: id,
                    expected: existing,
                    actual: kind,
                });
            }
            debug!("register_track: rebinding sink for '{id}' ({kind})");
            entry.sink = sink;
            return Ok(());
        }
        debug!("register_track: new {kind} track '{id}'");
        let track = AnyTrack::empty(id.clone(), kind, self.epsilon);
        self.entries.insert(id, TrackEntry { track, sink });
        Ok(())
    }

    /// Insert a fully built track (e.g. restored from a snapshot).
    ///
    /// Replaces an existing track of the same kind; another kind is rejected.
    pub fn insert_track(&mut self, track: AnyTrack, sink: BoxedSink) -> Result<()> {
        let id = track.id().to_string();
        if let Some(existing) = self.kind_of(&id) {
            if existing != track.kind() {
                return Err(AnimationError::TypeMismatch {
                    track_id: id,
                    expected: existing,
                    actual: track.kind(),
                });
            }
        }
        self.entries.insert(id, TrackEntry { track, sink });
        Ok(())
    }

    /// Swap the sink of an existing track.
    pub fn bind_sink(&mut self, id: &str, sink: BoxedSink) -> Result<()> {
        let entry = self.entries.get_mut(id).ok_or_else(|| not_found(id))?;
        entry.sink = sink;
        Ok(())
    }

    pub fn get_track(&self, id: &str) -> Option<&AnyTrack> {
        self.entries.get(id).map(|e| &e.track)
    }

    pub fn get_track_mut(&mut self, id: &str) -> Option<&mut AnyTrack> {
        self.entries.get_mut(id).map(|e| &mut e.track)
    }

    /// Typed view of a track; fails loudly on a missing id or wrong type.
    pub fn track<V: Animatable>(&self, id: &str) -> Result<&Track<V>> {
        let track = self.get_track(id).ok_or_else(|| not_found(id))?;
        let kind = track.kind();
        track
            .downcast_ref::<V>()
            .ok_or_else(|| AnimationError::TypeMismatch {
                track_id: id.to_string(),
                expected: kind,
                actual: V::KIND,
            })
    }

    pub fn track_mut<V: Animatable>(&mut self, id: &str) -> Result<&mut Track<V>> {
        let track = self.get_track_mut(id).ok_or_else(|| not_found(id))?;
        let kind = track.kind();
        track
            .downcast_mut::<V>()
            .ok_or_else(|| AnimationError::TypeMismatch {
                track_id: id.to_string(),
                expected: kind,
                actual: V::KIND,
            })
    }

    /// Delete a track and its sink (e.g. the element was deleted).
    pub fn remove_track(&mut self, id: &str) -> Option<AnyTrack> {
        self.entries.remove(id).map(|e| e.track)
    }

    /// Interpolated value of one track, without delivering it.
    pub fn sample(&self, id: &str, t: f64) -> Result<AnimatableValue> {
        self.get_track(id).ok_or_else(|| not_found(id))?.value_at(t)
    }

    /// Sorted union of keyframe times over all tracks, merged within epsilon.
    pub fn all_keyframe_times(&self) -> Vec<f64> {
        let mut times: Vec<f64> = self
            .entries
            .values()
            .flat_map(|e| e.track.all_keyframe_times())
            .collect();
        times.sort_by(f64::total_cmp);
        let eps = self.epsilon;
        times.dedup_by(|later, earlier| (*later - *earlier).abs() <= eps);
        times
    }

    /// Sample every track at `t` and deliver the value to its sink.
    pub fn apply_all(&mut self, t: f64) -> ApplyReport {
        let mut report = ApplyReport::new(t);
        for (id, entry) in self.entries.iter_mut() {
            let result = entry
                .track
                .value_at(t)
                .and_then(|value| entry.sink.deliver(id, value));
            match result {
                Ok(()) => report.applied += 1,
                Err(error) => {
                    match &error {
                        AnimationError::EmptyTrack { .. } => {
                            debug!("apply_all: skipping empty track '{id}'")
                        }
                        _ => warn!("apply_all: track '{id}' failed at t={t}: {error}"),
                    }
                    report.failures.push(TrackFailure {
                        track_id: id.clone(),
                        error,
                    });
                }
            }
        }
        report.failures.sort_by(|a, b| a.track_id.cmp(&b.track_id));
        report
    }
}
