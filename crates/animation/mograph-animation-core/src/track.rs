//! Tracks: ordered keyframes for one animatable property.
//!
//! `Track<V>` is the typed form used by editors that know the property type.
//! `AnyTrack` is the closed, type-erased form stored in the registry.

use crate::easing::Easing;
use crate::error::AnimationError;
use crate::keyframe::Keyframe;
use crate::sampling::sample_keyframes;
use crate::value::{Animatable, AnimatableValue, Path, Point2, Rgba, ValueKind};
use crate::Result;

/// Two keyframe times closer than this are the same time.
pub const DEFAULT_TIME_EPSILON: f64 = 1e-6;

/// Keyframes for one property, strictly increasing by time.
#[derive(Clone, Debug, PartialEq)]
pub struct Track<V> {
    id: String,
    keyframes: Vec<Keyframe<V>>,
    epsilon: f64,
}

impl<V: Animatable> Track<V> {
    /// Empty track using [`DEFAULT_TIME_EPSILON`].
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_epsilon(id, DEFAULT_TIME_EPSILON)
    }

    /// Empty track with a custom time-equality epsilon.
    pub fn with_epsilon(id: impl Into<String>, epsilon: f64) -> Self {
        Self {
            id: id.into(),
            keyframes: Vec::new(),
            epsilon: epsilon.abs(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        V::KIND
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.keyframes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// `Ok(i)` if keyframe `i` sits at `time` (within epsilon), else the insert position.
    fn find_index(&self, time: f64) -> std::result::Result<usize, usize> {
        let idx = self
            .keyframes
            .partition_point(|k| k.time() < time - self.epsilon);
        match self.keyframes.get(idx) {
            Some(k) if (k.time() - time).abs() <= self.epsilon => Ok(idx),
            _ => Err(idx),
        }
    }

    fn validate_time(time: f64) -> Result<()> {
        if time.is_finite() && time >= 0.0 {
            Ok(())
        } else {
            Err(AnimationError::InvalidKeyframeTime { time })
        }
    }

    /// Insert a keyframe in time order.
    ///
    /// A keyframe already at the same time (within epsilon) is replaced and
    /// returned; the replacement keeps the existing time so ordering holds.
    pub fn add(&mut self, keyframe: Keyframe<V>) -> Result<Option<Keyframe<V>>> {
        Self::validate_time(keyframe.time())?;
        match self.find_index(keyframe.time()) {
            Ok(i) => {
                let time = self.keyframes[i].time();
                let old = std::mem::replace(&mut self.keyframes[i], keyframe.at_time(time));
                Ok(Some(old))
            }
            Err(i) => {
                self.keyframes.insert(i, keyframe);
                Ok(None)
            }
        }
    }

    /// Remove the keyframe at `time`. Absent keyframes are not an error.
    pub fn remove(&mut self, time: f64) -> Option<Keyframe<V>> {
        self.find_index(time).ok().map(|i| self.keyframes.remove(i))
    }

    /// Re-time the keyframe at `from` to `to`, keeping value and easing.
    ///
    /// Returns `Ok(false)` if there is no keyframe at `from`.
    pub fn move_keyframe(&mut self, from: f64, to: f64) -> Result<bool> {
        Self::validate_time(to)?;
        match self.remove(from) {
            Some(k) => {
                self.add(k.at_time(to))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn keyframe_at(&self, time: f64) -> Option<&Keyframe<V>> {
        self.find_index(time).ok().map(|i| &self.keyframes[i])
    }

    /// Sorted keyframe times, for timeline tick marks.
    pub fn all_keyframe_times(&self) -> Vec<f64> {
        self.keyframes.iter().map(Keyframe::time).collect()
    }

    /// First and last keyframe times.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => Some((first.time(), last.time())),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Interpolated value at `t` seconds.
    pub fn value_at(&self, t: f64) -> Result<V> {
        sample_keyframes(&self.keyframes, t).ok_or_else(|| AnimationError::EmptyTrack {
            track_id: self.id.clone(),
        })
    }
}

/// Type-erased track, one variant per [`ValueKind`].
#[derive(Clone, Debug, PartialEq)]
pub enum AnyTrack {
    Scalar(Track<f64>),
    Point(Track<Point2>),
    Color(Track<Rgba>),
    Path(Track<Path>),
}

macro_rules! dispatch {
    ($track:expr, $t:ident => $body:expr) => {
        match $track {
            AnyTrack::Scalar($t) => $body,
            AnyTrack::Point($t) => $body,
            AnyTrack::Color($t) => $body,
            AnyTrack::Path($t) => $body,
        }
    };
}

pub(crate) use dispatch;

fn add_erased<V: Animatable>(
    track: &mut Track<V>,
    time: f64,
    value: AnimatableValue,
    easing: Easing,
) -> Result<bool> {
    let actual = value.kind();
    let value = V::from_value(value).ok_or_else(|| AnimationError::TypeMismatch {
        track_id: track.id().to_string(),
        expected: V::KIND,
        actual,
    })?;
    let replaced = track.add(Keyframe::new(time, value).with_easing(easing))?;
    Ok(replaced.is_some())
}

impl AnyTrack {
    /// Empty track of the given kind.
    pub fn empty(id: impl Into<String>, kind: ValueKind, epsilon: f64) -> Self {
        match kind {
            ValueKind::Scalar => AnyTrack::Scalar(Track::with_epsilon(id, epsilon)),
            ValueKind::Point => AnyTrack::Point(Track::with_epsilon(id, epsilon)),
            ValueKind::Color => AnyTrack::Color(Track::with_epsilon(id, epsilon)),
            ValueKind::Path => AnyTrack::Path(Track::with_epsilon(id, epsilon)),
        }
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        dispatch!(self, t => t.kind())
    }

    #[inline]
    pub fn id(&self) -> &str {
        dispatch!(self, t => t.id())
    }

    #[inline]
    pub fn len(&self) -> usize {
        dispatch!(self, t => t.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        dispatch!(self, t => t.is_empty())
    }

    pub fn all_keyframe_times(&self) -> Vec<f64> {
        dispatch!(self, t => t.all_keyframe_times())
    }

    pub fn value_at(&self, time: f64) -> Result<AnimatableValue> {
        dispatch!(self, t => t.value_at(time).map(Animatable::into_value))
    }

    /// Insert a type-tagged keyframe value; `TypeMismatch` if the kind differs.
    /// Returns whether a keyframe at the same time was replaced.
    pub fn add_value(&mut self, time: f64, value: AnimatableValue, easing: Easing) -> Result<bool> {
        dispatch!(self, t => add_erased(t, time, value, easing))
    }

    /// Remove the keyframe at `time`; returns whether one was removed.
    pub fn remove(&mut self, time: f64) -> bool {
        dispatch!(self, t => t.remove(time).is_some())
    }

    pub fn clear(&mut self) {
        dispatch!(self, t => t.clear())
    }

    #[inline]
    pub fn downcast_ref<V: Animatable>(&self) -> Option<&Track<V>> {
        V::track_ref(self)
    }

    #[inline]
    pub fn downcast_mut<V: Animatable>(&mut self) -> Option<&mut Track<V>> {
        V::track_mut(self)
    }
}

impl<V: Animatable> From<Track<V>> for AnyTrack {
    fn from(track: Track<V>) -> Self {
        V::wrap_track(track)
    }
}
