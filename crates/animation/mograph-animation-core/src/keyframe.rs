//! Immutable (time, value, easing) anchors.

use crate::easing::Easing;
use crate::value::Animatable;

/// A keyframe on a [`Track`](crate::track::Track).
///
/// Keyframes are never mutated in place; editing a keyframe replaces it.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<V> {
    time: f64,
    value: V,
    easing: Easing,
}

impl<V: Animatable> Keyframe<V> {
    /// Keyframe at `time` seconds with linear easing.
    #[inline]
    pub fn new(time: f64, value: V) -> Self {
        Self {
            time,
            value,
            easing: Easing::Linear,
        }
    }

    /// Copy of this keyframe with a different easing for the segment it ends.
    #[inline]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Copy of this keyframe moved to `time`.
    #[inline]
    pub fn at_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}
