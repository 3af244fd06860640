//! Keyframe sampling.
//!
//! Model:
//! - Keyframes are strictly ordered by time.
//! - Before the first / after the last keyframe the value is clamped (no extrapolation).
//! - Inside a segment [k0, k1) progress is `(t - k0.time) / (k1.time - k0.time)`,
//!   remapped by `k1.easing`, then blended with the value kind's interpolation.
//! - The bracketing segment is located by binary search.

use crate::keyframe::Keyframe;
use crate::value::Animatable;

/// Where a time falls relative to a keyframe sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// No keyframes.
    Empty,
    /// Hold the keyframe at this index (clamped edge, single key, or exact hit).
    Hold(usize),
    /// Between `i0` and `i0 + 1`, with raw (un-eased) progress in (0,1).
    Between { i0: usize, progress: f64 },
}

/// Locate the segment containing `t`.
pub fn find_segment<V: Animatable>(keyframes: &[Keyframe<V>], t: f64) -> Segment {
    let n = keyframes.len();
    if n == 0 {
        return Segment::Empty;
    }
    if n == 1 || t.is_nan() || t <= keyframes[0].time() {
        return Segment::Hold(0);
    }
    if t >= keyframes[n - 1].time() {
        return Segment::Hold(n - 1);
    }
    // First index whose time is > t; bounded to 1..n by the edge checks above.
    let i1 = keyframes.partition_point(|k| k.time() <= t);
    let i0 = i1 - 1;
    let t0 = keyframes[i0].time();
    if t == t0 {
        return Segment::Hold(i0);
    }
    let t1 = keyframes[i1].time();
    let progress = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
    Segment::Between { i0, progress }
}

/// Sample a keyframe sequence at time `t`. Returns `None` if it is empty.
pub fn sample_keyframes<V: Animatable>(keyframes: &[Keyframe<V>], t: f64) -> Option<V> {
    match find_segment(keyframes, t) {
        Segment::Empty => None,
        Segment::Hold(i) => Some(keyframes[i].value().clone()),
        Segment::Between { i0, progress } => {
            let k0 = &keyframes[i0];
            let k1 = &keyframes[i0 + 1];
            let eased = k1.easing().apply(progress);
            Some(V::interpolate(k0.value(), k1.value(), eased))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(f64, f64)]) -> Vec<Keyframe<f64>> {
        pairs.iter().map(|(t, v)| Keyframe::new(*t, *v)).collect()
    }

    #[test]
    fn find_segment_edges_and_interior() {
        let k = keys(&[(0.0, 0.0), (1.0, 1.0), (3.0, 0.0)]);
        assert_eq!(find_segment(&k, -1.0), Segment::Hold(0));
        assert_eq!(find_segment(&k, 1.0), Segment::Hold(1));
        assert_eq!(find_segment(&k, 5.0), Segment::Hold(2));
        assert_eq!(
            find_segment(&k, 2.0),
            Segment::Between {
                i0: 1,
                progress: 0.5
            }
        );
        assert_eq!(find_segment::<f64>(&[], 0.0), Segment::Empty);
    }

    #[test]
    fn sample_uses_later_keyframe_easing() {
        let k = vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 1.0).with_easing(crate::easing::Easing::EaseIn),
        ];
        assert_eq!(sample_keyframes(&k, 0.5), Some(0.25));
    }
}
