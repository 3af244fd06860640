//! Easing curves applied to segment progress.
//!
//! The easing stored on the later keyframe of a segment governs that segment.
//! Every curve maps [0,1] onto [0,1] with `f(0) = 0` and `f(1) = 1`.

use serde::{Deserialize, Serialize};

use crate::interp::functions::bezier_ease;

/// Progress-remapping function for one keyframe segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,
    /// Quadratic ease-in (slow start).
    EaseIn,
    /// Quadratic ease-out (slow end).
    EaseOut,
    /// Quadratic ease-in for the first half, ease-out for the second.
    EaseInOut,
    /// CSS-style timing curve through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// Evaluate the curve at progress `p`.
    ///
    /// Input is clamped to [0,1]; the endpoints are returned exactly.
    #[inline]
    pub fn apply(&self, p: f64) -> f64 {
        if p.is_nan() || p <= 0.0 {
            return 0.0;
        }
        if p >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => p,
            Easing::EaseIn => p * p,
            Easing::EaseOut => {
                let omp = 1.0 - p;
                1.0 - omp * omp
            }
            Easing::EaseInOut => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    let k = -2.0 * p + 2.0;
                    1.0 - k * k / 2.0
                }
            }
            Easing::CubicBezier { x1, y1, x2, y2 } => bezier_ease(p, x1, y1, x2, y2),
        }
    }

    /// CSS `ease` timing curve.
    pub const fn css_ease() -> Self {
        Easing::CubicBezier {
            x1: 0.25,
            y1: 0.1,
            x2: 0.25,
            y2: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::css_ease(),
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_input_clamping() {
        for easing in ALL {
            assert_eq!(easing.apply(-0.5), 0.0);
            assert_eq!(easing.apply(1.5), 1.0);
            assert_eq!(easing.apply(f64::NAN), 0.0);
        }
    }

    #[test]
    fn test_quadratic_formulas() {
        assert_eq!(Easing::EaseIn.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOut.apply(0.5), 0.75);
        assert_eq!(Easing::EaseInOut.apply(0.25), 0.125);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInOut.apply(0.75), 0.875);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(json, "\"easeInOut\"");
        let back: Easing = serde_json::from_str("\"easeOut\"").unwrap();
        assert_eq!(back, Easing::EaseOut);
    }
}
