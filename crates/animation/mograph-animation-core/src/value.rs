//! Animatable value kinds and the typed/erased conversions between them.
//!
//! The set of kinds is closed: scalar, 2D point, RGBA color and point list
//! (freeform path). Tracks are generic over [`Animatable`]; the registry
//! stores them type-erased in [`AnyTrack`] and uses [`ValueKind`] as the
//! discriminant, so a kind check is a tag comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interp::functions::{lerp_f64, lerp_path, lerp_point, lerp_rgba};
use crate::track::{AnyTrack, Track};

/// Discriminant of the value kinds a track may hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Scalar,
    Point,
    Color,
    Path,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Point => "point",
            ValueKind::Color => "color",
            ValueKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// 2D point in canvas space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Straight RGBA color with channels in [0,1].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Build a color, clamping every channel into [0,1].
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// Point list backing freeform path shapes.
pub type Path = Vec<Point2>;

/// Type-tagged value, as delivered to sinks and written into project files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum AnimatableValue {
    Scalar(f64),
    Point(Point2),
    Color(Rgba),
    Path(Path),
}

impl AnimatableValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            AnimatableValue::Scalar(_) => ValueKind::Scalar,
            AnimatableValue::Point(_) => ValueKind::Point,
            AnimatableValue::Color(_) => ValueKind::Color,
            AnimatableValue::Path(_) => ValueKind::Path,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            AnimatableValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point2> {
        match self {
            AnimatableValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            AnimatableValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&[Point2]> {
        match self {
            AnimatableValue::Path(points) => Some(points),
            _ => None,
        }
    }
}

/// A value type that can be keyframed.
///
/// Implemented for exactly the closed set behind [`ValueKind`]. The track
/// accessors are the only place a type-erased track is downcast.
pub trait Animatable: Clone + PartialEq + fmt::Debug + Send + 'static {
    const KIND: ValueKind;

    /// Blend `a` toward `b` by eased progress `t` in [0,1].
    fn interpolate(a: &Self, b: &Self, t: f64) -> Self;

    fn into_value(self) -> AnimatableValue;

    fn from_value(value: AnimatableValue) -> Option<Self>;

    fn wrap_track(track: Track<Self>) -> AnyTrack;

    fn track_ref(track: &AnyTrack) -> Option<&Track<Self>>;

    fn track_mut(track: &mut AnyTrack) -> Option<&mut Track<Self>>;
}

macro_rules! impl_animatable {
    ($ty:ty, $variant:ident, |$a:ident, $b:ident, $t:ident| $interp:expr) => {
        impl Animatable for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            #[inline]
            fn interpolate($a: &Self, $b: &Self, $t: f64) -> Self {
                $interp
            }

            #[inline]
            fn into_value(self) -> AnimatableValue {
                AnimatableValue::$variant(self)
            }

            #[inline]
            fn from_value(value: AnimatableValue) -> Option<Self> {
                match value {
                    AnimatableValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            fn wrap_track(track: Track<Self>) -> AnyTrack {
                AnyTrack::$variant(track)
            }

            #[inline]
            fn track_ref(track: &AnyTrack) -> Option<&Track<Self>> {
                match track {
                    AnyTrack::$variant(t) => Some(t),
                    _ => None,
                }
            }

            #[inline]
            fn track_mut(track: &mut AnyTrack) -> Option<&mut Track<Self>> {
                match track {
                    AnyTrack::$variant(t) => Some(t),
                    _ => None,
                }
            }
        }
    };
}

impl_animatable!(f64, Scalar, |a, b, t| lerp_f64(*a, *b, t));
impl_animatable!(Point2, Point, |a, b, t| lerp_point(*a, *b, t));
impl_animatable!(Rgba, Color, |a, b, t| lerp_rgba(*a, *b, t));
// Unequal point counts cannot be blended: hold the left keyframe's path.
impl_animatable!(Path, Path, |a, b, t| lerp_path(a, b, t)
    .unwrap_or_else(|| a.clone()));
