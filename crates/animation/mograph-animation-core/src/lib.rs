//! Mograph Animation Core (UI-agnostic)
//!
//! Keyframe engine for the motion-graphics editor: typed tracks of keyframes,
//! a registry that samples every track and delivers values to the sinks the
//! canvas supplies, and a controller that owns the timeline clock.
//!
//! The engine does no I/O and never reads wall-clock time. The host drives it
//! with `tick(dt)` during playback and `seek(t)` for scrubbing and export.

pub mod binding;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod export;
pub mod interp;
pub mod keyframe;
pub mod outputs;
pub mod registry;
pub mod sampling;
pub mod snapshot;
pub mod track;
pub mod value;

// Re-exports for consumers (canvas, export pipeline, persistence)
pub use binding::{typed_sink, BoxedSink, DetachedSink, SinkResolver, TypedSink, ValueCell, ValueSink};
pub use config::Config;
pub use controller::{AnimationController, PlaybackState};
pub use easing::Easing;
pub use error::AnimationError;
pub use export::{
    frame_count, frame_times, BakedAnimation, BakedTrack, ExportConfig, ExportFrame, ExportSummary,
};
pub use keyframe::Keyframe;
pub use outputs::{ApplyReport, ControllerEvent, TrackFailure};
pub use registry::TrackRegistry;
pub use snapshot::{AnimationSnapshot, KeyframeSnapshot, TrackSnapshot};
pub use track::{AnyTrack, Track, DEFAULT_TIME_EPSILON};
pub use value::{Animatable, AnimatableValue, Path, Point2, Rgba, ValueKind};

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, AnimationError>;
