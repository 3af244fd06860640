//! Error types for the keyframe engine.

use crate::value::ValueKind;

/// Errors produced by tracks, the registry, and the controller.
///
/// Track-level variants (`EmptyTrack`, `TypeMismatch`) are collected per track
/// by [`TrackRegistry::apply_all`](crate::registry::TrackRegistry::apply_all)
/// and never abort sibling updates.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    /// Controller duration is not finite or not strictly positive.
    #[error("Invalid duration: {duration} (must be finite and > 0)")]
    InvalidDuration { duration: f64 },

    /// A track was sampled while holding no keyframes.
    #[error("Track '{track_id}' has no keyframes")]
    EmptyTrack { track_id: String },

    /// A track or sink was used with a value kind other than the one it holds.
    #[error("Type mismatch on track '{track_id}': expected {expected}, got {actual}")]
    TypeMismatch {
        track_id: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// No track is registered under this id.
    #[error("Track not found: {track_id}")]
    TrackNotFound { track_id: String },

    /// Keyframe time is negative or not finite.
    #[error("Invalid keyframe time: {time}")]
    InvalidKeyframeTime { time: f64 },

    /// Export frame rate is not finite or not strictly positive.
    #[error("Invalid frame rate: {frame_rate}")]
    InvalidFrameRate { frame_rate: f64 },

    /// A persisted snapshot violates a structural invariant.
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// JSON (de)serialization failed.
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl AnimationError {
    /// Whether the caller can carry on after this error (skip the update,
    /// reject the registration) instead of tearing the controller down.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyTrack { .. }
                | Self::TypeMismatch { .. }
                | Self::TrackNotFound { .. }
                | Self::InvalidKeyframeTime { .. }
        )
    }

    /// Error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } | Self::InvalidFrameRate { .. } => "config",
            Self::EmptyTrack { .. } | Self::TrackNotFound { .. } => "data",
            Self::TypeMismatch { .. } | Self::InvalidKeyframeTime { .. } => "validation",
            Self::InvalidSnapshot { .. } | Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverability() {
        let empty = AnimationError::EmptyTrack {
            track_id: "opacity".to_string(),
        };
        assert!(empty.is_recoverable());

        let fatal = AnimationError::InvalidDuration { duration: 0.0 };
        assert!(!fatal.is_recoverable());
    }

    #[test]
    fn test_error_categories() {
        let mismatch = AnimationError::TypeMismatch {
            track_id: "pos".to_string(),
            expected: ValueKind::Point,
            actual: ValueKind::Scalar,
        };
        assert_eq!(mismatch.category(), "validation");
        assert_eq!(
            mismatch.to_string(),
            "Type mismatch on track 'pos': expected point, got scalar"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let err: AnimationError = serde_json::from_str::<f64>("not json").unwrap_err().into();
        assert_eq!(err.category(), "serialization");
    }
}
