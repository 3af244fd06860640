//! Persistence snapshot written into project files.
//!
//! Shape (JSON):
//! ```json
//! { "duration": 3.0,
//!   "tracks": [ { "id": "opacity", "valueType": "scalar",
//!                 "keyframes": [ { "time": 0.0, "value": { "type": "scalar", "data": 0.0 },
//!                                  "easing": "linear" } ] } ] }
//! ```
//! `easing` may be omitted and defaults to linear. Tracks are written sorted
//! by id so saving the same animation twice yields the same document.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::binding::{BoxedSink, DetachedSink, SinkResolver};
use crate::config::Config;
use crate::controller::AnimationController;
use crate::easing::Easing;
use crate::error::AnimationError;
use crate::track::{dispatch, AnyTrack, DEFAULT_TIME_EPSILON};
use crate::value::{Animatable, AnimatableValue, Rgba, ValueKind};
use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSnapshot {
    pub time: f64,
    pub value: AnimatableValue,
    #[serde(default)]
    pub easing: Easing,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub id: String,
    #[serde(rename = "valueType")]
    pub value_type: ValueKind,
    #[serde(default)]
    pub keyframes: Vec<KeyframeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSnapshot {
    pub duration: f64,
    #[serde(default)]
    pub tracks: Vec<TrackSnapshot>,
}

fn invalid(reason: impl Into<String>) -> AnimationError {
    AnimationError::InvalidSnapshot {
        reason: reason.into(),
    }
}

fn color_in_range(c: &Rgba) -> bool {
    [c.r, c.g, c.b, c.a]
        .iter()
        .all(|ch| (0.0..=1.0).contains(ch))
}

impl TrackSnapshot {
    pub fn from_track(track: &AnyTrack) -> Self {
        let keyframes: Vec<KeyframeSnapshot> = dispatch!(track, t => t
            .keyframes()
            .iter()
            .map(|k| KeyframeSnapshot {
                time: k.time(),
                value: k.value().clone().into_value(),
                easing: k.easing(),
            })
            .collect());
        Self {
            id: track.id().to_string(),
            value_type: track.kind(),
            keyframes,
        }
    }

    /// Keyframe times finite, non-negative and increasing by more than
    /// [`DEFAULT_TIME_EPSILON`]; every value of the declared kind; color
    /// channels in [0,1].
    pub fn validate(&self) -> Result<()> {
        self.validate_with_epsilon(DEFAULT_TIME_EPSILON)
    }

    /// As [`validate`](Self::validate), with neighbouring keyframes required
    /// to be more than `epsilon` apart.
    pub fn validate_with_epsilon(&self, epsilon: f64) -> Result<()> {
        let mut prev: Option<f64> = None;
        for (i, k) in self.keyframes.iter().enumerate() {
            if !(k.time.is_finite() && k.time >= 0.0) {
                return Err(invalid(format!(
                    "track '{}': keyframe {i} has invalid time {}",
                    self.id, k.time
                )));
            }
            if let Some(p) = prev {
                if k.time <= p {
                    return Err(invalid(format!(
                        "track '{}': keyframe times not strictly increasing ({p} then {})",
                        self.id, k.time
                    )));
                }
                if k.time - p <= epsilon {
                    return Err(invalid(format!(
                        "track '{}': keyframes at {p} and {} are the same time",
                        self.id, k.time
                    )));
                }
            }
            prev = Some(k.time);
            if k.value.kind() != self.value_type {
                return Err(invalid(format!(
                    "track '{}': keyframe {i} holds a {} value in a {} track",
                    self.id,
                    k.value.kind(),
                    self.value_type
                )));
            }
            if let AnimatableValue::Color(c) = &k.value {
                if !color_in_range(c) {
                    return Err(invalid(format!(
                        "track '{}': keyframe {i} color channel outside [0,1]",
                        self.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rebuild the track. Keyframes closer than `epsilon` would collapse
    /// into one, so they are rejected with `InvalidSnapshot`.
    pub fn to_track(&self, epsilon: f64) -> Result<AnyTrack> {
        let mut track = AnyTrack::empty(self.id.clone(), self.value_type, epsilon);
        for k in &self.keyframes {
            if track.add_value(k.time, k.value.clone(), k.easing)? {
                return Err(invalid(format!(
                    "track '{}': keyframe at {} collides with a neighbour",
                    self.id, k.time
                )));
            }
        }
        Ok(track)
    }
}

impl AnimationSnapshot {
    pub fn validate(&self) -> Result<()> {
        self.validate_with_epsilon(DEFAULT_TIME_EPSILON)
    }

    pub fn validate_with_epsilon(&self, epsilon: f64) -> Result<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(AnimationError::InvalidDuration {
                duration: self.duration,
            });
        }
        let mut ids: Vec<&str> = self.tracks.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(invalid(format!("duplicate track id '{}'", pair[0])));
        }
        self.tracks
            .iter()
            .try_for_each(|t| t.validate_with_epsilon(epsilon))
    }

    /// Parse and validate a snapshot document.
    pub fn parse_json(s: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(s)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn track(&self, id: &str) -> Option<&TrackSnapshot> {
        self.tracks.iter().find(|t| t.id == id)
    }
}

impl AnimationController {
    /// Serializable copy of the duration and every track, sorted by id.
    pub fn snapshot(&self) -> AnimationSnapshot {
        let mut tracks: Vec<TrackSnapshot> = self
            .registry()
            .tracks()
            .map(TrackSnapshot::from_track)
            .collect();
        tracks.sort_by(|a, b| a.id.cmp(&b.id));
        AnimationSnapshot {
            duration: self.duration(),
            tracks,
        }
    }

    /// Restore a controller from a snapshot.
    ///
    /// `resolver` supplies the sink for each track. Tracks it cannot bind are
    /// kept behind a [`DetachedSink`] and can be bound later with `bind_sink`.
    /// The controller starts stopped at time 0 with nothing applied yet.
    pub fn from_snapshot<R>(
        snapshot: &AnimationSnapshot,
        resolver: &mut R,
        cfg: Config,
    ) -> Result<Self>
    where
        R: SinkResolver + ?Sized,
    {
        snapshot.validate_with_epsilon(cfg.time_epsilon)?;
        let mut controller = Self::with_config(snapshot.duration, cfg)?;
        let epsilon = controller.config().time_epsilon;
        for ts in &snapshot.tracks {
            let track = ts.to_track(epsilon)?;
            let sink: BoxedSink = match resolver.resolve(&ts.id, ts.value_type) {
                Some(sink) => sink,
                None => {
                    warn!("from_snapshot: no sink for '{}'; detached", ts.id);
                    Box::new(DetachedSink)
                }
            };
            controller.registry_mut().insert_track(track, sink)?;
        }
        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_defaults_to_linear() {
        let json = r#"{
            "duration": 2.0,
            "tracks": [{ "id": "opacity", "valueType": "scalar",
                         "keyframes": [{ "time": 0.0, "value": { "type": "scalar", "data": 1.0 } }] }]
        }"#;
        let snap = AnimationSnapshot::parse_json(json).unwrap();
        assert_eq!(snap.tracks[0].keyframes[0].easing, Easing::Linear);
    }

    #[test]
    fn validate_rejects_unordered_times() {
        let snap = AnimationSnapshot {
            duration: 1.0,
            tracks: vec![TrackSnapshot {
                id: "x".into(),
                value_type: ValueKind::Scalar,
                keyframes: vec![
                    KeyframeSnapshot {
                        time: 1.0,
                        value: AnimatableValue::Scalar(0.0),
                        easing: Easing::Linear,
                    },
                    KeyframeSnapshot {
                        time: 0.5,
                        value: AnimatableValue::Scalar(1.0),
                        easing: Easing::Linear,
                    },
                ],
            }],
        };
        let err = snap.validate().unwrap_err();
        assert_eq!(err.category(), "serialization");
    }

    #[test]
    fn validate_rejects_kind_mismatch_and_duplicate_ids() {
        let track = TrackSnapshot {
            id: "pos".into(),
            value_type: ValueKind::Point,
            keyframes: vec![KeyframeSnapshot {
                time: 0.0,
                value: AnimatableValue::Scalar(0.0),
                easing: Easing::Linear,
            }],
        };
        assert!(track.validate().is_err());

        let empty = TrackSnapshot {
            keyframes: vec![],
            ..track
        };
        let snap = AnimationSnapshot {
            duration: 1.0,
            tracks: vec![empty.clone(), empty],
        };
        assert!(matches!(
            snap.validate(),
            Err(AnimationError::InvalidSnapshot { .. })
        ));
    }
}
