//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::track::DEFAULT_TIME_EPSILON;
use crate::Result;

/// Tunables for a controller and the registry it owns.
/// Missing fields in a JSON document fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyframe times closer than this (seconds) are the same time.
    pub time_epsilon: f64,
    /// Frame rate used by `ExportConfig::default_for`.
    pub export_frame_rate: f64,
    /// Maximum queued controller events before the oldest are dropped.
    pub max_events: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_epsilon: DEFAULT_TIME_EPSILON,
            export_frame_rate: 30.0,
            max_events: 1024,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{ "export_frame_rate": 24.0 }"#).unwrap();
        assert_eq!(cfg.export_frame_rate, 24.0);
        assert_eq!(cfg.time_epsilon, DEFAULT_TIME_EPSILON);
        assert_eq!(cfg.max_events, 1024);
    }
}
