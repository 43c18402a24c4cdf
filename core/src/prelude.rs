use crate::interface::{GeoPoint, Measurement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tunable options recognised by the localisation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaliserConfig {
    /// Samples older than `newest - retention_window_seconds` are evicted.
    pub retention_window_seconds: f64,
    /// Number of most recent samples considered when recomputing the estimate.
    pub recency_window_count: usize,
    /// Ambient concentration; only samples strictly above it are back-tracked.
    pub background_ppm: f64,
    /// Estimates strictly above this confidence switch the vehicle to homing.
    pub homing_confidence_threshold: f64,
    pub search_pattern: SearchPattern,
    pub search_radius_cap_m: f64,
}

impl Default for LocaliserConfig {
    fn default() -> Self {
        Self {
            retention_window_seconds: 600.0,
            recency_window_count: 10,
            background_ppm: 410.0,
            homing_confidence_threshold: 0.7,
            search_pattern: SearchPattern::ExpandingSpiral,
            search_radius_cap_m: 50.0,
        }
    }
}

/// Geometric pattern flown while no confident estimate exists.
///
/// Unrecognised names map to [`SearchPattern::Hold`], which keeps the vehicle
/// on its current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SearchPattern {
    ExpandingSpiral,
    Crosswind,
    Hold,
}

impl SearchPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchPattern::ExpandingSpiral => "expanding_spiral",
            SearchPattern::Crosswind => "crosswind",
            SearchPattern::Hold => "hold",
        }
    }
}

impl From<&str> for SearchPattern {
    fn from(name: &str) -> Self {
        match name.trim() {
            "expanding_spiral" => SearchPattern::ExpandingSpiral,
            "crosswind" => SearchPattern::Crosswind,
            "hold" => SearchPattern::Hold,
            other => {
                log::warn!("unknown search pattern {:?}, holding position", other);
                SearchPattern::Hold
            }
        }
    }
}

impl From<String> for SearchPattern {
    fn from(name: String) -> Self {
        SearchPattern::from(name.as_str())
    }
}

impl From<SearchPattern> for String {
    fn from(pattern: SearchPattern) -> Self {
        pattern.as_str().to_string()
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common error type for the localisation core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LocaliserError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("projection undefined: {0}")]
    ProjectionUndefined(String),
    #[error("malformed packet: {0}")]
    MalformedPacket(String),
}

pub type LocaliserResult<T> = Result<T, LocaliserError>;

/// Generator for the next search-mode target, given the latest sample.
pub trait SearchStrategy {
    fn next_target(
        &self,
        current: &Measurement,
        measurement_count: usize,
        config: &LocaliserConfig,
    ) -> LocaliserResult<GeoPoint>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_recognised_options() {
        let config = LocaliserConfig::default();
        assert_eq!(config.retention_window_seconds, 600.0);
        assert_eq!(config.recency_window_count, 10);
        assert_eq!(config.background_ppm, 410.0);
        assert_eq!(config.homing_confidence_threshold, 0.7);
        assert_eq!(config.search_pattern, SearchPattern::ExpandingSpiral);
        assert_eq!(config.search_radius_cap_m, 50.0);
    }

    #[test]
    fn unknown_pattern_name_falls_back_to_hold() {
        assert_eq!(SearchPattern::from("crosswind"), SearchPattern::Crosswind);
        assert_eq!(SearchPattern::from("lawnmower"), SearchPattern::Hold);
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let config: LocaliserConfig =
            serde_json::from_str(r#"{"search_pattern": "crosswind", "background_ppm": 420.0}"#)
                .unwrap();
        assert_eq!(config.search_pattern, SearchPattern::Crosswind);
        assert_eq!(config.background_ppm, 420.0);
        assert_eq!(config.recency_window_count, 10);
    }
}
