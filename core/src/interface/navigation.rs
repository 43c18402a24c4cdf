use crate::interface::measurement::{GeoPoint, Position};
use serde::{Deserialize, Serialize};

/// Target handed to the flight-command collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    pub fn at(point: GeoPoint, alt: f64) -> Self {
        Self::new(point.lat, point.lon, alt)
    }

    pub fn horizontal(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon, self.alt)
    }
}

/// Believed source location, rebuilt from scratch on every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceEstimate {
    pub position: GeoPoint,
    /// Average excess-concentration score capped at 1. Not a probability.
    pub confidence: f64,
    pub updated_at: f64,
    pub candidate_count: usize,
}

/// Which branch `next_waypoint` takes for the current history and estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    Idle,
    Search,
    Homing,
}

/// Summary of the retained window. All zero when the history is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub total_measurements: usize,
    pub max_ppm: f64,
    pub min_ppm: f64,
    pub avg_ppm: f64,
    pub window_age_minutes: f64,
    pub source_confidence: f64,
}
