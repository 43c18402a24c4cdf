use crate::prelude::{LocaliserError, LocaliserResult};
use serde::{Deserialize, Serialize};

/// Horizontal geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Checks `lat ∈ [-90, 90]` and `lon ∈ [-180, 180]`.
    pub fn validate(&self) -> LocaliserResult<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(LocaliserError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(LocaliserError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

/// Vehicle location: degrees, degrees, metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    pub fn horizontal(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Fused tuple handed to the engine by the telemetry collector.
///
/// Wind and position/concentration usually originate on different devices;
/// the caller merges them before recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub position: Position,
    pub concentration_ppm: f64,
    /// Bearing the wind is blowing *from* (0 = North, 90 = East).
    pub wind_direction_deg: f64,
    pub wind_speed_mps: f64,
}

impl SensorReading {
    pub fn new(
        position: Position,
        concentration_ppm: f64,
        wind_direction_deg: f64,
        wind_speed_mps: f64,
    ) -> Self {
        Self {
            position,
            concentration_ppm,
            wind_direction_deg,
            wind_speed_mps,
        }
    }

    /// Reports physically implausible values. The engine itself accepts
    /// readings as-is; this is for callers that want to filter first.
    pub fn validate(&self) -> LocaliserResult<()> {
        self.position.horizontal().validate()?;
        if !(0.0..360.0).contains(&self.wind_direction_deg) {
            return Err(LocaliserError::InvalidInput(format!(
                "wind direction {} outside [0, 360)",
                self.wind_direction_deg
            )));
        }
        if !(self.wind_speed_mps >= 0.0) {
            return Err(LocaliserError::InvalidInput(format!(
                "wind speed {} is negative or NaN",
                self.wind_speed_mps
            )));
        }
        if !(self.concentration_ppm >= 0.0) || !self.concentration_ppm.is_finite() {
            return Err(LocaliserError::InvalidInput(format!(
                "concentration {} is not a finite non-negative value",
                self.concentration_ppm
            )));
        }
        Ok(())
    }
}

/// One timestamped observation held in the engine's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub timestamp: f64,
    pub position: Position,
    pub concentration_ppm: f64,
    pub wind_direction_deg: f64,
    pub wind_speed_mps: f64,
}

impl Measurement {
    pub fn new(timestamp: f64, reading: SensorReading) -> Self {
        Self {
            timestamp,
            position: reading.position,
            concentration_ppm: reading.concentration_ppm,
            wind_direction_deg: reading.wind_direction_deg,
            wind_speed_mps: reading.wind_speed_mps,
        }
    }
}
