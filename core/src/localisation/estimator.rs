//! Back-tracking heuristic: each above-background sample points upwind to a
//! candidate source, closer the stronger the excess concentration.
//!
//! The factor floor and the `50 m / factor` distance are empirical choices,
//! not a dispersion model. They are kept exactly as tuned in the field.

use crate::geo::{try_destination, upwind_bearing};
use crate::interface::{GeoPoint, Measurement};
use crate::prelude::LocaliserResult;
use serde::{Deserialize, Serialize};

/// Excess ppm that maps to a factor of 1.0.
pub const EXCESS_SCALE_PPM: f64 = 100.0;
/// Lower bound on the factor so the distance stays finite.
pub const MIN_CONCENTRATION_FACTOR: f64 = 0.1;
/// Distance assumed for a factor of 1.0.
pub const REFERENCE_DISTANCE_M: f64 = 50.0;

/// One back-tracked source hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub position: GeoPoint,
    pub confidence: f64,
    pub distance_m: f64,
}

pub fn concentration_factor(concentration_ppm: f64, background_ppm: f64) -> f64 {
    ((concentration_ppm - background_ppm) / EXCESS_SCALE_PPM).max(MIN_CONCENTRATION_FACTOR)
}

/// Projects a candidate source from `measurement`.
///
/// Returns `None` when the sample is not strictly above background (NaN and
/// infinite readings never qualify) and `Some(Err(_))` when the projection
/// itself is undefined, e.g. for a NaN position or wind direction.
pub fn back_track(
    measurement: &Measurement,
    background_ppm: f64,
) -> Option<LocaliserResult<Candidate>> {
    let ppm = measurement.concentration_ppm;
    if !ppm.is_finite() || ppm <= background_ppm {
        return None;
    }

    let confidence = concentration_factor(ppm, background_ppm);
    let distance_m = REFERENCE_DISTANCE_M / confidence;
    let bearing = upwind_bearing(measurement.wind_direction_deg);

    Some(
        try_destination(measurement.position.horizontal(), bearing, distance_m).map(|position| {
            Candidate {
                position,
                confidence,
                distance_m,
            }
        }),
    )
}

/// Confidence-weighted centroid of `candidates` and its capped mean
/// confidence, or `None` for an empty slice.
pub fn weighted_centroid(candidates: &[Candidate]) -> Option<(GeoPoint, f64)> {
    if candidates.is_empty() {
        return None;
    }

    let total_weight: f64 = candidates.iter().map(|c| c.confidence).sum();
    if total_weight <= 0.0 {
        return None;
    }

    let lat = candidates
        .iter()
        .map(|c| c.position.lat * c.confidence)
        .sum::<f64>()
        / total_weight;
    let lon = candidates
        .iter()
        .map(|c| c.position.lon * c.confidence)
        .sum::<f64>()
        / total_weight;
    let confidence = (total_weight / candidates.len() as f64).min(1.0);

    Some((GeoPoint::new(lat, lon), confidence))
}
