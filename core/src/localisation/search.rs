use crate::geo::{crosswind_bearing, try_destination};
use crate::interface::{GeoPoint, Measurement};
use crate::prelude::{LocaliserConfig, LocaliserResult, SearchPattern, SearchStrategy};

pub const SPIRAL_STEP_DEG: f64 = 45.0;
pub const SPIRAL_BASE_RADIUS_M: f64 = 10.0;
pub const SPIRAL_GROWTH_M: f64 = 2.0;
pub const CROSSWIND_OFFSET_M: f64 = 30.0;

/// Bearing and radius of the spiral leg for a given history size.
pub fn spiral_leg(measurement_count: usize, radius_cap_m: f64) -> (f64, f64) {
    let count = measurement_count as f64;
    let bearing = (count * SPIRAL_STEP_DEG) % 360.0;
    let radius = (SPIRAL_BASE_RADIUS_M + count * SPIRAL_GROWTH_M).min(radius_cap_m);
    (bearing, radius)
}

/// Coarse outward spiral: one 45° step and 2 m of radius per sample.
pub struct ExpandingSpiral;

impl SearchStrategy for ExpandingSpiral {
    fn next_target(
        &self,
        current: &Measurement,
        measurement_count: usize,
        config: &LocaliserConfig,
    ) -> LocaliserResult<GeoPoint> {
        let (bearing, radius) = spiral_leg(measurement_count, config.search_radius_cap_m);
        try_destination(current.position.horizontal(), bearing, radius)
    }
}

/// Fixed sidestep perpendicular to the latest wind.
pub struct Crosswind;

impl SearchStrategy for Crosswind {
    fn next_target(
        &self,
        current: &Measurement,
        _measurement_count: usize,
        _config: &LocaliserConfig,
    ) -> LocaliserResult<GeoPoint> {
        try_destination(
            current.position.horizontal(),
            crosswind_bearing(current.wind_direction_deg),
            CROSSWIND_OFFSET_M,
        )
    }
}

/// Stays on the current position.
pub struct HoldPosition;

impl SearchStrategy for HoldPosition {
    fn next_target(
        &self,
        current: &Measurement,
        _measurement_count: usize,
        _config: &LocaliserConfig,
    ) -> LocaliserResult<GeoPoint> {
        Ok(current.position.horizontal())
    }
}

pub fn strategy_for(pattern: SearchPattern) -> &'static dyn SearchStrategy {
    match pattern {
        SearchPattern::ExpandingSpiral => &ExpandingSpiral,
        SearchPattern::Crosswind => &Crosswind,
        SearchPattern::Hold => &HoldPosition,
    }
}
