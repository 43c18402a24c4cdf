pub mod geodesy;
pub mod stats;

pub use geodesy::{
    crosswind_bearing, destination, distance_m, initial_bearing, normalize_bearing,
    try_destination, upwind_bearing, EARTH_RADIUS_M,
};
pub use stats::ConcentrationStats;
