//! Gas-source localisation core for the plume-tracking UAV.
//!
//! Fused (position, concentration, wind) samples go in through
//! [`SourceLocaliser::record_measurement`]; a source estimate and the next
//! waypoint come out. Everything here is synchronous, in-memory computation.

pub mod clock;
pub mod geo;
pub mod interface;
pub mod localisation;
pub mod prelude;
pub mod telemetry;

pub use localisation::SourceLocaliser;
pub use prelude::{LocaliserConfig, LocaliserError, LocaliserResult, SearchPattern};
