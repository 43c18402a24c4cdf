pub mod engine;
pub mod estimator;
pub mod history;
pub mod search;

pub use engine::SourceLocaliser;
pub use estimator::{back_track, concentration_factor, weighted_centroid, Candidate};
pub use history::MeasurementHistory;
pub use search::{spiral_leg, strategy_for, Crosswind, ExpandingSpiral, HoldPosition};
