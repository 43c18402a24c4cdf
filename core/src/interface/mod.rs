pub mod measurement;
pub mod navigation;
pub mod packet;

pub use measurement::{GeoPoint, Measurement, Position, SensorReading};
pub use navigation::{NavigationMode, SearchStatistics, SourceEstimate, Waypoint};
pub use packet::Packet;
