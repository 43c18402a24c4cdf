use plumecore::clock::Clock;
use plumecore::interface::{GeoPoint, NavigationMode, SearchStatistics, SourceEstimate};
use plumecore::telemetry::MetricsSnapshot;
use plumecore::SourceLocaliser;
use serde::{Deserialize, Serialize};

/// Read-only view of the engine served on `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusModel {
    pub mode: NavigationMode,
    pub estimate: Option<SourceEstimate>,
    pub statistics: SearchStatistics,
    pub ground_station: Option<GeoPoint>,
    pub metrics: MetricsSnapshot,
}

impl StatusModel {
    pub fn capture<C: Clock>(engine: &SourceLocaliser<C>) -> Self {
        Self {
            mode: engine.navigation_mode(),
            estimate: engine.get_source_estimate(),
            statistics: engine.get_search_statistics(),
            ground_station: engine.ground_station_location(),
            metrics: engine.metrics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumecore::clock::ManualClock;
    use plumecore::LocaliserConfig;

    #[test]
    fn idle_engine_status() {
        let mut engine =
            SourceLocaliser::with_clock(LocaliserConfig::default(), ManualClock::default());
        engine.set_ground_station_location(-31.95, 115.86);
        let status = StatusModel::capture(&engine);
        assert_eq!(status.mode, NavigationMode::Idle);
        assert!(status.estimate.is_none());
        assert_eq!(status.statistics, SearchStatistics::default());
        assert_eq!(status.ground_station, Some(GeoPoint::new(-31.95, 115.86)));
    }
}
