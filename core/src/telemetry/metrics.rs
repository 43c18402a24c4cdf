use crate::interface::NavigationMode;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters accumulated over the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub measurements_recorded: usize,
    pub measurements_evicted: usize,
    pub estimates_updated: usize,
    pub candidates_skipped: usize,
    pub search_waypoints: usize,
    pub homing_waypoints: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_measurement(&self, evicted: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.measurements_recorded += 1;
            metrics.measurements_evicted += evicted;
        }
    }

    pub fn record_estimate(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.estimates_updated += 1;
        }
    }

    pub fn record_skipped_candidate(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.candidates_skipped += 1;
        }
    }

    pub fn record_waypoint(&self, mode: NavigationMode) {
        if let Ok(mut metrics) = self.inner.lock() {
            match mode {
                NavigationMode::Search => metrics.search_waypoints += 1,
                NavigationMode::Homing => metrics.homing_waypoints += 1,
                NavigationMode::Idle => {}
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_waypoints_by_mode() {
        let metrics = MetricsRecorder::new();
        metrics.record_waypoint(NavigationMode::Search);
        metrics.record_waypoint(NavigationMode::Search);
        metrics.record_waypoint(NavigationMode::Homing);
        metrics.record_waypoint(NavigationMode::Idle);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.search_waypoints, 2);
        assert_eq!(snapshot.homing_waypoints, 1);
    }

    #[test]
    fn measurement_counter_tracks_evictions() {
        let metrics = MetricsRecorder::new();
        metrics.record_measurement(0);
        metrics.record_measurement(3);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.measurements_recorded, 2);
        assert_eq!(snapshot.measurements_evicted, 3);
    }
}
