use crate::clock::{Clock, SystemClock};
use crate::geo::ConcentrationStats;
use crate::interface::{
    GeoPoint, Measurement, NavigationMode, SearchStatistics, SensorReading, SourceEstimate,
    Waypoint,
};
use crate::localisation::estimator::{back_track, weighted_centroid};
use crate::localisation::history::MeasurementHistory;
use crate::localisation::search::strategy_for;
use crate::prelude::LocaliserConfig;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use serde::Serialize;

/// Minimum history size before an estimate is attempted.
pub const MIN_MEASUREMENTS_FOR_ESTIMATE: usize = 3;

/// Source-localisation and search-navigation engine.
///
/// Single-threaded and synchronous; callers sharing it across threads must
/// serialise access themselves.
pub struct SourceLocaliser<C: Clock = SystemClock> {
    config: LocaliserConfig,
    clock: C,
    history: MeasurementHistory,
    estimate: Option<SourceEstimate>,
    ground_station: Option<GeoPoint>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

#[derive(Serialize)]
struct WaypointEvent {
    mode: NavigationMode,
    waypoint: Waypoint,
}

impl SourceLocaliser<SystemClock> {
    pub fn new(config: LocaliserConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for SourceLocaliser<SystemClock> {
    fn default() -> Self {
        Self::new(LocaliserConfig::default())
    }
}

impl<C: Clock> SourceLocaliser<C> {
    pub fn with_clock(config: LocaliserConfig, clock: C) -> Self {
        let history = MeasurementHistory::with_retention(config.retention_window_seconds);
        let logger = LogManager::new();
        logger.record(&format!(
            "Source localiser ready: pattern {}, homing above {:.2}",
            config.search_pattern, config.homing_confidence_threshold
        ));
        Self {
            config,
            clock,
            history,
            estimate: None,
            ground_station: None,
            logger,
            metrics: MetricsRecorder::new(),
        }
    }

    /// Stamps `reading` with the clock, appends it, applies the retention
    /// window and recomputes the estimate.
    ///
    /// Readings are accepted as-is: range checking is the caller's job
    /// (see [`SensorReading::validate`]). Implausible input is only logged.
    pub fn record_measurement(&mut self, reading: SensorReading) {
        if let Err(err) = reading.validate() {
            self.logger
                .warn(&format!("accepting implausible measurement: {}", err));
        }

        let measurement = Measurement::new(self.clock.now(), reading);
        let evicted = self.history.push(measurement);
        self.metrics.record_measurement(evicted);
        self.logger.event("MEASUREMENT", &measurement);

        self.recompute_estimate();
    }

    fn recompute_estimate(&mut self) {
        if self.history.len() < MIN_MEASUREMENTS_FOR_ESTIMATE {
            return;
        }

        let mut candidates = Vec::new();
        for measurement in self.history.recent(self.config.recency_window_count) {
            match back_track(measurement, self.config.background_ppm) {
                Some(Ok(candidate)) => candidates.push(candidate),
                Some(Err(err)) => {
                    self.metrics.record_skipped_candidate();
                    self.logger
                        .warn(&format!("skipping sample at {}: {}", measurement.timestamp, err));
                }
                None => {}
            }
        }

        if let Some((position, confidence)) = weighted_centroid(&candidates) {
            let estimate = SourceEstimate {
                position,
                confidence,
                updated_at: self.clock.now(),
                candidate_count: candidates.len(),
            };
            self.estimate = Some(estimate);
            self.metrics.record_estimate();
            self.logger.event("ESTIMATE", &estimate);
        }
    }

    pub fn navigation_mode(&self) -> NavigationMode {
        if self.history.is_empty() {
            return NavigationMode::Idle;
        }
        match &self.estimate {
            Some(estimate) if estimate.confidence > self.config.homing_confidence_threshold => {
                NavigationMode::Homing
            }
            _ => NavigationMode::Search,
        }
    }

    /// Next target for the flight-command collaborator, or `None` before the
    /// first measurement. Altitude always follows the latest sample.
    pub fn next_waypoint(&self) -> Option<Waypoint> {
        let current = self.history.latest()?;
        let mode = self.navigation_mode();

        let target = match (mode, &self.estimate) {
            (NavigationMode::Homing, Some(estimate)) => estimate.position,
            _ => strategy_for(self.config.search_pattern)
                .next_target(current, self.history.len(), &self.config)
                .unwrap_or_else(|err| {
                    self.logger
                        .warn(&format!("search target undefined, holding: {}", err));
                    current.position.horizontal()
                }),
        };

        let waypoint = Waypoint::at(target, current.position.alt);
        self.metrics.record_waypoint(mode);
        self.logger.event("WAYPOINT", &WaypointEvent { mode, waypoint });
        Some(waypoint)
    }

    pub fn set_ground_station_location(&mut self, lat: f64, lon: f64) {
        let location = GeoPoint::new(lat, lon);
        self.ground_station = Some(location);
        self.logger.record(&format!(
            "Ground station location set: {:.6}, {:.6}",
            lat, lon
        ));
    }

    pub fn ground_station_location(&self) -> Option<GeoPoint> {
        self.ground_station
    }

    pub fn get_source_estimate(&self) -> Option<SourceEstimate> {
        self.estimate
    }

    /// Summary of the retained window. Concentration fields cover finite
    /// readings only; `total_measurements` counts every retained sample.
    pub fn get_search_statistics(&self) -> SearchStatistics {
        if self.history.is_empty() {
            return SearchStatistics::default();
        }
        let (max_ppm, min_ppm, avg_ppm) =
            ConcentrationStats::from_values(self.history.iter().map(|m| m.concentration_ppm))
                .map(|s| (s.max, s.min, s.mean))
                .unwrap_or((0.0, 0.0, 0.0));

        let window_age_minutes = self
            .history
            .oldest()
            .map(|oldest| ((self.clock.now() - oldest.timestamp) / 60.0).max(0.0))
            .unwrap_or(0.0);

        SearchStatistics {
            total_measurements: self.history.len(),
            max_ppm,
            min_ppm,
            avg_ppm,
            window_age_minutes,
            source_confidence: self.estimate.map(|e| e.confidence).unwrap_or(0.0),
        }
    }

    pub fn history(&self) -> &MeasurementHistory {
        &self.history
    }

    pub fn measurement_count(&self) -> usize {
        self.history.len()
    }

    pub fn config(&self) -> &LocaliserConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
