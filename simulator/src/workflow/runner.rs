use crate::generator::plume::PlumeModel;
use crate::vehicle::{FlightCommander, SimulatedVehicle};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use plumecore::clock::{Clock, ManualClock};
use plumecore::geo::distance_m;
use plumecore::interface::{
    NavigationMode, Position, SearchStatistics, SensorReading, SourceEstimate, Waypoint,
};
use plumecore::telemetry::MetricsSnapshot;
use plumecore::SourceLocaliser;
use serde::Serialize;

/// One sense/decide/fly iteration of a mission.
#[derive(Debug, Clone, Serialize)]
pub struct MissionStep {
    pub step: usize,
    pub timestamp: f64,
    pub position: Position,
    pub co2_ppm: f64,
    pub mode: NavigationMode,
    pub waypoint: Option<Waypoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionResult {
    pub steps: Vec<MissionStep>,
    pub final_estimate: Option<SourceEstimate>,
    pub statistics: SearchStatistics,
    pub metrics: MetricsSnapshot,
    /// Distance from the start position to the true source.
    pub initial_error_m: f64,
    /// Distance from the final estimate to the true source. Once the vehicle
    /// overflies the source the estimate rests on weak samples and can drift.
    pub final_error_m: Option<f64>,
    /// Smallest distance between a sensed position and the true source.
    pub closest_approach_m: f64,
    pub closest_approach_step: usize,
    pub first_homing_step: Option<usize>,
}

/// Compact line appended to the offline report.
#[derive(Debug, Clone, Serialize)]
pub struct MissionSummary {
    pub steps: usize,
    pub search_pattern: String,
    pub final_estimate: Option<SourceEstimate>,
    pub initial_error_m: f64,
    pub final_error_m: Option<f64>,
    pub closest_approach_m: f64,
    pub closest_approach_step: usize,
    pub first_homing_step: Option<usize>,
    pub max_ppm: f64,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Runs a closed-loop mission on simulated time against the synthetic plume.
    pub fn execute(&self) -> anyhow::Result<MissionResult> {
        let clock = ManualClock::starting_at(self.config.start_timestamp);
        let mut engine = SourceLocaliser::with_clock(self.config.localiser.clone(), clock.clone());
        let plume = PlumeModel::new(self.config.plume.clone());
        let source = self.config.plume.source();
        let wind_direction = self.config.plume.wind_direction_deg;
        let wind_speed = self.config.plume.wind_speed_mps;

        let (mut vehicle, _snapshots) =
            SimulatedVehicle::new(plume, self.config.max_leg_m, clock.now());
        let initial_error_m = distance_m(vehicle.position().horizontal(), source);

        let mut steps = Vec::with_capacity(self.config.steps);
        let mut first_homing_step = None;
        let mut closest_approach_m = initial_error_m;
        let mut closest_approach_step = 0;

        for step in 0..self.config.steps {
            let snapshot = vehicle.sense(clock.now());
            let range_m = distance_m(snapshot.position.horizontal(), source);
            if range_m < closest_approach_m {
                closest_approach_m = range_m;
                closest_approach_step = step;
            }
            engine.record_measurement(SensorReading::new(
                snapshot.position,
                snapshot.co2_ppm,
                wind_direction,
                wind_speed,
            ));

            let mode = engine.navigation_mode();
            if mode == NavigationMode::Homing && first_homing_step.is_none() {
                first_homing_step = Some(step);
            }

            let waypoint = engine.next_waypoint();
            if let Some(target) = waypoint.as_ref() {
                vehicle
                    .send_waypoint(target)
                    .with_context(|| format!("dispatching waypoint at step {}", step))?;
            }

            steps.push(MissionStep {
                step,
                timestamp: snapshot.timestamp,
                position: snapshot.position,
                co2_ppm: snapshot.co2_ppm,
                mode,
                waypoint,
            });
            clock.advance(self.config.sample_interval_s);
        }

        let final_estimate = engine.get_source_estimate();
        let final_error_m = final_estimate.map(|estimate| distance_m(estimate.position, source));

        Ok(MissionResult {
            steps,
            final_estimate,
            statistics: engine.get_search_statistics(),
            metrics: engine.metrics(),
            initial_error_m,
            final_error_m,
            closest_approach_m,
            closest_approach_step,
            first_homing_step,
        })
    }
}

impl MissionResult {
    pub fn summary(&self, config: &WorkflowConfig) -> MissionSummary {
        MissionSummary {
            steps: self.steps.len(),
            search_pattern: config.localiser.search_pattern.to_string(),
            final_estimate: self.final_estimate,
            initial_error_m: self.initial_error_m,
            final_error_m: self.final_error_m,
            closest_approach_m: self.closest_approach_m,
            closest_approach_step: self.closest_approach_step,
            first_homing_step: self.first_homing_step,
            max_ppm: self.statistics.max_ppm,
            metrics: self.metrics,
        }
    }
}
