use crate::generator::plume::PlumeModel;
use plumecore::geo::{destination, distance_m, initial_bearing};
use plumecore::interface::{Position, Waypoint};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Receives waypoints produced by the localisation engine.
pub trait FlightCommander {
    fn send_waypoint(&mut self, waypoint: &Waypoint) -> anyhow::Result<()>;
}

/// Latest onboard state, published as an immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub timestamp: f64,
    pub position: Position,
    pub co2_ppm: f64,
}

/// Vehicle that teleports to each commanded waypoint (or along a capped leg
/// toward it) and samples the synthetic plume where it lands.
pub struct SimulatedVehicle {
    position: Position,
    plume: PlumeModel,
    max_leg_m: Option<f64>,
    last_timestamp: f64,
    snapshots: watch::Sender<VehicleSnapshot>,
}

impl SimulatedVehicle {
    pub fn new(
        mut plume: PlumeModel,
        max_leg_m: Option<f64>,
        timestamp: f64,
    ) -> (Self, watch::Receiver<VehicleSnapshot>) {
        let position = plume.config().start();
        let co2_ppm = plume.concentration_at(position.horizontal());
        let (snapshots, receiver) = watch::channel(VehicleSnapshot {
            timestamp,
            position,
            co2_ppm,
        });

        (
            Self {
                position,
                plume,
                max_leg_m,
                last_timestamp: timestamp,
                snapshots,
            },
            receiver,
        )
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Takes a fresh CO₂ reading at the current position and publishes it.
    pub fn sense(&mut self, timestamp: f64) -> VehicleSnapshot {
        self.last_timestamp = timestamp;
        let snapshot = VehicleSnapshot {
            timestamp,
            position: self.position,
            co2_ppm: self.plume.concentration_at(self.position.horizontal()),
        };
        self.snapshots.send_replace(snapshot);
        snapshot
    }

    fn leg_end(&self, waypoint: &Waypoint) -> Position {
        let from = self.position.horizontal();
        let to = waypoint.horizontal();
        match self.max_leg_m {
            Some(max_leg) if distance_m(from, to) > max_leg => {
                let capped = destination(from, initial_bearing(from, to), max_leg);
                Position::new(capped.lat, capped.lon, waypoint.alt)
            }
            _ => waypoint.position(),
        }
    }
}

impl FlightCommander for SimulatedVehicle {
    fn send_waypoint(&mut self, waypoint: &Waypoint) -> anyhow::Result<()> {
        if !waypoint.horizontal().is_finite() || !waypoint.alt.is_finite() {
            anyhow::bail!("refusing non-finite waypoint {:?}", waypoint);
        }
        self.position = self.leg_end(waypoint);
        log::debug!(
            "vehicle at {:.6}, {:.6}, {:.1} m",
            self.position.lat,
            self.position.lon,
            self.position.alt
        );
        self.sense(self.last_timestamp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::plume::PlumeConfig;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flying_publishes_new_snapshot() {
        let (mut vehicle, receiver) =
            SimulatedVehicle::new(PlumeModel::new(PlumeConfig::default()), None, 5.0);
        let target = Waypoint::new(-31.9500, 115.8550, 60.0);

        vehicle.send_waypoint(&target).unwrap();
        let snapshot = *receiver.borrow();
        assert_eq!(snapshot.position, target.position());
        assert_eq!(snapshot.timestamp, 5.0);
        assert_eq!(vehicle.position(), target.position());
    }

    #[test]
    fn long_legs_are_capped() {
        let (mut vehicle, _receiver) =
            SimulatedVehicle::new(PlumeModel::new(PlumeConfig::default()), Some(20.0), 0.0);
        let start = vehicle.position().horizontal();
        let target = Waypoint::new(start.lat + 0.01, start.lon, 50.0);

        vehicle.send_waypoint(&target).unwrap();
        let flown = distance_m(start, vehicle.position().horizontal());
        assert_abs_diff_eq!(flown, 20.0, epsilon = 1e-6);
        assert!(vehicle.position().lat > start.lat);
    }

    #[test]
    fn non_finite_waypoint_is_rejected() {
        let (mut vehicle, _receiver) =
            SimulatedVehicle::new(PlumeModel::new(PlumeConfig::default()), None, 0.0);
        let before = vehicle.position();
        assert!(vehicle
            .send_waypoint(&Waypoint::new(f64::NAN, 0.0, 50.0))
            .is_err());
        assert_eq!(vehicle.position(), before);
    }
}
