use crate::vehicle::{FlightCommander, VehicleSnapshot};
use anyhow::Context;
use plumecore::clock::{Clock, SystemClock};
use plumecore::interface::{NavigationMode, Packet, SensorReading};
use plumecore::telemetry::LogManager;
use plumecore::SourceLocaliser;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// UAV-side end of the radio link.
///
/// The engine sits behind the one mutex every caller goes through; vehicle
/// state only arrives as published snapshots.
pub struct GroundLink<C: Clock = SystemClock> {
    engine: Mutex<SourceLocaliser<C>>,
    snapshots: watch::Receiver<VehicleSnapshot>,
    commander: Mutex<Box<dyn FlightCommander + Send>>,
    logger: LogManager,
}

#[derive(Serialize)]
struct LinkEvent<'a> {
    packet: &'a str,
    sent_at: f64,
    response: &'a str,
    mode: NavigationMode,
}

impl<C: Clock> GroundLink<C> {
    pub fn new(
        engine: SourceLocaliser<C>,
        snapshots: watch::Receiver<VehicleSnapshot>,
        commander: Box<dyn FlightCommander + Send>,
    ) -> Self {
        Self {
            engine: Mutex::new(engine),
            snapshots,
            commander: Mutex::new(commander),
            logger: LogManager::new(),
        }
    }

    /// Parses one inbound packet and produces the telemetry reply.
    pub fn handle(&self, raw: &str) -> anyhow::Result<Packet> {
        let packet: Packet = raw
            .parse()
            .with_context(|| format!("decoding packet {:?}", raw.trim()))?;

        let reply = match packet {
            Packet::Wind {
                direction_deg,
                speed_mps,
                ..
            } => self.on_wind(direction_deg, speed_mps)?,
            Packet::Init { ground_station, .. } => {
                let mut engine = self.lock_engine()?;
                engine.set_ground_station_location(ground_station.lat, ground_station.lon);
                let snapshot = self.latest_snapshot();
                Packet::Uav {
                    timestamp: engine.clock().now(),
                    position: snapshot.position,
                    co2_ppm: 0.0,
                }
            }
            Packet::Uav { .. } => {
                anyhow::bail!("UAV packets are sent by this side, not received")
            }
        };

        let response = reply.to_string();
        self.logger.event(
            &format!("RECV_{}", packet.kind()),
            &LinkEvent {
                packet: raw.trim(),
                sent_at: packet.timestamp(),
                response: &response,
                mode: self.mode()?,
            },
        );
        Ok(reply)
    }

    fn on_wind(&self, direction_deg: f64, speed_mps: f64) -> anyhow::Result<Packet> {
        let snapshot = self.latest_snapshot();
        let mut engine = self.lock_engine()?;
        engine.record_measurement(SensorReading::new(
            snapshot.position,
            snapshot.co2_ppm,
            direction_deg,
            speed_mps,
        ));

        if let Some(waypoint) = engine.next_waypoint() {
            let mut commander = self
                .commander
                .lock()
                .map_err(|_| anyhow::anyhow!("flight commander lock poisoned"))?;
            commander
                .send_waypoint(&waypoint)
                .context("dispatching waypoint")?;
        }

        Ok(Packet::Uav {
            timestamp: engine.clock().now(),
            position: snapshot.position,
            co2_ppm: snapshot.co2_ppm,
        })
    }

    fn lock_engine(&self) -> anyhow::Result<MutexGuard<'_, SourceLocaliser<C>>> {
        self.engine
            .lock()
            .map_err(|_| anyhow::anyhow!("localiser lock poisoned"))
    }

    pub fn mode(&self) -> anyhow::Result<NavigationMode> {
        Ok(self.lock_engine()?.navigation_mode())
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with_engine<T>(&self, f: impl FnOnce(&SourceLocaliser<C>) -> T) -> anyhow::Result<T> {
        let engine = self.lock_engine()?;
        Ok(f(&engine))
    }

    pub fn latest_snapshot(&self) -> VehicleSnapshot {
        *self.snapshots.borrow()
    }
}
