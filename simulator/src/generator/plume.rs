use plumecore::geo::{distance_m, initial_bearing, normalize_bearing, upwind_bearing};
use plumecore::interface::{GeoPoint, Position};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for the synthetic CO₂ plume and the wind driving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumeConfig {
    pub source_lat: f64,
    pub source_lon: f64,
    pub ambient_ppm: f64,
    /// Excess over ambient right at the source.
    pub peak_excess_ppm: f64,
    /// Along-axis e-folding distance of the excess.
    pub decay_length_m: f64,
    /// Angular half-width of the plume cone.
    pub spread_deg: f64,
    pub wind_direction_deg: f64,
    pub wind_speed_mps: f64,
    pub noise_ppm: f64,
    pub seed: u64,
    pub start_lat: f64,
    pub start_lon: f64,
    pub start_alt: f64,
}

impl Default for PlumeConfig {
    fn default() -> Self {
        Self {
            source_lat: -31.9505,
            source_lon: 115.8560,
            ambient_ppm: 400.0,
            peak_excess_ppm: 400.0,
            decay_length_m: 150.0,
            spread_deg: 25.0,
            wind_direction_deg: 270.0,
            wind_speed_mps: 3.5,
            noise_ppm: 2.0,
            seed: 7,
            start_lat: -31.9505,
            start_lon: 115.854_73,
            start_alt: 50.0,
        }
    }
}

impl PlumeConfig {
    pub fn source(&self) -> GeoPoint {
        GeoPoint::new(self.source_lat, self.source_lon)
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_lat, self.start_lon, self.start_alt)
    }

    /// Bearing from the source along which the gas spreads. It is the
    /// reverse of the back-track bearing the estimator applies to a sample,
    /// so the synthetic field and the estimator agree on orientation.
    pub fn plume_axis_deg(&self) -> f64 {
        normalize_bearing(upwind_bearing(self.wind_direction_deg) + 180.0)
    }
}

/// Seeded concentration field: an exponential decay along the plume axis
/// with a Gaussian fall-off across it.
pub struct PlumeModel {
    config: PlumeConfig,
    rng: StdRng,
}

impl PlumeModel {
    pub fn new(config: PlumeConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &PlumeConfig {
        &self.config
    }

    /// Noise-free excess concentration over ambient at `point`.
    pub fn excess_at(&self, point: GeoPoint) -> f64 {
        let source = self.config.source();
        let distance = distance_m(source, point);
        if distance < 1.0 {
            return self.config.peak_excess_ppm;
        }

        let bearing = initial_bearing(source, point);
        let mut offset = normalize_bearing(bearing - self.config.plume_axis_deg());
        if offset > 180.0 {
            offset = 360.0 - offset;
        }

        let spread = self.config.spread_deg.max(f64::EPSILON);
        let lateral = (-(offset / spread).powi(2)).exp();
        let along = (-distance / self.config.decay_length_m.max(1.0)).exp();
        self.config.peak_excess_ppm * lateral * along
    }

    /// Sensor reading at `point`, including seeded uniform noise.
    pub fn concentration_at(&mut self, point: GeoPoint) -> f64 {
        let noise = if self.config.noise_ppm > 0.0 {
            self.rng
                .gen_range(-self.config.noise_ppm..self.config.noise_ppm)
        } else {
            0.0
        };
        (self.config.ambient_ppm + self.excess_at(point) + noise).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumecore::geo::destination;

    #[test]
    fn excess_peaks_at_source_and_decays_along_axis() {
        let model = PlumeModel::new(PlumeConfig::default());
        let source = model.config().source();
        let axis = model.config().plume_axis_deg();

        let near = model.excess_at(destination(source, axis, 20.0));
        let far = model.excess_at(destination(source, axis, 200.0));
        assert_eq!(model.excess_at(source), 400.0);
        assert!(near > far);
        assert!(far > 10.0);
    }

    #[test]
    fn little_gas_off_axis() {
        let model = PlumeModel::new(PlumeConfig::default());
        let source = model.config().source();
        let axis = model.config().plume_axis_deg();

        let behind = model.excess_at(destination(source, axis + 180.0, 50.0));
        let beside = model.excess_at(destination(source, axis + 90.0, 50.0));
        assert!(behind < 1e-6);
        assert!(beside < 1e-2);
    }

    #[test]
    fn default_start_sits_inside_the_plume() {
        let config = PlumeConfig::default();
        let model = PlumeModel::new(config.clone());
        assert!(model.excess_at(config.start().horizontal()) > 100.0);
    }

    #[test]
    fn seeded_noise_is_repeatable() {
        let point = GeoPoint::new(-31.9505, 115.855);
        let mut first = PlumeModel::new(PlumeConfig::default());
        let mut second = PlumeModel::new(PlumeConfig::default());
        for _ in 0..5 {
            assert_eq!(first.concentration_at(point), second.concentration_at(point));
        }
    }

    #[test]
    fn noiseless_reading_is_ambient_plus_excess() {
        let config = PlumeConfig {
            noise_ppm: 0.0,
            ..Default::default()
        };
        let mut model = PlumeModel::new(config.clone());
        let source = config.source();
        assert_eq!(model.concentration_at(source), 800.0);
    }
}
