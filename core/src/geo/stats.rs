use serde::{Deserialize, Serialize};

/// Min/max/mean over the finite values of a set of concentration readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ConcentrationStats {
    /// NaN and infinite values are skipped for every field, `count` included.
    /// Returns `None` when no finite value remains.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for value in values.into_iter().filter(|v| v.is_finite()) {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            count,
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(ConcentrationStats::from_values(Vec::new()), None);
    }

    #[test]
    fn summarises_readings() {
        let stats = ConcentrationStats::from_values([415.0, 445.0, 425.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 415.0);
        assert_eq!(stats.max, 445.0);
        assert_abs_diff_eq!(stats.mean, 1285.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn non_finite_readings_are_skipped_everywhere() {
        let stats =
            ConcentrationStats::from_values([420.0, f64::NAN, 430.0, f64::INFINITY]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 420.0);
        assert_eq!(stats.max, 430.0);
        assert_abs_diff_eq!(stats.mean, 425.0, epsilon = 1e-9);
    }

    #[test]
    fn only_non_finite_readings_yield_none() {
        assert_eq!(ConcentrationStats::from_values([f64::NAN]), None);
    }
}
