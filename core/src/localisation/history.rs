use crate::interface::Measurement;
use std::collections::VecDeque;

/// Insertion-ordered measurements bounded by a time-based retention window.
#[derive(Debug, Clone)]
pub struct MeasurementHistory {
    entries: VecDeque<Measurement>,
    retention_window_seconds: f64,
}

impl MeasurementHistory {
    pub fn with_retention(retention_window_seconds: f64) -> Self {
        Self {
            entries: VecDeque::new(),
            retention_window_seconds,
        }
    }

    /// Appends `measurement` and evicts every entry stamped at or before
    /// `measurement.timestamp - retention`. Returns how many were evicted.
    pub fn push(&mut self, measurement: Measurement) -> usize {
        let cutoff = measurement.timestamp - self.retention_window_seconds;
        self.entries.push_back(measurement);

        let before = self.entries.len();
        self.entries.retain(|entry| entry.timestamp > cutoff);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Measurement> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&Measurement> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> + '_ {
        self.entries.iter()
    }

    /// The last `count` entries (or all of them), oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Measurement> + '_ {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{Position, SensorReading};

    fn sample(timestamp: f64, ppm: f64) -> Measurement {
        Measurement::new(
            timestamp,
            SensorReading::new(Position::new(0.0, 0.0, 50.0), ppm, 270.0, 3.0),
        )
    }

    #[test]
    fn evicts_entries_outside_retention() {
        let mut history = MeasurementHistory::with_retention(600.0);
        for step in 0..8 {
            history.push(sample(step as f64 * 100.0, 400.0));
        }
        // newest = 700, so 0 and 100 (<= 100) are gone
        assert_eq!(history.len(), 6);
        assert_eq!(history.oldest().unwrap().timestamp, 200.0);
        assert_eq!(history.latest().unwrap().timestamp, 700.0);
    }

    #[test]
    fn entry_exactly_at_cutoff_is_evicted() {
        let mut history = MeasurementHistory::with_retention(600.0);
        history.push(sample(0.0, 400.0));
        let evicted = history.push(sample(600.0, 400.0));
        assert_eq!(evicted, 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn never_holds_entries_older_than_window() {
        let mut history = MeasurementHistory::with_retention(600.0);
        let stamps = [0.0, 50.0, 400.0, 399.0, 900.0, 1001.0, 1002.0, 2000.0];
        for stamp in stamps {
            history.push(sample(stamp, 400.0));
            let newest = history.latest().unwrap().timestamp;
            assert!(history.iter().all(|entry| entry.timestamp > newest - 600.0));
        }
    }

    #[test]
    fn recent_returns_tail_in_insertion_order() {
        let mut history = MeasurementHistory::with_retention(600.0);
        for step in 0..5 {
            history.push(sample(step as f64, 400.0 + step as f64));
        }
        let tail: Vec<f64> = history.recent(3).map(|m| m.concentration_ppm).collect();
        assert_eq!(tail, vec![402.0, 403.0, 404.0]);
        assert_eq!(history.recent(10).count(), 5);
    }
}
