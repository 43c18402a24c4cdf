use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source used to stamp measurements, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock UNIX seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Externally driven clock. Clones share the same time value, so a driver
/// can keep one handle and advance the engine's clock through it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn starting_at(seconds: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(seconds.to_bits())),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(10.0);
        let handle = clock.clone();
        handle.advance(2.5);
        assert_eq!(clock.now(), 12.5);
        clock.set(0.0);
        assert_eq!(handle.now(), 0.0);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now() > 1_600_000_000.0);
    }
}
