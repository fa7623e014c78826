//! Synthetic signal used by the local producer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of sample values as a function of time.
pub trait Waveform: Send {
    /// Value for a sample taken at `timestamp_ms`. Must be finite.
    fn value_at(&mut self, timestamp_ms: i64) -> f64;
}

/// Slow sine around a baseline plus bounded uniform noise, rounded to two decimals.
///
/// `value = baseline + amplitude * sin(t / period_ms) + (u - 0.5) * noise`
#[derive(Debug, Clone)]
pub struct NoisySine {
    pub baseline: f64,
    pub amplitude: f64,
    pub period_ms: f64,
    pub noise: f64,
    rng: StdRng,
}

impl NoisySine {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            baseline: 50.0,
            amplitude: 8.0,
            period_ms: 3500.0,
            noise: 6.0,
            rng,
        }
    }
}

impl Default for NoisySine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Waveform for NoisySine {
    fn value_at(&mut self, timestamp_ms: i64) -> f64 {
        let t = timestamp_ms as f64;
        let u: f64 = self.rng.random();
        let y = self.baseline + self.amplitude * (t / self.period_ms).sin() + (u - 0.5) * self.noise;
        (y * 100.0).round() / 100.0
    }
}

impl<F> Waveform for F
where
    F: FnMut(i64) -> f64 + Send,
{
    fn value_at(&mut self, timestamp_ms: i64) -> f64 {
        self(timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_within_bounds() {
        let mut w = NoisySine::new(Some(7));
        for i in 0..1_000 {
            let v = w.value_at(1_700_000_000_000 + i * 500);
            assert!(v.is_finite());
            assert!((50.0 - 8.0 - 3.0..=50.0 + 8.0 + 3.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_series() {
        let mut a = NoisySine::new(Some(42));
        let mut b = NoisySine::new(Some(42));
        for t in (0..10_000).step_by(500) {
            assert_eq!(a.value_at(t), b.value_at(t));
        }
    }
}
