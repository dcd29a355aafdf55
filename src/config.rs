//src/config.rs

use crate::error::{RarefactionError, Result};

/// Default sampling rate: 20 data points (0.05, 0.10, ..., 1.0).
pub const DEFAULT_RATE: f64 = 0.05;

/// Upper bound on the number of sampling points (rate >= 1e-6).
///
/// Every read is matched against every sample, so the sample set is kept to
/// a size a single pass can afford.
pub const MAX_SAMPLE_POINTS: usize = 1_000_000;

/// Settings for one rarefaction run.
#[derive(Debug, Clone, PartialEq)]
pub struct RarefactionConfig {
    /// Step between consecutive sampling rates, in (0, 1].
    pub rate: f64,
    /// Seed for the inclusion draws. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RarefactionConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            seed: None,
        }
    }
}

impl RarefactionConfig {
    pub fn new(rate: f64) -> Self {
        Self { rate, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rate.is_finite() || self.rate <= 0.0 || self.rate > 1.0 {
            return Err(RarefactionError::InvalidRate(self.rate));
        }
        Ok(())
    }

    /// The sampling points `rate, 2*rate, ..., k*rate` with `k = floor(1/rate)`.
    ///
    /// Strictly increasing. `k*rate` is 1.0 only when the rate divides 1.
    pub fn sample_rates(&self) -> Result<Vec<f64>> {
        self.validate()?;
        let steps = (1.0 / self.rate).floor();
        if steps > MAX_SAMPLE_POINTS as f64 {
            return Err(RarefactionError::TooManySamples {
                rate: self.rate,
                limit: MAX_SAMPLE_POINTS,
            });
        }
        let points = steps as usize;
        Ok((1..=points).map(|i| i as f64 * self.rate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_gives_twenty_points() {
        let rates = RarefactionConfig::default().sample_rates().unwrap();
        assert_eq!(rates.len(), 20);
        assert!((rates[0] - 0.05).abs() < 1e-12);
        assert_eq!(*rates.last().unwrap(), 1.0);
    }

    #[test]
    fn test_rate_one_is_single_sample() {
        let rates = RarefactionConfig::new(1.0).sample_rates().unwrap();
        assert_eq!(rates, vec![1.0]);
    }

    #[test]
    fn test_half_rate() {
        let rates = RarefactionConfig::new(0.5).sample_rates().unwrap();
        assert_eq!(rates, vec![0.5, 1.0]);
    }

    #[test]
    fn test_tenth_rate_reaches_one() {
        let rates = RarefactionConfig::new(0.1).sample_rates().unwrap();
        assert_eq!(rates.len(), 10);
        assert!((rates[9] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_divisor_rate_stops_below_one() {
        let rates = RarefactionConfig::new(0.3).sample_rates().unwrap();
        assert_eq!(rates.len(), 3);
        assert!(rates[2] < 1.0);
    }

    #[test]
    fn test_rates_strictly_increasing() {
        let rates = RarefactionConfig::new(0.07).sample_rates().unwrap();
        assert!(rates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_near_divisor_rate_truncates_like_integer_division() {
        // 1 / 0.25000000000001 = 3.99999999999984...
        let rates = RarefactionConfig::new(0.25000000000001).sample_rates().unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[2], 3.0 * 0.25000000000001);
    }

    #[test]
    fn test_smallest_allowed_rate() {
        let rates = RarefactionConfig::new(1e-6).sample_rates().unwrap();
        assert!(rates.len() <= MAX_SAMPLE_POINTS);
        assert!(rates.len() >= MAX_SAMPLE_POINTS - 1);
    }

    #[test]
    fn test_tiny_rates_error_instead_of_allocating() {
        for rate in [1e-7, 1e-10, 1e-300, f64::MIN_POSITIVE] {
            match RarefactionConfig::new(rate).sample_rates() {
                Err(RarefactionError::TooManySamples { rate: r, limit }) => {
                    assert_eq!(r, rate);
                    assert_eq!(limit, MAX_SAMPLE_POINTS);
                }
                other => panic!("rate {rate}: expected TooManySamples, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_out_of_range_rates_rejected() {
        for rate in [0.0, -0.1, 1.0001, f64::NAN, f64::INFINITY] {
            let err = RarefactionConfig::new(rate).sample_rates().unwrap_err();
            assert!(matches!(err, RarefactionError::InvalidRate(_)));
        }
    }
}
