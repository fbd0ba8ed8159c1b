//! Confidence estimation for heuristic results.
//!
//! The value is a presentation heuristic, not a calibrated probability: lexicons
//! hold a couple dozen terms and real emails rarely match more than a handful,
//! so the raw ratio is lifted by a fixed floor, jittered, and clamped into a band.

use rand::Rng;

/// Added to every raw ratio
const CONFIDENCE_FLOOR: f64 = 0.6;
/// Jitter is drawn from `[0, JITTER_SPAN)`
const JITTER_SPAN: f64 = 0.2;
/// Inclusive bounds of every heuristic confidence
pub const MIN_CONFIDENCE: f64 = 0.65;
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Maps match counts to a bounded confidence value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceEstimator {
    floor: f64,
    jitter_span: f64,
    min: f64,
    max: f64,
}

impl Default for ConfidenceEstimator {
    fn default() -> Self {
        Self {
            floor: CONFIDENCE_FLOOR,
            jitter_span: JITTER_SPAN,
            min: MIN_CONFIDENCE,
            max: MAX_CONFIDENCE,
        }
    }
}

impl ConfidenceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confidence for `dominant` matches out of a lexicon of `lexicon_size` terms,
    /// with jitter drawn from `rng`.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        dominant: usize,
        lexicon_size: usize,
        rng: &mut R,
    ) -> f64 {
        let jitter = rng.gen_range(0.0..self.jitter_span);
        self.estimate_with_jitter(dominant, lexicon_size, jitter)
    }

    /// Deterministic core of [`estimate`](Self::estimate).
    pub fn estimate_with_jitter(&self, dominant: usize, lexicon_size: usize, jitter: f64) -> f64 {
        let ratio = if lexicon_size == 0 {
            0.0
        } else {
            dominant as f64 / lexicon_size as f64
        };
        let raw = ratio + jitter + self.floor;
        raw.clamp(self.min, self.max)
    }

    /// Inclusive band every estimate falls into.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_matches_stays_in_low_band() {
        let estimator = ConfidenceEstimator::new();
        assert_eq!(estimator.estimate_with_jitter(0, 22, 0.0), MIN_CONFIDENCE);
        let top = estimator.estimate_with_jitter(0, 22, 0.1999);
        assert!(top < 0.8);
    }

    #[test]
    fn test_clamped_at_upper_bound() {
        let estimator = ConfidenceEstimator::new();
        assert_eq!(estimator.estimate_with_jitter(22, 22, 0.19), MAX_CONFIDENCE);
        assert_eq!(estimator.estimate_with_jitter(500, 22, 0.0), MAX_CONFIDENCE);
    }

    #[test]
    fn test_ratio_contributes_linearly() {
        let estimator = ConfidenceEstimator::new();
        let value = estimator.estimate_with_jitter(4, 20, 0.05);
        assert!((value - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_empty_lexicon_does_not_divide_by_zero() {
        let estimator = ConfidenceEstimator::new();
        assert_eq!(estimator.estimate_with_jitter(3, 0, 0.0), MIN_CONFIDENCE);
    }

    #[test]
    fn test_random_draws_always_within_bounds() {
        let estimator = ConfidenceEstimator::new();
        let mut rng = StdRng::seed_from_u64(7);
        for dominant in 0..30 {
            for _ in 0..200 {
                let value = estimator.estimate(dominant, 22, &mut rng);
                assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&value));
            }
        }
    }
}
