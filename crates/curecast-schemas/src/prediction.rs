//! Prediction output: a point estimate with a two-sided interval.

use serde::{Deserialize, Serialize};

/// A strength prediction: point estimate plus a nominal 80% interval
/// (10th/90th conditional percentiles from the quantile sub-models).
///
/// The three values come from independently fitted regressors, so
/// `low <= point <= high` is the intended relationship but is not
/// guaranteed; the sub-models can disagree where training data was sparse.
/// The raw triple is reported as scored. Presentation layers that need an
/// ordered interval should use [`PredictionResult::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Central-tendency estimate (MPa).
    pub point: f64,
    /// Low-quantile estimate (MPa).
    pub low: f64,
    /// High-quantile estimate (MPa).
    pub high: f64,
}

impl PredictionResult {
    /// Returns a copy with the interval forced to bracket the point:
    /// `low = min(low, point)`, `high = max(high, point)`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            point: self.point,
            low: self.low.min(self.point),
            high: self.high.max(self.point),
        }
    }

    /// Returns `true` if `low <= point <= high` already holds.
    pub fn is_ordered(self) -> bool {
        self.low <= self.point && self.point <= self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_restores_ordering() {
        let inverted = PredictionResult {
            point: 45.0,
            low: 47.0,
            high: 44.0,
        };
        assert!(!inverted.is_ordered());

        let clamped = inverted.clamped();
        assert!(clamped.is_ordered());
        assert_eq!(clamped.point, 45.0);
        assert_eq!(clamped.low, 45.0);
        assert_eq!(clamped.high, 45.0);
    }

    #[test]
    fn test_clamped_keeps_ordered_interval() {
        let ordered = PredictionResult {
            point: 45.0,
            low: 42.0,
            high: 49.0,
        };
        assert!(ordered.is_ordered());
        assert_eq!(ordered.clamped(), ordered);
    }
}
