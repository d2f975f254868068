//! Range validation and pass/fail classification.
//!
//! Two advisory checks sit between the model and the presentation layer:
//!
//! - [`in_range_flags`] marks which input features fall inside their
//!   configured valid ranges. Out-of-range inputs still go to prediction;
//!   the flags only tell the caller what to surface.
//! - [`classify`] grades a point estimate against the specification
//!   minimum, with a warning band at 90% of the threshold.

use std::backtrace::Backtrace;
use std::fmt;

use curecast_schemas::{Feature, FeatureBounds, FeatureVector};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error raised when a feature in the vector has no configured bound.
///
/// This signals a configuration inconsistency upstream (the bounds table
/// and the input surface disagree), not a user input error.
#[derive(Debug)]
pub struct BoundsError {
    feature: Feature,
    backtrace: Backtrace,
}

impl BoundsError {
    fn new(feature: Feature) -> Self {
        Self {
            feature,
            backtrace: Backtrace::capture(),
        }
    }

    /// The feature that had no bound entry.
    pub fn feature(&self) -> Feature {
        self.feature
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no valid range configured for feature {}", self.feature)
    }
}

impl std::error::Error for BoundsError {}

/// Checks every populated feature against its inclusive valid range.
///
/// Returns `feature -> true` iff `lo <= value <= hi`, in the vector's
/// order. Fails if a populated feature has no entry in `bounds`; the
/// caller must guarantee configuration alignment upstream. Purely
/// advisory, no side effects.
pub fn in_range_flags(
    vector: &FeatureVector,
    bounds: &FeatureBounds,
) -> Result<IndexMap<Feature, bool>, BoundsError> {
    vector
        .iter()
        .map(|(feature, value)| {
            let (lo, hi) = bounds
                .get(feature)
                .ok_or_else(|| BoundsError::new(feature))?;
            Ok((feature, lo <= value && value <= hi))
        })
        .collect()
}

/// Tri-state grade of a prediction against the spec minimum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Status {
    /// Point estimate meets the spec minimum.
    Pass,
    /// Point estimate is below spec but within 90% of it.
    NearFail,
    /// Point estimate is below 90% of the spec minimum.
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Pass => "Pass",
            Status::NearFail => "Near Fail",
            Status::Fail => "Fail",
        })
    }
}

/// Grades a point estimate against the specification minimum.
///
/// Total over all finite reals. A non-positive `spec_min` is accepted but
/// makes the near-fail band meaningless (every value at or above
/// `spec_min` passes); callers are expected to configure a positive
/// threshold.
pub fn classify(point: f64, spec_min: f64) -> Status {
    if point >= spec_min {
        Status::Pass
    } else if point >= spec_min * 0.9 {
        Status::NearFail
    } else {
        Status::Fail
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_status_boundaries() {
        // Spec-minimum 42.5: the canonical EN 197-1 strength class.
        assert_eq!(classify(42.5, 42.5), Status::Pass);
        assert_eq!(classify(50.0, 42.5), Status::Pass);
        assert_eq!(classify(38.3, 42.5), Status::NearFail);
        assert_eq!(classify(38.2, 42.5), Status::Fail);
        assert_eq!(classify(10.0, 42.5), Status::Fail);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::NearFail.to_string(), "Near Fail");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = FeatureBounds::default();
        let (lo, hi) = bounds.get(Feature::Gypsum).unwrap();

        let mut vector = FeatureVector::new();
        vector.set(Feature::Gypsum, lo);
        let flags = in_range_flags(&vector, &bounds).unwrap();
        assert!(flags[&Feature::Gypsum]);

        vector.set(Feature::Gypsum, hi);
        let flags = in_range_flags(&vector, &bounds).unwrap();
        assert!(flags[&Feature::Gypsum]);
    }

    #[test]
    fn test_out_of_range_is_flagged_not_rejected() {
        let bounds = FeatureBounds::default();
        let mut vector = FeatureVector::new();
        vector.set(Feature::WaterCement, 0.95);
        vector.set(Feature::Temperature, 30.0);

        let flags = in_range_flags(&vector, &bounds).unwrap();
        assert!(!flags[&Feature::WaterCement]);
        assert!(flags[&Feature::Temperature]);
    }

    #[test]
    fn test_missing_bound_is_error() {
        // A bounds table missing MixTime simulates a stale config.
        let mut bounds = FeatureBounds::empty();
        for (feature, (lo, hi)) in FeatureBounds::default().iter() {
            if feature != Feature::MixTime {
                bounds.set(feature, lo, hi);
            }
        }

        let mut vector = FeatureVector::new();
        vector.set(Feature::MixTime, 120.0);

        let err = in_range_flags(&vector, &bounds).unwrap_err();
        assert_eq!(err.feature(), Feature::MixTime);
        assert!(err.to_string().contains("MixTime"));
    }

    #[test]
    fn test_flags_preserve_vector_order() {
        let bounds = FeatureBounds::default();
        let mut vector = FeatureVector::new();
        vector.set(Feature::MixTime, 120.0);
        vector.set(Feature::C3S, 55.0);

        let flags = in_range_flags(&vector, &bounds).unwrap();
        let order: Vec<Feature> = flags.keys().copied().collect();
        assert_eq!(order, vec![Feature::MixTime, Feature::C3S]);
    }

    proptest! {
        /// For any value and any feature, the flag is true exactly when
        /// the value lies inside the inclusive default range.
        #[test]
        fn prop_flag_matches_range(
            index in 0usize..Feature::ALL.len(),
            value in -1e6f64..1e6f64,
        ) {
            let feature = Feature::ALL[index];
            let bounds = FeatureBounds::default();
            let (lo, hi) = bounds.get(feature).unwrap();

            let mut vector = FeatureVector::new();
            vector.set(feature, value);
            let flags = in_range_flags(&vector, &bounds).unwrap();

            prop_assert_eq!(flags[&feature], lo <= value && value <= hi);
        }

        /// classify is total and consistent with its thresholds.
        #[test]
        fn prop_classify_total(
            point in -1e3f64..1e3f64,
            spec_min in 1e-3f64..1e3f64,
        ) {
            let status = classify(point, spec_min);
            let expected = if point >= spec_min {
                Status::Pass
            } else if point >= spec_min * 0.9 {
                Status::NearFail
            } else {
                Status::Fail
            };
            prop_assert_eq!(status, expected);
        }
    }
}
