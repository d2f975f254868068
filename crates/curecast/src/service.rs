//! The per-session prediction context.
//!
//! `PredictionService` bundles the one fitted ensemble, the bounds table,
//! and the spec minimum into an explicitly constructed object that is
//! passed to callers, replacing any notion of process-global model state.
//! It is immutable after construction, so concurrent what-if assessments
//! can share one instance freely.

use std::fmt;

use curecast_assess::{BoundsError, Status, classify, in_range_flags};
use curecast_model::{
    EnsembleParams, HoldoutMetrics, ModelError, StrengthEnsemble,
};
use curecast_schemas::{
    Dataset, Feature, FeatureBounds, FeatureVector, PredictionResult,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Everything the presentation layer needs about one evaluated mix.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    /// Raw `(point, low, high)` prediction.
    pub prediction: PredictionResult,
    /// Per-feature in-range flags, in the vector's order.
    pub flags: IndexMap<Feature, bool>,
    /// Grade of the point estimate against the spec minimum.
    pub status: Status,
}

/// Error from [`PredictionService::assess`]: either sub-check can fail.
#[derive(Debug)]
pub enum ServiceError {
    /// The ensemble rejected the vector (schema mismatch).
    Model(ModelError),
    /// The bounds table had no entry for a populated feature.
    Bounds(BoundsError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Model(err) => write!(f, "prediction failed: {err}"),
            ServiceError::Bounds(err) => {
                write!(f, "range validation failed: {err}")
            }
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Model(err) => Some(err),
            ServiceError::Bounds(err) => Some(err),
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        ServiceError::Model(err)
    }
}

impl From<BoundsError> for ServiceError {
    fn from(err: BoundsError) -> Self {
        ServiceError::Bounds(err)
    }
}

/// One fitted ensemble plus the session's validation configuration.
#[derive(Debug, Clone)]
pub struct PredictionService {
    ensemble: StrengthEnsemble,
    bounds: FeatureBounds,
    spec_min: f64,
}

impl PredictionService {
    /// Wraps an already-fitted ensemble.
    pub fn new(
        ensemble: StrengthEnsemble,
        bounds: FeatureBounds,
        spec_min: f64,
    ) -> Self {
        Self {
            ensemble,
            bounds,
            spec_min,
        }
    }

    /// Fits an ensemble on the dataset and wraps it. Convenience for
    /// startup paths that fit fresh rather than loading a saved model.
    pub fn fit(
        dataset: &Dataset,
        params: &EnsembleParams,
        bounds: FeatureBounds,
        spec_min: f64,
    ) -> Result<Self, ModelError> {
        let ensemble = StrengthEnsemble::fit(dataset, params)?;
        Ok(Self::new(ensemble, bounds, spec_min))
    }

    /// Runs the full check on one feature vector: prediction, range
    /// flags, and status. Out-of-range inputs are still predicted; the
    /// flags are advisory.
    pub fn assess(
        &self,
        vector: &FeatureVector,
    ) -> Result<Assessment, ServiceError> {
        let prediction = self.ensemble.predict(vector)?;
        let flags = in_range_flags(vector, &self.bounds)?;
        let status = classify(prediction.point, self.spec_min);

        Ok(Assessment {
            prediction,
            flags,
            status,
        })
    }

    /// The fitted ensemble backing this session.
    pub fn ensemble(&self) -> &StrengthEnsemble {
        &self.ensemble
    }

    /// The session's bounds table.
    pub fn bounds(&self) -> &FeatureBounds {
        &self.bounds
    }

    /// The spec minimum predictions are judged against.
    pub fn spec_min(&self) -> f64 {
        self.spec_min
    }

    /// Held-out metrics of the backing ensemble.
    pub fn metrics(&self) -> HoldoutMetrics {
        self.ensemble.metrics()
    }
}
