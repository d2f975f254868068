//! The three-regressor prediction-interval ensemble.
//!
//! `fit` trains one central-tendency booster (squared error) and two
//! quantile boosters (pinball loss at the low/high levels) on the same
//! training split, then scores the central booster on the held-out split
//! for diagnostics. `predict` projects a feature vector into the fit-time
//! schema order and returns the raw `(point, low, high)` triple; the three
//! sub-models are independent, so the triple is reported as scored with no
//! reordering (see `PredictionResult::clamped` for the display-side view).

use std::path::Path;

use curecast_schemas::{Dataset, Feature, FeatureVector, PredictionResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::boost::{BoostParams, GradientBoost, Loss};
use crate::error::{ModelError, ModelErrorKind};
use crate::rng::{XorShift64, derive_seed};

/// Fit configuration for [`StrengthEnsemble::fit`].
#[derive(Debug, Clone, Copy)]
pub struct EnsembleParams {
    /// Fraction of samples held out for the accuracy metrics.
    pub split_ratio: f64,
    /// RNG seed for the shuffle that precedes the split. Same seed and
    /// dataset give an identical partition, metrics, and predictions.
    pub seed: u64,
    /// Boosting rounds per sub-model.
    pub n_trees: usize,
    /// Shrinkage applied to each tree's contribution.
    pub learning_rate: f64,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Quantile level of the interval's lower bound.
    pub low_quantile: f64,
    /// Quantile level of the interval's upper bound.
    pub high_quantile: f64,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            split_ratio: 0.2,
            seed: 0x63_75_72_65_63_61_73_74, // "curecast"
            n_trees: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 5,
            low_quantile: 0.10,
            high_quantile: 0.90,
        }
    }
}

/// Held-out accuracy of the central booster, stored for reporting.
/// Both values are NaN when the holdout split is empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HoldoutMetrics {
    /// Variance explained (R²) on the holdout split.
    pub r_squared: f64,
    /// Mean absolute error (MPa) on the holdout split.
    pub mean_abs_error: f64,
    /// Samples used for training.
    pub train_len: usize,
    /// Samples held out for the metrics.
    pub holdout_len: usize,
}

/// A fitted ensemble: three boosters plus the fit-time feature schema.
///
/// Immutable after fitting; safe to share across threads for concurrent
/// what-if predictions. Serializes to JSON so a fitted model can be saved
/// and reloaded in later sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthEnsemble {
    schema: Vec<Feature>,
    central: GradientBoost,
    q_low: GradientBoost,
    q_high: GradientBoost,
    metrics: HoldoutMetrics,
}

impl StrengthEnsemble {
    /// Fits the ensemble on a dataset.
    ///
    /// Fails with a schema error (`ModelError::is_schema_error`) when the
    /// dataset is empty, has no feature columns, or has samples whose
    /// feature columns disagree with the first sample's.
    pub fn fit(
        dataset: &Dataset,
        params: &EnsembleParams,
    ) -> Result<Self, ModelError> {
        let samples = dataset.samples();
        if samples.is_empty() {
            return Err(ModelError::new(ModelErrorKind::EmptyDataset));
        }

        // The first sample defines the schema; every other sample must
        // carry exactly the same columns.
        let schema: Vec<Feature> =
            samples[0].features.iter().map(|(f, _)| f).collect();
        if schema.is_empty() {
            return Err(ModelError::new(ModelErrorKind::EmptyColumns));
        }

        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(samples.len());
        let mut strengths: Vec<f64> = Vec::with_capacity(samples.len());
        for (index, sample) in samples.iter().enumerate() {
            if sample.features.len() != schema.len() {
                return Err(ModelError::new(
                    ModelErrorKind::InconsistentColumns { sample: index },
                ));
            }
            let row: Vec<f64> = schema
                .iter()
                .map(|&feature| {
                    sample.features.get(feature).ok_or_else(|| {
                        ModelError::new(ModelErrorKind::InconsistentColumns {
                            sample: index,
                        })
                    })
                })
                .collect::<Result<_, _>>()?;
            rows.push(row);
            strengths.push(sample.strength);
        }

        let (train_idx, holdout_idx) =
            split_indices(rows.len(), params.split_ratio, params.seed);
        debug!(
            train = train_idx.len(),
            holdout = holdout_idx.len(),
            "partitioned dataset"
        );

        let train_rows: Vec<Vec<f64>> =
            train_idx.iter().map(|&i| rows[i].clone()).collect();
        let train_y: Vec<f64> =
            train_idx.iter().map(|&i| strengths[i]).collect();

        let boost_params = BoostParams {
            n_trees: params.n_trees,
            learning_rate: params.learning_rate,
            max_depth: params.max_depth,
            min_samples_leaf: params.min_samples_leaf,
        };

        let central = GradientBoost::fit(
            &train_rows,
            &train_y,
            Loss::SquaredError,
            boost_params,
        );
        let q_low = GradientBoost::fit(
            &train_rows,
            &train_y,
            Loss::Quantile(params.low_quantile),
            boost_params,
        );
        let q_high = GradientBoost::fit(
            &train_rows,
            &train_y,
            Loss::Quantile(params.high_quantile),
            boost_params,
        );

        let metrics = holdout_metrics(
            &central,
            &rows,
            &strengths,
            &holdout_idx,
            train_idx.len(),
        );
        info!(
            r_squared = metrics.r_squared,
            mean_abs_error = metrics.mean_abs_error,
            "fitted strength ensemble"
        );

        Ok(Self {
            schema,
            central,
            q_low,
            q_high,
            metrics,
        })
    }

    /// Predicts `(point, low, high)` for a feature vector.
    ///
    /// The vector is projected into the fit-time schema order, so callers
    /// may populate features in any order. Fails with a schema mismatch
    /// (`ModelError::is_schema_mismatch`) if any schema feature is absent;
    /// the ensemble remains valid for subsequent calls. Extra features in
    /// the vector are ignored.
    pub fn predict(
        &self,
        vector: &FeatureVector,
    ) -> Result<PredictionResult, ModelError> {
        let row: Vec<f64> = self
            .schema
            .iter()
            .map(|&feature| {
                vector.get(feature).ok_or_else(|| {
                    ModelError::new(ModelErrorKind::MissingFeature {
                        feature,
                    })
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(PredictionResult {
            point: self.central.predict(&row),
            low: self.q_low.predict(&row),
            high: self.q_high.predict(&row),
        })
    }

    /// The ordered feature schema captured at fit time.
    pub fn schema(&self) -> &[Feature] {
        &self.schema
    }

    /// Held-out accuracy metrics captured at fit time.
    pub fn metrics(&self) -> HoldoutMetrics {
        self.metrics
    }
}

/// Deterministic shuffle-and-split: returns `(train, holdout)` index sets.
///
/// The holdout size is `round(n * ratio)`, kept within `[0, n − 1]` so at
/// least one sample always remains for training. Datasets with a single
/// sample train on it and report NaN metrics.
fn split_indices(
    n: usize,
    split_ratio: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = XorShift64::new(derive_seed(seed, n));
    rng.shuffle(&mut indices);

    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "holdout size is clamped to valid bounds"
    )]
    let holdout_len = ((n as f64 * split_ratio.clamp(0.0, 1.0)).round()
        as usize)
        .min(n.saturating_sub(1));

    let holdout = indices[..holdout_len].to_vec();
    let train = indices[holdout_len..].to_vec();
    (train, holdout)
}

fn holdout_metrics(
    central: &GradientBoost,
    rows: &[Vec<f64>],
    strengths: &[f64],
    holdout_idx: &[usize],
    train_len: usize,
) -> HoldoutMetrics {
    if holdout_idx.is_empty() {
        return HoldoutMetrics {
            r_squared: f64::NAN,
            mean_abs_error: f64::NAN,
            train_len,
            holdout_len: 0,
        };
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts are far below 2^52"
    )]
    let n = holdout_idx.len() as f64;
    let mean_y: f64 =
        holdout_idx.iter().map(|&i| strengths[i]).sum::<f64>() / n;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut abs_err = 0.0;
    for &i in holdout_idx {
        let predicted = central.predict(&rows[i]);
        ss_res += (strengths[i] - predicted).powi(2);
        ss_tot += (strengths[i] - mean_y).powi(2);
        abs_err += (strengths[i] - predicted).abs();
    }

    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    HoldoutMetrics {
        r_squared,
        mean_abs_error: abs_err / n,
        train_len,
        holdout_len: holdout_idx.len(),
    }
}

/// Loads a fitted ensemble from a JSON file.
pub fn load_ensemble(path: &Path) -> std::io::Result<StrengthEnsemble> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Saves a fitted ensemble to a JSON file.
pub fn save_ensemble(
    path: &Path,
    ensemble: &StrengthEnsemble,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer(writer, ensemble)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
