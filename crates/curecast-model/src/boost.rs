//! Gradient boosting over regression trees, for mean and quantile targets.
//!
//! One implementation serves all three sub-models of the ensemble; the
//! loss decides what the boosted prediction converges to:
//!
//! - **Squared error**: trees fit residuals `y − f`, the model tracks the
//!   conditional mean.
//! - **Quantile (pinball) at α**: trees are grown on the pinball
//!   pseudo-residuals (`α` above the prediction, `α − 1` at or below),
//!   then each leaf is refit to the α-quantile of the actual residuals in
//!   that leaf. The model tracks the conditional α-quantile, so the
//!   interval widens by itself where the data is noisy.
//!
//! Fitting is deterministic: no subsampling, and the base score plus every
//! tree depends only on the input order handed in by the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tree::{RegressionTree, TreeParams};

/// The objective a booster minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) enum Loss {
    /// Conditional mean via squared error.
    SquaredError,
    /// Conditional quantile at the given level via pinball loss.
    Quantile(f64),
}

/// Boosting hyperparameters shared by the three sub-models.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoostParams {
    pub n_trees: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

/// A fitted boosted-tree regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GradientBoost {
    loss: Loss,
    base: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoost {
    /// Fits a booster to index-aligned rows and targets.
    pub fn fit(
        rows: &[Vec<f64>],
        y: &[f64],
        loss: Loss,
        params: BoostParams,
    ) -> Self {
        let base = match loss {
            Loss::SquaredError => mean(y),
            Loss::Quantile(alpha) => quantile(y, alpha),
        };

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_leaf: params.min_samples_leaf,
        };

        let mut preds = vec![base; y.len()];
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let gradients: Vec<f64> = match loss {
                Loss::SquaredError => {
                    y.iter().zip(&preds).map(|(&y, &f)| y - f).collect()
                }
                Loss::Quantile(alpha) => y
                    .iter()
                    .zip(&preds)
                    .map(|(&y, &f)| if y > f { alpha } else { alpha - 1.0 })
                    .collect(),
            };

            let mut tree = RegressionTree::fit(rows, &gradients, tree_params);
            if let Loss::Quantile(alpha) = loss {
                refit_leaves_to_quantile(&mut tree, rows, y, &preds, alpha);
            }

            for (pred, row) in preds.iter_mut().zip(rows) {
                *pred += params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Self {
            loss,
            base,
            learning_rate: params.learning_rate,
            trees,
        }
    }

    /// Scores one schema-ordered row.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let boost: f64 =
            self.trees.iter().map(|tree| tree.predict(row)).sum();
        self.base + self.learning_rate * boost
    }

    #[cfg(test)]
    pub fn loss(&self) -> Loss {
        self.loss
    }
}

/// Replaces each leaf's pseudo-residual mean with the α-quantile of the
/// true residuals falling into that leaf. The tree structure (grown on
/// pinball gradients) stays; only leaf values change.
fn refit_leaves_to_quantile(
    tree: &mut RegressionTree,
    rows: &[Vec<f64>],
    y: &[f64],
    preds: &[f64],
    alpha: f64,
) {
    let mut residuals_by_leaf: HashMap<usize, Vec<f64>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        residuals_by_leaf
            .entry(tree.leaf_index(row))
            .or_default()
            .push(y[i] - preds[i]);
    }
    for (leaf, residuals) in residuals_by_leaf {
        tree.set_leaf_value(leaf, quantile(&residuals, alpha));
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts are far below 2^52"
    )]
    let n = values.len() as f64;
    values.iter().sum::<f64>() / n
}

/// Empirical quantile with linear interpolation between order statistics.
pub(crate) fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts are far below 2^52"
    )]
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "position is clamped to valid index bounds"
    )]
    let lo = position.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let fraction = position - position.floor();
    sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
}
