//! Prediction-interval ensemble for 28-day concrete strength.
//!
//! This crate provides the model half of the curecast core: a trio of
//! independently fitted boosted-tree regressors behind a single
//! fit/predict contract. The central regressor estimates the conditional
//! mean; the two quantile regressors estimate the 10th and 90th
//! conditional percentiles, giving a nominal 80% prediction interval
//! whose width adapts to local noise in the feature space.
//!
//! ## Contract
//!
//! ```text
//! fit(dataset, params)  -> StrengthEnsemble   (schema + 3 boosters + metrics)
//! predict(vector)       -> (point, low, high) (raw, no reordering)
//! ```
//!
//! Fitting is deterministic for a given seed: the shuffle-and-split, tree
//! growth, and leaf values involve no platform-dependent randomness, so
//! two fits of the same dataset agree value-for-value.

mod boost;
mod ensemble;
mod error;
pub mod rng;
mod tree;

#[doc(inline)]
pub use ensemble::*;
#[doc(inline)]
pub use error::ModelError;
