//! Synthetic mix-design dataset generator.
//!
//! Stands in for plant historian data during development and testing:
//! features are drawn uniformly from the domain bounds table, and the
//! 28-day strength is a known smooth response: a linear base, a few
//! curvature terms (water/cement penalty, fineness and curing optima, a
//! C3S–gypsum interaction), and Gaussian noise:
//!
//! ```text
//! strength = base(features) + nonlinear(features) + N(0, 2)
//! ```
//!
//! The response is deliberately heteroscedasticity-free; the quantile
//! models' interval width over this data reflects the σ = 2 noise floor.
//! Generation is deterministic for a given seed.

use curecast_model::rng::{XorShift64, derive_seed};
use curecast_schemas::{
    Dataset, Feature, FeatureBounds, FeatureVector, TrainingSample,
};

/// Default dataset size.
pub const DEFAULT_SAMPLES: usize = 800;

/// Default generation seed.
pub const DEFAULT_SEED: u64 = 42;

/// Standard deviation of the additive strength noise (MPa).
const NOISE_SIGMA: f64 = 2.0;

/// Generates `n` samples over the default domain bounds.
pub fn generate(n: usize, seed: u64) -> Dataset {
    generate_with_bounds(n, seed, &FeatureBounds::default())
}

/// Generates `n` samples drawn uniformly from the given bounds.
pub fn generate_with_bounds(
    n: usize,
    seed: u64,
    bounds: &FeatureBounds,
) -> Dataset {
    let mut rng = XorShift64::new(derive_seed(seed, n));

    (0..n)
        .map(|_| {
            let features: FeatureVector = Feature::ALL
                .iter()
                .map(|&feature| {
                    // Features without a configured bound default to the
                    // domain table so the response stays well-defined.
                    let (lo, hi) = bounds
                        .get(feature)
                        .or_else(|| {
                            FeatureBounds::default().get(feature)
                        })
                        .unwrap_or((0.0, 1.0));
                    (feature, rng.next_range(lo, hi))
                })
                .collect();

            let strength =
                strength_response(&features) + gaussian(&mut rng, NOISE_SIGMA);
            TrainingSample { features, strength }
        })
        .collect()
}

/// The noise-free strength response underlying the generated data.
///
/// Exposed so tests can compare fitted predictions against ground truth.
/// Features absent from the vector contribute zero.
pub fn strength_response(features: &FeatureVector) -> f64 {
    let value = |f: Feature| features.get(f).unwrap_or(0.0);

    let c3s = value(Feature::C3S);
    let c2s = value(Feature::C2S);
    let c3a = value(Feature::C3A);
    let c4af = value(Feature::C4AF);
    let gypsum = value(Feature::Gypsum);
    let fineness = value(Feature::Fineness);
    let wc = value(Feature::WaterCement);
    let temperature = value(Feature::Temperature);
    let humidity = value(Feature::Humidity);
    let mix_time = value(Feature::MixTime);

    let base = 0.48 * c3s - 25.0 * wc + 0.007 * fineness + 0.22 * gypsum
        + 0.08 * c3a
        - 0.05 * humidity
        + 0.10 * temperature
        + 0.005 * mix_time
        - 0.04 * c4af
        + 0.03 * c2s;

    let nonlinear = -0.12 * wc.powi(2) * 100.0
        + 0.000_002 * (fineness - 3200.0).powi(2)
        - 0.0008 * (humidity - 60.0).powi(2)
        + 0.0004 * (temperature - 30.0).powi(2)
        + 0.03 * (c3s * gypsum / 100.0);

    base + nonlinear
}

/// One N(0, sigma) draw via Box–Muller.
fn gaussian(rng: &mut XorShift64, sigma: f64) -> f64 {
    // next_f64 is in [0, 1); shift to (0, 1] so the log is finite.
    let u1 = 1.0 - rng.next_f64();
    let u2 = rng.next_f64();
    sigma
        * (-2.0 * u1.ln()).sqrt()
        * (2.0 * std::f64::consts::PI * u2).cos()
}
