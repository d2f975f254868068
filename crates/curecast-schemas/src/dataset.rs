//! Training datasets: observed batches with their measured 28-day strength.

use serde::{Deserialize, Serialize};

use crate::FeatureVector;

/// One observed batch: a feature vector plus its measured 28-day
/// compressive strength (MPa, typically 10–80 in this domain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Mix-design and process parameters of the batch.
    pub features: FeatureVector,
    /// Measured 28-day compressive strength (MPa).
    pub strength: f64,
}

/// An ordered sequence of training samples.
///
/// Order is irrelevant to fitting; the model shuffles deterministically
/// before splitting off its holdout subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    samples: Vec<TrainingSample>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample.
    pub fn push(&mut self, sample: TrainingSample) {
        self.samples.push(sample);
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the samples as a slice.
    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    /// Mean observed strength, or `None` for an empty dataset.
    ///
    /// Used as the baseline the UI compares a prediction against.
    pub fn mean_strength(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        #[expect(
            clippy::cast_precision_loss,
            reason = "sample counts are far below 2^52"
        )]
        let n = self.samples.len() as f64;
        Some(self.samples.iter().map(|s| s.strength).sum::<f64>() / n)
    }
}

impl FromIterator<TrainingSample> for Dataset {
    fn from_iter<I: IntoIterator<Item = TrainingSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Feature;

    fn sample(strength: f64) -> TrainingSample {
        let mut features = FeatureVector::new();
        features.set(Feature::C3S, 55.0);
        TrainingSample { features, strength }
    }

    #[test]
    fn test_mean_strength() {
        let dataset: Dataset =
            [sample(40.0), sample(50.0)].into_iter().collect();
        assert_eq!(dataset.mean_strength(), Some(45.0));
        assert_eq!(Dataset::new().mean_strength(), None);
    }

    #[test]
    fn test_dataset_serializes_as_plain_array() {
        let dataset: Dataset = [sample(40.0)].into_iter().collect();
        let json = serde_json::to_string(&dataset).unwrap();
        assert!(json.starts_with('['), "transparent wrapper: {json}");
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dataset);
    }
}
