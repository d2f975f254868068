//! The fixed mix-design feature set, feature vectors, and valid ranges.
//!
//! Ten features describe a concrete batch: the four clinker phase
//! fractions, gypsum content, cement fineness, water/cement ratio, and the
//! curing/process conditions (temperature, humidity, mix time). The set is
//! fixed for this domain and known at compile time, so feature names are an
//! enum rather than free-form strings: an unknown name is unrepresentable,
//! and only an *absent* feature remains a runtime concern.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A mix-design or process feature of a concrete batch.
///
/// Serializes as the conventional short name (e.g. `"C3S"`,
/// `"Water_cement"`), matching the column names used in exported datasets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Feature {
    /// Alite fraction of the clinker (%).
    C3S,
    /// Belite fraction of the clinker (%).
    C2S,
    /// Aluminate fraction of the clinker (%).
    C3A,
    /// Ferrite fraction of the clinker (%).
    C4AF,
    /// Gypsum content (%).
    Gypsum,
    /// Cement fineness (Blaine, cm²/g).
    Fineness,
    /// Water/cement ratio.
    #[serde(rename = "Water_cement")]
    WaterCement,
    /// Curing temperature (°C).
    Temperature,
    /// Relative humidity during curing (%).
    Humidity,
    /// Mixing time (s).
    MixTime,
}

impl Feature {
    /// All features in canonical column order.
    pub const ALL: [Feature; 10] = [
        Feature::C3S,
        Feature::C2S,
        Feature::C3A,
        Feature::C4AF,
        Feature::Gypsum,
        Feature::Fineness,
        Feature::WaterCement,
        Feature::Temperature,
        Feature::Humidity,
        Feature::MixTime,
    ];

    /// Returns the serialized column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::C3S => "C3S",
            Feature::C2S => "C2S",
            Feature::C3A => "C3A",
            Feature::C4AF => "C4AF",
            Feature::Gypsum => "Gypsum",
            Feature::Fineness => "Fineness",
            Feature::WaterCement => "Water_cement",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::MixTime => "MixTime",
        }
    }

    /// Parses a column name, returning `None` for unknown names.
    pub fn parse(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered mapping from [`Feature`] to a numeric value.
///
/// A vector may be partially populated while a caller builds it up; the
/// model and the range validator check completeness at their boundaries.
/// Values are expected to be finite reals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(IndexMap<Feature, f64>);

impl FeatureVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a feature value, replacing any previous value.
    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0.insert(feature, value);
    }

    /// Returns the value for a feature, if present.
    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.0.get(&feature).copied()
    }

    /// Returns the number of populated features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no features are populated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(feature, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(&f, &v)| (f, v))
    }
}

impl FromIterator<(Feature, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (Feature, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Inclusive valid ranges for each feature, `feature -> [lo, hi]`.
///
/// Invariant: `lo < hi` for every entry. The default table covers the
/// plausible operating window for ordinary Portland cement production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureBounds(IndexMap<Feature, (f64, f64)>);

impl FeatureBounds {
    /// Returns an empty table. [`FeatureBounds::default`] gives the
    /// domain table instead.
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    /// Returns the `[lo, hi]` range for a feature, if configured.
    pub fn get(&self, feature: Feature) -> Option<(f64, f64)> {
        self.0.get(&feature).copied()
    }

    /// Sets the range for a feature.
    pub fn set(&mut self, feature: Feature, lo: f64, hi: f64) {
        self.0.insert(feature, (lo, hi));
    }

    /// Iterates over `(feature, (lo, hi))` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, (f64, f64))> + '_ {
        self.0.iter().map(|(&f, &r)| (f, r))
    }

    /// Builds a feature vector with every feature at its range midpoint.
    ///
    /// Used as the neutral starting point for what-if evaluation.
    pub fn midpoints(&self) -> FeatureVector {
        self.iter()
            .map(|(f, (lo, hi))| (f, (lo + hi) / 2.0))
            .collect()
    }
}

impl Default for FeatureBounds {
    fn default() -> Self {
        let mut bounds = Self(IndexMap::new());
        bounds.set(Feature::C3S, 40.0, 70.0);
        bounds.set(Feature::C2S, 10.0, 30.0);
        bounds.set(Feature::C3A, 5.0, 15.0);
        bounds.set(Feature::C4AF, 5.0, 15.0);
        bounds.set(Feature::Gypsum, 2.0, 6.0);
        bounds.set(Feature::Fineness, 2500.0, 4000.0);
        bounds.set(Feature::WaterCement, 0.30, 0.60);
        bounds.set(Feature::Temperature, 15.0, 45.0);
        bounds.set(Feature::Humidity, 25.0, 95.0);
        bounds.set(Feature::MixTime, 60.0, 300.0);
        bounds
    }
}

/// Loads a `FeatureVector` from a JSON file of `{"name": value}` entries.
pub fn load_feature_vector(
    path: &std::path::Path,
) -> std::io::Result<FeatureVector> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
