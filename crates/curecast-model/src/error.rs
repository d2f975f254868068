//! Error types for the curecast-model crate.

use std::backtrace::Backtrace;
use std::fmt;

use curecast_schemas::Feature;

/// Error type for ensemble fitting and prediction.
///
/// Uses the canonical struct pattern with backtrace capture and `is_xxx()`
/// helper methods: the internal kind enum stays private so the public API
/// is stable while tests and callers can still branch on error class.
#[derive(Debug)]
pub struct ModelError {
    kind: ModelErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum ModelErrorKind {
    /// `fit` was given a dataset with no samples.
    EmptyDataset,
    /// `fit` was given samples with no feature columns.
    EmptyColumns,
    /// A sample's feature columns disagree with the first sample's schema.
    InconsistentColumns {
        /// Index of the offending sample in the dataset.
        sample: usize,
    },
    /// `predict` received a vector missing a schema feature.
    MissingFeature {
        /// The absent schema feature.
        feature: Feature,
    },
}

impl ModelError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: ModelErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true for fit-time schema failures (empty or inconsistent
    /// feature columns). Fatal to the fit call; no ensemble is built.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self.kind,
            ModelErrorKind::EmptyDataset
                | ModelErrorKind::EmptyColumns
                | ModelErrorKind::InconsistentColumns { .. }
        )
    }

    /// Returns true for predict-time schema mismatches. Fatal only to the
    /// single call; the fitted ensemble stays valid.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self.kind, ModelErrorKind::MissingFeature { .. })
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for ModelErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelErrorKind::EmptyDataset => {
                write!(f, "cannot fit on an empty dataset")
            }
            ModelErrorKind::EmptyColumns => {
                write!(f, "cannot fit on samples with no feature columns")
            }
            ModelErrorKind::InconsistentColumns { sample } => {
                write!(
                    f,
                    "sample {sample} has feature columns inconsistent \
                     with the dataset schema"
                )
            }
            ModelErrorKind::MissingFeature { feature } => {
                write!(
                    f,
                    "feature vector is missing schema feature {feature}"
                )
            }
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for ModelError {}
