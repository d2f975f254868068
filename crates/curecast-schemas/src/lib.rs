//! Schema definitions for the curecast calculator.
//!
//! This crate contains the data structures shared across the curecast
//! pipeline: the fixed mix-design feature set, feature vectors and bounds,
//! training datasets, prediction results, and the ROI parameter/result
//! records. These types are serialized to JSON at the boundaries (CLI
//! input, persisted models, report output).
//!
//! Keeping the schemas in one crate guarantees that the model, assessment,
//! and ROI phases agree on one serialization contract.

mod dataset;
mod features;
mod prediction;
mod roi;

#[doc(inline)]
pub use dataset::*;
#[doc(inline)]
pub use features::*;
#[doc(inline)]
pub use prediction::*;
#[doc(inline)]
pub use roi::*;
