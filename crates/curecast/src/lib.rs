//! Session layer for the curecast strength predictor.
//!
//! Ties the pipeline crates together for one interactive session: a
//! [`service::PredictionService`] owns the fitted ensemble and the
//! validation configuration, and [`report`] renders assessments as text.
//! The `curecast` binary in this crate is the CLI front end.

pub mod report;
pub mod service;

#[doc(inline)]
pub use service::{Assessment, PredictionService, ServiceError};
