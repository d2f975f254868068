//! ROI parameter and result records for the process-improvement model.
//!
//! These are shared serialized formats: parameters arrive as JSON from the
//! input surface, results go to the report layer. The formula itself lives
//! in `curecast-roi`.

use serde::{Deserialize, Serialize};

/// Operating parameters for the ROI estimate.
///
/// All values must be finite. The formula is total over finite reals and
/// performs no range validation: negative counts or costs and
/// out-of-`[0, 100]` percentages are accepted silently and are the
/// caller's responsibility to prevent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiParameters {
    /// Batches produced per month.
    pub monthly_batches: f64,
    /// Concrete volume per batch (m³).
    pub volume_m3_per_batch: f64,
    /// Cement content of the mix (kg/m³).
    pub cement_content_kg_m3: f64,
    /// Overdesign reduction enabled by prediction (%).
    pub overdesign_reduction_pct: f64,
    /// Cement cost ($/ton).
    pub cement_cost_per_ton: f64,
    /// Scrap rate before the improvement (%).
    pub scrap_before_pct: f64,
    /// Scrap rate after the improvement (%).
    pub scrap_after_pct: f64,
    /// Cost of one batch ($).
    pub batch_cost_usd: f64,
    /// Physical lab tests per month.
    pub lab_tests_per_month: f64,
    /// Technician hours per lab test.
    pub hours_per_test: f64,
    /// Labor rate ($/h).
    pub labor_rate_usd_h: f64,
    /// One-time implementation cost ($).
    pub implementation_cost_usd: f64,
}

impl Default for RoiParameters {
    /// Defaults match the reference scenario used throughout the docs:
    /// a mid-size plant evaluating a $20k implementation.
    fn default() -> Self {
        Self {
            monthly_batches: 500.0,
            volume_m3_per_batch: 5.0,
            cement_content_kg_m3: 300.0,
            overdesign_reduction_pct: 2.0,
            cement_cost_per_ton: 110.0,
            scrap_before_pct: 5.0,
            scrap_after_pct: 2.0,
            batch_cost_usd: 500.0,
            lab_tests_per_month: 50.0,
            hours_per_test: 1.0,
            labor_rate_usd_h: 40.0,
            implementation_cost_usd: 20_000.0,
        }
    }
}

/// Monthly savings breakdown and investment figures.
///
/// `roi` and `payback_months` are `None` when the implementation cost is
/// not positive: "no investment" means ROI is not computable, not that it
/// is infinite. `payback_months` is additionally `None` when total savings
/// are not positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    /// Cement saved per month (kg).
    pub cement_saved_kg: f64,
    /// Value of the saved cement ($/month).
    pub cement_saved_cost: f64,
    /// Savings from the reduced scrap rate ($/month).
    pub scrap_savings: f64,
    /// Savings from avoided lab testing ($/month).
    pub lab_savings: f64,
    /// Total monthly savings ($).
    pub total_savings: f64,
    /// First-month return on investment ratio, if computable.
    pub roi: Option<f64>,
    /// Months for cumulative savings to repay the investment, if computable.
    pub payback_months: Option<f64>,
}

/// Loads `RoiParameters` from a JSON file.
pub fn load_roi_parameters(
    path: &std::path::Path,
) -> std::io::Result<RoiParameters> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_roundtrip() {
        let params = RoiParameters::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: RoiParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_absent_roi_serializes_as_null() {
        let result = RoiResult {
            cement_saved_kg: 0.0,
            cement_saved_cost: 0.0,
            scrap_savings: 0.0,
            lab_savings: 0.0,
            total_savings: 0.0,
            roi: None,
            payback_months: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"roi\":null"));
        assert!(json.contains("\"payback_months\":null"));
    }
}
