//! Cost/ROI model for a strength-prediction process improvement.
//!
//! A deterministic formula turns twelve operating parameters into a
//! monthly savings breakdown, an ROI ratio, and a payback period:
//!
//! ```text
//! monthly_volume    = monthly_batches × volume_per_batch
//! cement_saved_kg   = monthly_volume × cement_content × reduction% / 100
//! cement_saved_cost = cement_saved_kg / 1000 × cost_per_ton      (kg → ton)
//! scrap_savings     = batches × batch_cost × max(0, Δscrap%) / 100
//! lab_savings       = tests × hours_per_test × labor_rate
//! total             = cement + scrap + lab
//! roi               = (total − implementation) / implementation   (if > 0)
//! payback_months    = implementation / total                      (if both > 0)
//! ```
//!
//! The scrap term is clamped at zero: a worsening scrap rate never
//! produces negative "savings". A non-positive implementation cost means
//! ROI and payback are not computable (reported as `None`), not infinite.
//! There are no error conditions; every branch is defined for all finite
//! inputs, and out-of-domain values (negative costs, percentages outside
//! `[0, 100]`) pass through unvalidated as the caller's responsibility.

use std::io::{Read, Write};

use curecast_schemas::{RoiParameters, RoiResult};

/// Computes the savings breakdown and investment figures.
pub fn compute_roi(params: &RoiParameters) -> RoiResult {
    let monthly_volume_m3 =
        params.monthly_batches * params.volume_m3_per_batch;
    let cement_saved_kg = monthly_volume_m3
        * params.cement_content_kg_m3
        * (params.overdesign_reduction_pct / 100.0);
    let cement_saved_cost =
        (cement_saved_kg / 1000.0) * params.cement_cost_per_ton;

    let scrap_delta = ((params.scrap_before_pct - params.scrap_after_pct)
        / 100.0)
        .max(0.0);
    let scrap_savings =
        params.monthly_batches * params.batch_cost_usd * scrap_delta;

    let lab_savings = params.lab_tests_per_month
        * params.hours_per_test
        * params.labor_rate_usd_h;

    let total_savings = cement_saved_cost + scrap_savings + lab_savings;

    let mut roi = None;
    let mut payback_months = None;
    if params.implementation_cost_usd > 0.0 {
        roi = Some(
            (total_savings - params.implementation_cost_usd)
                / params.implementation_cost_usd,
        );
        if total_savings > 0.0 {
            payback_months =
                Some(params.implementation_cost_usd / total_savings);
        }
    }

    RoiResult {
        cement_saved_kg,
        cement_saved_cost,
        scrap_savings,
        lab_savings,
        total_savings,
        roi,
        payback_months,
    }
}

/// Writes a human-readable savings report to the given writer.
pub fn write_report(
    result: &RoiResult,
    mut w: impl Write,
) -> std::io::Result<()> {
    writeln!(w, "Cement saved:       {:>12.1} kg/month", result.cement_saved_kg)?;
    writeln!(w, "Cement savings:     ${:>11.2} /month", result.cement_saved_cost)?;
    writeln!(w, "Scrap savings:      ${:>11.2} /month", result.scrap_savings)?;
    writeln!(w, "Lab savings:        ${:>11.2} /month", result.lab_savings)?;
    writeln!(w, "Total savings:      ${:>11.2} /month", result.total_savings)?;

    match result.roi {
        Some(roi) => {
            writeln!(w, "First-month ROI:    {:>12.1}%", roi * 100.0)?;
        }
        None => writeln!(w, "First-month ROI:    n/a (no investment)")?,
    }
    match result.payback_months {
        Some(months) => {
            writeln!(w, "Payback period:     {months:>12.1} months")?;
        }
        None => writeln!(w, "Payback period:     n/a")?,
    }

    Ok(())
}

/// Reads `RoiParameters` as JSON, computes the result, writes a report.
///
/// This is the read-compute-write entry point used by the CLI.
pub fn run(mut input: impl Read, output: impl Write) -> std::io::Result<()> {
    let mut json = String::new();
    input.read_to_string(&mut json)?;

    let params: RoiParameters = serde_json::from_str(&json)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let result = compute_roi(&params);
    write_report(&result, output)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_reference_scenario() {
        // 500 batches × 5 m³, 300 kg/m³ cement, 2% reduction at $110/ton,
        // scrap 5% → 2% at $500/batch, 50 tests × 1 h × $40, $20k spend.
        let result = compute_roi(&RoiParameters::default());

        assert!((result.cement_saved_kg - 15_000.0).abs() < EPS);
        assert!((result.cement_saved_cost - 1_650.0).abs() < EPS);
        assert!((result.scrap_savings - 7_500.0).abs() < EPS);
        assert!((result.lab_savings - 2_000.0).abs() < EPS);
        assert!((result.total_savings - 11_150.0).abs() < EPS);

        // (11150 − 20000) / 20000: the first month recovers ~56%.
        assert!((result.roi.unwrap() - (-0.4425)).abs() < EPS);
        assert!(
            (result.payback_months.unwrap() - 20_000.0 / 11_150.0).abs()
                < EPS
        );
    }

    #[test]
    fn test_zero_investment_means_no_roi() {
        let params = RoiParameters {
            implementation_cost_usd: 0.0,
            ..RoiParameters::default()
        };
        let result = compute_roi(&params);

        assert!(result.total_savings > 0.0);
        assert_eq!(result.roi, None);
        assert_eq!(result.payback_months, None);
    }

    #[test]
    fn test_negative_investment_means_no_roi() {
        let params = RoiParameters {
            implementation_cost_usd: -5_000.0,
            ..RoiParameters::default()
        };
        let result = compute_roi(&params);
        assert_eq!(result.roi, None);
        assert_eq!(result.payback_months, None);
    }

    #[test]
    fn test_no_savings_means_no_payback() {
        let params = RoiParameters {
            monthly_batches: 0.0,
            lab_tests_per_month: 0.0,
            ..RoiParameters::default()
        };
        let result = compute_roi(&params);

        assert_eq!(result.total_savings, 0.0);
        // ROI is still defined (a pure loss); payback never occurs.
        assert!((result.roi.unwrap() - (-1.0)).abs() < EPS);
        assert_eq!(result.payback_months, None);
    }

    #[test]
    fn test_worsening_scrap_clamps_to_zero() {
        let params = RoiParameters {
            scrap_before_pct: 2.0,
            scrap_after_pct: 5.0,
            ..RoiParameters::default()
        };
        let result = compute_roi(&params);
        assert_eq!(result.scrap_savings, 0.0);
    }

    #[test]
    fn test_report_formats_absent_values() {
        let params = RoiParameters {
            implementation_cost_usd: 0.0,
            ..RoiParameters::default()
        };
        let mut out = Vec::new();
        write_report(&compute_roi(&params), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("n/a (no investment)"));
        assert!(text.contains("Total savings"));
    }

    #[test]
    fn test_run_reads_json_and_reports() {
        let json = serde_json::to_string(&RoiParameters::default()).unwrap();
        let mut out = Vec::new();
        run(json.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("15000.0 kg/month"));
        assert!(text.contains("Payback period"));
    }

    #[test]
    fn test_run_rejects_malformed_json() {
        let mut out = Vec::new();
        let err = run("not json".as_bytes(), &mut out).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    proptest! {
        /// A larger overdesign reduction strictly increases the cement
        /// savings line (all else fixed).
        #[test]
        fn prop_reduction_monotone(
            lo in 0.0f64..5.0,
            delta in 0.1f64..5.0,
        ) {
            let base = RoiParameters {
                overdesign_reduction_pct: lo,
                ..RoiParameters::default()
            };
            let more = RoiParameters {
                overdesign_reduction_pct: lo + delta,
                ..base
            };
            prop_assert!(
                compute_roi(&more).cement_saved_cost
                    > compute_roi(&base).cement_saved_cost
            );
        }

        /// A higher before-improvement scrap rate never decreases the
        /// scrap savings line (after-rate fixed).
        #[test]
        fn prop_scrap_monotone(
            before in 0.0f64..100.0,
            bump in 0.0f64..50.0,
            after in 0.0f64..100.0,
        ) {
            let base = RoiParameters {
                scrap_before_pct: before,
                scrap_after_pct: after,
                ..RoiParameters::default()
            };
            let more = RoiParameters {
                scrap_before_pct: before + bump,
                ..base
            };
            prop_assert!(
                compute_roi(&more).scrap_savings
                    >= compute_roi(&base).scrap_savings
            );
        }
    }
}
