//! Plain-text session report for one assessed mix.

use std::io::Write;

use curecast_schemas::{FeatureBounds, FeatureVector};

use crate::service::Assessment;
use curecast_model::HoldoutMetrics;

/// Writes a human-readable report: prediction, interval, status, any
/// out-of-range inputs, and the model's held-out accuracy.
///
/// The displayed interval is the clamped one (`low <= point <= high`);
/// the JSON output path carries the raw triple instead.
pub fn write_assessment_report(
    mut w: impl Write,
    assessment: &Assessment,
    spec_min: f64,
    vector: &FeatureVector,
    bounds: &FeatureBounds,
    metrics: HoldoutMetrics,
) -> std::io::Result<()> {
    let interval = assessment.prediction.clamped();
    writeln!(
        w,
        "Predicted strength:  {:.2} MPa  [{:.2}, {:.2}]  (spec min {spec_min:.1})",
        assessment.prediction.point, interval.low, interval.high
    )?;
    writeln!(w, "Status:              {}", assessment.status)?;

    let out_of_range: Vec<_> = assessment
        .flags
        .iter()
        .filter(|&(_, &ok)| !ok)
        .map(|(&feature, _)| feature)
        .collect();
    if out_of_range.is_empty() {
        writeln!(w, "Inputs:              all within valid ranges")?;
    } else {
        writeln!(w, "Out-of-range inputs:")?;
        for feature in out_of_range {
            // Flags only exist for features with a bound entry.
            let (lo, hi) = bounds.get(feature).unwrap_or((f64::NAN, f64::NAN));
            let value = vector.get(feature).unwrap_or(f64::NAN);
            writeln!(
                w,
                "  {feature:<14} {value:>10.2}   (valid {lo}\u{2013}{hi})"
            )?;
        }
    }

    writeln!(
        w,
        "Model accuracy:      r² {:.3}, MAE {:.2} MPa \
         ({} train / {} holdout)",
        metrics.r_squared,
        metrics.mean_abs_error,
        metrics.train_len,
        metrics.holdout_len
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use curecast_model::EnsembleParams;
    use curecast_schemas::Feature;

    use super::*;
    use crate::service::PredictionService;

    fn render(mutate: impl FnOnce(&mut FeatureVector)) -> String {
        let dataset = curecast_synth::generate(150, 5);
        let params = EnsembleParams {
            n_trees: 40,
            ..EnsembleParams::default()
        };
        let service = PredictionService::fit(
            &dataset,
            &params,
            FeatureBounds::default(),
            42.5,
        )
        .unwrap();

        let mut mix = service.bounds().midpoints();
        mutate(&mut mix);
        let assessment = service.assess(&mix).unwrap();

        let mut out = Vec::new();
        write_assessment_report(
            &mut out,
            &assessment,
            service.spec_min(),
            &mix,
            service.bounds(),
            service.metrics(),
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_for_clean_inputs() {
        let text = render(|_| {});
        assert!(text.contains("Predicted strength:"));
        assert!(text.contains("all within valid ranges"));
        assert!(text.contains("Model accuracy:"));
    }

    #[test]
    fn test_report_lists_out_of_range_inputs() {
        let text = render(|mix| mix.set(Feature::Humidity, 120.0));
        assert!(text.contains("Out-of-range inputs:"));
        assert!(text.contains("Humidity"));
    }
}
