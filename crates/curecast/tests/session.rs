use curecast::PredictionService;
use curecast_assess::Status;
use curecast_model::EnsembleParams;
use curecast_schemas::{Feature, FeatureBounds};

/// Exercises the whole prediction path through the public API: synthesize
/// a dataset, fit the ensemble, assess a realistic mix, and render the
/// report.
#[test]
fn end_to_end_prediction_session() {
    let dataset = curecast_synth::generate(300, 42);
    let params = EnsembleParams {
        n_trees: 60,
        ..EnsembleParams::default()
    };
    let service =
        PredictionService::fit(&dataset, &params, FeatureBounds::default(), 42.5)
            .unwrap();

    // The fitted model should explain most of the synthetic response.
    let metrics = service.metrics();
    assert!(metrics.r_squared > 0.5, "r² = {}", metrics.r_squared);
    assert!(metrics.mean_abs_error < 6.0, "MAE = {}", metrics.mean_abs_error);
    assert_eq!(metrics.train_len + metrics.holdout_len, 300);

    // A mid-range mix is valid on every input and gets a finite interval.
    let mix = service.bounds().midpoints();
    let assessment = service.assess(&mix).unwrap();
    assert!(assessment.flags.values().all(|&ok| ok));

    let interval = assessment.prediction.clamped();
    assert!(interval.low <= interval.point && interval.point <= interval.high);
    assert!(interval.point.is_finite());

    // The status must agree with the classifier on the same point.
    assert_eq!(
        assessment.status,
        curecast_assess::classify(assessment.prediction.point, 42.5)
    );

    let mut out = Vec::new();
    curecast::report::write_assessment_report(
        &mut out,
        &assessment,
        service.spec_min(),
        &mix,
        service.bounds(),
        service.metrics(),
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Predicted strength:"));
    assert!(text.contains("Status:"));
}

/// A mix pushed outside the valid ranges is still assessed, but flagged,
/// and a weak mix grades below a strict spec minimum.
#[test]
fn out_of_range_mix_is_flagged_not_rejected() {
    let dataset = curecast_synth::generate(200, 7);
    let params = EnsembleParams {
        n_trees: 40,
        ..EnsembleParams::default()
    };
    let service =
        PredictionService::fit(&dataset, &params, FeatureBounds::default(), 42.5)
            .unwrap();

    let mut mix = service.bounds().midpoints();
    mix.set(Feature::WaterCement, 0.90);
    mix.set(Feature::Humidity, 120.0);

    let assessment = service.assess(&mix).unwrap();
    assert!(!assessment.flags[&Feature::WaterCement]);
    assert!(!assessment.flags[&Feature::Humidity]);
    assert!(assessment.flags[&Feature::C3S]);
    assert!(assessment.prediction.point.is_finite());

    // With an unreachable spec minimum the grade is Fail regardless of mix.
    let strict = PredictionService::new(
        service.ensemble().clone(),
        FeatureBounds::default(),
        1000.0,
    );
    let graded = strict.assess(&mix).unwrap();
    assert_eq!(graded.status, Status::Fail);
}

/// Runs the ROI pipeline end to end: parameters as JSON in, rendered
/// savings report out, with the headline numbers of the reference
/// scenario.
#[test]
fn roi_pipeline_reference_scenario() {
    let input = r#"{
        "monthly_batches": 500.0,
        "volume_m3_per_batch": 5.0,
        "cement_content_kg_m3": 300.0,
        "overdesign_reduction_pct": 2.0,
        "cement_cost_per_ton": 110.0,
        "scrap_before_pct": 5.0,
        "scrap_after_pct": 2.0,
        "batch_cost_usd": 500.0,
        "lab_tests_per_month": 50.0,
        "hours_per_test": 1.0,
        "labor_rate_usd_h": 40.0,
        "implementation_cost_usd": 20000.0
    }"#;

    let mut out = Vec::new();
    curecast_roi::run(input.as_bytes(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("15000.0 kg/month"));
    assert!(text.contains("Total savings:      $   11150.00 /month"));
    assert!(text.contains("First-month ROI:"));
    assert!(text.contains("Payback period:"));
}
