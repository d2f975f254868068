use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use curecast::{PredictionService, report};
use curecast_model::{
    EnsembleParams, StrengthEnsemble, load_ensemble, save_ensemble,
};
use curecast_schemas::{FeatureBounds, load_feature_vector};

// Use mimalloc for better performance on allocation-heavy fitting runs.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Predict 28-day concrete strength with an uncertainty interval, judge it
/// against a spec minimum, and estimate the ROI of prediction-driven
/// process improvements.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the prediction ensemble on synthetic plant data
    ///
    /// Prints held-out accuracy metrics and optionally saves the fitted
    /// model as JSON for later `predict --model` runs.
    Fit {
        /// Number of synthetic samples to fit on
        #[arg(long, default_value_t = curecast_synth::DEFAULT_SAMPLES)]
        samples: usize,

        /// Data-generation seed
        #[arg(long, default_value_t = curecast_synth::DEFAULT_SEED)]
        seed: u64,

        /// Write the fitted model JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Assess one mix: prediction, interval, range flags, status
    Predict {
        /// Load a fitted model JSON instead of fitting fresh
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Feature vector JSON ({"C3S": 55.0, ...}); defaults to the
        /// midpoint of every valid range
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Specification minimum strength (MPa)
        #[arg(long, default_value_t = 42.5)]
        spec_min: f64,

        /// Number of synthetic samples when fitting fresh
        #[arg(long, default_value_t = curecast_synth::DEFAULT_SAMPLES)]
        samples: usize,

        /// Data-generation seed when fitting fresh
        #[arg(long, default_value_t = curecast_synth::DEFAULT_SEED)]
        seed: u64,

        /// Emit the raw assessment as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Compute the savings/ROI report from an operating-parameters JSON
    Roi {
        /// Parameters JSON file (reads stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize structured logging. Output goes to stderr so JSON output
    // on stdout remains clean for piping. Default to warn, allowlist our
    // crates.
    const CRATES: &[&str] = &[
        "curecast",
        "curecast_assess",
        "curecast_model",
        "curecast_roi",
        "curecast_schemas",
        "curecast_synth",
    ];
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .init();

    match cli.command {
        Commands::Fit {
            samples,
            seed,
            output,
        } => {
            let dataset = curecast_synth::generate(samples, seed);
            let ensemble =
                StrengthEnsemble::fit(&dataset, &EnsembleParams::default())
                    .context("fitting the ensemble failed")?;

            let metrics = ensemble.metrics();
            println!(
                "Fitted on {} samples: r\u{b2} {:.3}, MAE {:.2} MPa \
                 ({} train / {} holdout)",
                samples,
                metrics.r_squared,
                metrics.mean_abs_error,
                metrics.train_len,
                metrics.holdout_len
            );

            if let Some(path) = output {
                save_ensemble(&path, &ensemble).with_context(|| {
                    format!("failed to save model to {}", path.display())
                })?;
                println!("Model saved to {}", path.display());
            }
            Ok(())
        }

        Commands::Predict {
            model,
            input,
            spec_min,
            samples,
            seed,
            json,
        } => {
            let ensemble = match model {
                Some(path) => load_ensemble(&path).with_context(|| {
                    format!("failed to load model from {}", path.display())
                })?,
                None => {
                    let dataset = curecast_synth::generate(samples, seed);
                    StrengthEnsemble::fit(
                        &dataset,
                        &EnsembleParams::default(),
                    )
                    .context("fitting the ensemble failed")?
                }
            };

            let bounds = FeatureBounds::default();
            let vector = match input {
                Some(path) => load_feature_vector(&path).with_context(|| {
                    format!("failed to read inputs from {}", path.display())
                })?,
                None => bounds.midpoints(),
            };

            let service = PredictionService::new(ensemble, bounds, spec_min);
            let assessment = service
                .assess(&vector)
                .context("assessment failed")?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &assessment)?;
                writeln!(out)?;
            } else {
                report::write_assessment_report(
                    &mut out,
                    &assessment,
                    service.spec_min(),
                    &vector,
                    service.bounds(),
                    service.metrics(),
                )?;
            }
            Ok(())
        }

        Commands::Roi { input } => {
            let stdout = std::io::stdout();
            let out = stdout.lock();
            match input {
                Some(path) => {
                    let file = File::open(&path).with_context(|| {
                        format!("failed to open {}", path.display())
                    })?;
                    curecast_roi::run(BufReader::new(file), out)?;
                }
                None => {
                    let stdin = std::io::stdin();
                    curecast_roi::run(stdin.lock(), out)?;
                }
            }
            Ok(())
        }
    }
}
