//! Compare injected noise and observed signal-to-noise across exposure times

use std::sync::Arc;

use clap::Parser;
use log::{debug, info};
use prism_sim::instrument::ReferenceNoiseTable;
use prism_sim::model::BlackbodySupernovaModel;
use prism_sim::shared_args::{parse_exposure_seconds, SharedSimulationArgs};
use prism_sim::sims::{SpectrumSynthesizer, Synthesis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::noise::GaussianNoise;

/// Seed used when none is given, so repeated sweeps print the same table
const DEFAULT_SEED: u64 = 7;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sweep exposure times for one simulated supernova")]
struct Args {
    #[command(flatten)]
    shared: SharedSimulationArgs,

    /// Exposure times in seconds, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "900,3600,14400",
        value_parser = parse_exposure_seconds
    )]
    exposures: Vec<f64>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn print_row(exposure_s: f64, synthesis: &Synthesis) {
    println!(
        "| {:>10.0} | {:>8.4} | {:>12.4e} | {:>12.4e} | {:>10.3} |",
        exposure_s,
        synthesis.noise_scale_factor,
        mean(&synthesis.rescaled_noise),
        synthesis.mean_abs_noise(),
        median(synthesis.observed_spectrum.flux()),
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.shared.seed.unwrap_or(DEFAULT_SEED);
    let params = args
        .shared
        .model
        .resolve(&mut StdRng::seed_from_u64(seed));
    info!("Sweeping {} exposures with seed {seed}", args.exposures.len());
    debug!("Parameters: {params:?}");

    let table = Arc::new(ReferenceNoiseTable::load(&args.shared.reference_table)?);
    let synthesizer = SpectrumSynthesizer::new(table);
    let mut model = BlackbodySupernovaModel::default();

    println!("| Exposure (s) | Scale | Mean noise | Mean \\|draw\\| | Median SNR |");
    println!("|-------------:|------:|-----------:|--------------:|-----------:|");
    for &exposure_s in &args.exposures {
        // Same seed per row so rows differ only by exposure
        let mut noise = GaussianNoise::seeded(seed);
        let synthesis = synthesizer.synthesize(
            &mut model,
            &params,
            exposure_s,
            &[args.shared.phase],
            &mut noise,
        )?;
        print_row(exposure_s, &synthesis);
    }

    Ok(())
}
