//! Simulate one prism observation of a Type Ia supernova and plot it against the truth

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use log::info;
use plotters::prelude::*;
use prism_sim::instrument::ReferenceNoiseTable;
use prism_sim::model::BlackbodySupernovaModel;
use prism_sim::photometry::{Band, Bandpass, PhotonCountIntegrator};
use prism_sim::shared_args::{parse_exposure_seconds, SharedSimulationArgs};
use prism_sim::sims::{SpectrumSynthesizer, Synthesis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::noise::GaussianNoise;

/// Truth flux is divided by this before plotting next to the SNR curve
const TRUTH_PLOT_SCALE: f64 = 1e-19;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate a prism spectrum of a Type Ia supernova")]
struct Args {
    #[command(flatten)]
    shared: SharedSimulationArgs,

    /// Exposure time in seconds
    #[arg(long, default_value_t = 3600.0, value_parser = parse_exposure_seconds)]
    exposure: f64,

    /// Lower edge of the top-hat band used for the band flux printout (Å)
    #[arg(long, default_value_t = 8000.0)]
    band_min: f64,

    /// Upper edge of the top-hat band used for the band flux printout (Å)
    #[arg(long, default_value_t = 9200.0)]
    band_max: f64,

    /// Output plot filename; no plot is written when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn print_band_flux(synthesis: &Synthesis, band: &Band) -> Result<(), Box<dyn std::error::Error>> {
    let bandpass = Bandpass::tophat(band, 1.0)?;
    let integrator = PhotonCountIntegrator;

    match synthesis.true_spectrum.bandflux(&integrator, &bandpass) {
        Ok(photons) => println!(
            "Band flux {:.0}-{:.0} Å: {photons:.6e} photons s^-1 cm^-2",
            band.lower_aa, band.upper_aa
        ),
        Err(e) => println!(
            "Band flux {:.0}-{:.0} Å unavailable: {e}",
            band.lower_aa, band.upper_aa
        ),
    }
    Ok(())
}

fn plot_spectra(
    synthesis: &Synthesis,
    redshift: f64,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let truth: Vec<(f64, f64)> = synthesis
        .true_spectrum
        .samples()
        .map(|(w, f)| (w, f / TRUTH_PLOT_SCALE))
        .collect();
    let observed: Vec<(f64, f64)> = synthesis.observed_spectrum.samples().collect();

    let all = truth.iter().chain(observed.iter());
    let (min_w, max_w) = all
        .clone()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(w, _)| {
            (lo.min(w), hi.max(w))
        });
    let (min_y, max_y) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
        (lo.min(y), hi.max(y))
    });
    if !min_w.is_finite() || !min_y.is_finite() {
        return Err("Nothing to plot: both spectra are empty".into());
    }
    let pad = 0.05 * (max_y - min_y).max(1.0);

    let root = BitMapBackend::new(output, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "z = {redshift:.2}, phase {:+.1} d",
                synthesis.true_spectrum.time_phase()
            ),
            ("sans-serif", 30),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(min_w..max_w, (min_y - pad)..(max_y + pad))?;

    chart
        .configure_mesh()
        .x_desc("Wavelength (Ang)")
        .y_desc("Signal-to-Noise (per resolution element)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(truth, &BLACK))?
        .label("Truth (flux / 1e-19)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart
        .draw_series(LineSeries::new(observed, &BLUE))?
        .label("Observed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    println!("Plot saved to {}", output.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.shared.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let params = args.shared.model.resolve(&mut rng);
    let band = Band::from_aa_bounds(args.band_min, args.band_max)?;

    info!("Using seed {seed}");
    for (name, value) in params.named_values() {
        info!("{name} = {value:.4}");
    }

    let table = Arc::new(ReferenceNoiseTable::load(&args.shared.reference_table)?);
    let synthesizer = SpectrumSynthesizer::new(table);
    let mut model = BlackbodySupernovaModel::default();
    let mut noise = GaussianNoise::new(rng);

    let synthesis = synthesizer.synthesize(
        &mut model,
        &params,
        args.exposure,
        &[args.shared.phase],
        &mut noise,
    )?;

    if let Some(advisory) = &synthesis.advisory {
        println!("Warning: {advisory}");
    }
    println!(
        "Truth: {} samples, observed: {} samples, noise scale factor {:.4}",
        synthesis.true_spectrum.len(),
        synthesis.observed_spectrum.len(),
        synthesis.noise_scale_factor
    );
    print_band_flux(&synthesis, &band)?;

    if let Some(output) = &args.output {
        plot_spectra(&synthesis, params.z, output)?;
    }

    Ok(())
}
