//! Noise-scaled spectral synthesis for a slitless prism observation.
//!
//! Given a configured spectral model and the instrument's reference noise
//! table, a synthesis run:
//!
//! 1. evaluates the model on its own 1 Å grid over `[minwave, maxwave)`,
//!    giving the noiseless truth spectrum;
//! 2. selects the table rows strictly inside the model support;
//! 3. rescales their reference noise to the requested exposure;
//! 4. evaluates the model again at those instrument wavelengths;
//! 5. adds one Gaussian realization of the rescaled noise; and
//! 6. divides by the rescaled noise, giving signal-to-noise per resolution
//!    element.
//!
//! All model evaluation and validation happens before the noise source is
//! touched, so a failed run leaves the caller's generator where it was.
//!
//! Pass [`shared::noise::ZeroNoise`] to get the noiseless `flux / noise`
//! curve instead of a stochastic realization.

use std::sync::Arc;

use ndarray::Array2;
use shared::noise::{gaussian_realization, NoiseSource};
use thiserror::Error;

use crate::instrument::exposure::{
    ExposureAdvisory, ExposureError, ExposureNoiseScaler, ScaledNoise, MIN_PLAUSIBLE_EXPOSURE_S,
};
use crate::instrument::noise_table::{NoiseTableError, ReferenceNoiseTable, REFERENCE_EXPOSURE_S};
use crate::model::{ModelEvaluationError, ModelParameters, ParameterError, SpectralModel};
use crate::photometry::spectrum::{
    ObservedSpectrum, SpectrumError, TrueSpectrum, WavelengthGrid,
};

/// Errors that abort a synthesis run
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("At least one time phase is required")]
    NoPhases,

    #[error(transparent)]
    Parameters(#[from] ParameterError),

    #[error(transparent)]
    Exposure(#[from] ExposureError),

    #[error(transparent)]
    Model(#[from] ModelEvaluationError),

    #[error(transparent)]
    Table(#[from] NoiseTableError),

    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

/// Instrument baseline used when rescaling the reference noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisConfig {
    /// Exposure, in seconds, the table's noise column was tabulated at
    pub reference_exposure_s: f64,
    /// Requested exposures below this raise an advisory
    pub min_plausible_exposure_s: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            reference_exposure_s: REFERENCE_EXPOSURE_S,
            min_plausible_exposure_s: MIN_PLAUSIBLE_EXPOSURE_S,
        }
    }
}

/// Output of one synthesis run at a single time phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Noiseless model flux on the model's native grid
    pub true_spectrum: TrueSpectrum,
    /// Signal-to-noise spectrum on the overlapping instrument grid
    pub observed_spectrum: ObservedSpectrum,
    /// Noiseless model flux at the observed wavelengths
    pub model_flux: Vec<f64>,
    /// 1σ noise at the requested exposure, aligned with the observed grid
    pub rescaled_noise: Vec<f64>,
    /// The noise realization that was added to `model_flux`
    pub noise_draw: Vec<f64>,
    /// Factor applied to the reference noise
    pub noise_scale_factor: f64,
    /// Set when the requested exposure looked like the wrong units
    pub advisory: Option<ExposureAdvisory>,
}

impl Synthesis {
    /// Mean absolute injected noise, 0 for an empty overlap
    pub fn mean_abs_noise(&self) -> f64 {
        if self.noise_draw.is_empty() {
            return 0.0;
        }
        self.noise_draw.iter().map(|d| d.abs()).sum::<f64>() / self.noise_draw.len() as f64
    }
}

/// Everything a run needs before noise is drawn, for one or more phases
struct Evaluated {
    model_grid: WavelengthGrid,
    model_flux: Array2<f64>,
    overlap_grid: WavelengthGrid,
    overlap_flux: Array2<f64>,
    scaled: ScaledNoise,
}

/// Synthesizes prism observations against one shared reference noise table.
///
/// The table is read-only and held behind an `Arc`, so any number of
/// synthesizers on any number of threads can share it. Each run needs its own
/// noise source.
#[derive(Debug, Clone)]
pub struct SpectrumSynthesizer {
    table: Arc<ReferenceNoiseTable>,
    config: SynthesisConfig,
    scaler: ExposureNoiseScaler,
}

impl SpectrumSynthesizer {
    pub fn new(table: Arc<ReferenceNoiseTable>) -> Self {
        Self::with_config(table, SynthesisConfig::default())
    }

    pub fn with_config(table: Arc<ReferenceNoiseTable>, config: SynthesisConfig) -> Self {
        Self {
            table,
            config,
            scaler: ExposureNoiseScaler::new(config.min_plausible_exposure_s),
        }
    }

    pub fn table(&self) -> &ReferenceNoiseTable {
        &self.table
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize a truth and an observed spectrum at the first of `time_phases`.
    ///
    /// Further phases are accepted but not materialized; use
    /// [`synthesize_phases`](Self::synthesize_phases) for one result per phase.
    ///
    /// # Errors
    /// - [`SynthesisError::NoPhases`] when `time_phases` is empty
    /// - [`SynthesisError::Parameters`] for non-finite parameters or negative redshift
    /// - [`SynthesisError::Exposure`] for a non-positive exposure
    /// - [`SynthesisError::Model`] when the model rejects the parameters, fails
    ///   to evaluate, or returns a flux matrix of the wrong shape
    pub fn synthesize<M, N>(
        &self,
        model: &mut M,
        params: &ModelParameters,
        requested_exposure_s: f64,
        time_phases: &[f64],
        noise: &mut N,
    ) -> Result<Synthesis, SynthesisError>
    where
        M: SpectralModel + ?Sized,
        N: NoiseSource + ?Sized,
    {
        let first = time_phases.first().ok_or(SynthesisError::NoPhases)?;
        let evaluated = self.evaluate(model, params, requested_exposure_s, &[*first])?;
        evaluated.realize(0, *first, noise)
    }

    /// Synthesize one result per entry of `time_phases`, in order.
    ///
    /// The model is evaluated for all phases up front; each phase then gets
    /// its own independent draw from `noise`.
    pub fn synthesize_phases<M, N>(
        &self,
        model: &mut M,
        params: &ModelParameters,
        requested_exposure_s: f64,
        time_phases: &[f64],
        noise: &mut N,
    ) -> Result<Vec<Synthesis>, SynthesisError>
    where
        M: SpectralModel + ?Sized,
        N: NoiseSource + ?Sized,
    {
        if time_phases.is_empty() {
            return Err(SynthesisError::NoPhases);
        }
        let evaluated = self.evaluate(model, params, requested_exposure_s, time_phases)?;
        time_phases
            .iter()
            .enumerate()
            .map(|(row, &phase)| evaluated.realize(row, phase, noise))
            .collect()
    }

    fn evaluate<M: SpectralModel + ?Sized>(
        &self,
        model: &mut M,
        params: &ModelParameters,
        requested_exposure_s: f64,
        phases: &[f64],
    ) -> Result<Evaluated, SynthesisError> {
        params.validate()?;
        model.set(params)?;

        let (minwave, maxwave) = (model.minwave(), model.maxwave());
        let model_grid = WavelengthGrid::unit_spaced(minwave, maxwave)?;
        let model_flux = model.flux(model_grid.values(), phases)?;
        check_shape(&model_flux, (phases.len(), model_grid.len()))?;
        log::debug!(
            "Model support {minwave:.1}..{maxwave:.1} Å, {} native samples",
            model_grid.len()
        );

        let mask = self.table.overlap_mask(minwave, maxwave);
        let overlap_grid = self.table.wavelengths_at(&mask)?;
        let reference_noise = self.table.noise_at(&mask)?;

        let scaled = self.scaler.scale(
            &reference_noise,
            self.config.reference_exposure_s,
            requested_exposure_s,
        )?;

        let overlap_flux = if overlap_grid.is_empty() {
            log::info!(
                "Model support {minwave:.1}..{maxwave:.1} Å does not overlap the reference table"
            );
            Array2::zeros((phases.len(), 0))
        } else {
            let flux = model.flux(overlap_grid.values(), phases)?;
            check_shape(&flux, (phases.len(), overlap_grid.len()))?;
            flux
        };
        log::debug!(
            "{} of {} reference samples overlap, noise scale factor {:.4} at {} s",
            overlap_grid.len(),
            self.table.len(),
            scaled.scale_factor,
            requested_exposure_s
        );

        Ok(Evaluated {
            model_grid,
            model_flux,
            overlap_grid,
            overlap_flux,
            scaled,
        })
    }
}

impl Evaluated {
    fn realize<N: NoiseSource + ?Sized>(
        &self,
        row: usize,
        phase: f64,
        noise: &mut N,
    ) -> Result<Synthesis, SynthesisError> {
        let true_spectrum = TrueSpectrum::new(
            self.model_grid.clone(),
            self.model_flux.row(row).to_vec(),
            phase,
        )?;

        let model_flux = self.overlap_flux.row(row).to_vec();
        let noise_draw = gaussian_realization(&self.scaled.noise, noise);
        let observed: Vec<f64> = model_flux
            .iter()
            .zip(&noise_draw)
            .zip(&self.scaled.noise)
            .map(|((f, d), n)| (f + d) / n)
            .collect();
        let observed_spectrum = ObservedSpectrum::new(self.overlap_grid.clone(), observed, phase)?;

        Ok(Synthesis {
            true_spectrum,
            observed_spectrum,
            model_flux,
            rescaled_noise: self.scaled.noise.clone(),
            noise_draw,
            noise_scale_factor: self.scaled.scale_factor,
            advisory: self.scaled.advisory,
        })
    }
}

fn check_shape(flux: &Array2<f64>, expected: (usize, usize)) -> Result<(), ModelEvaluationError> {
    let found = flux.dim();
    if found != expected {
        return Err(ModelEvaluationError::ShapeMismatch { expected, found });
    }
    Ok(())
}
