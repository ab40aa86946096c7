//! Analytic stand-in for a Type Ia supernova spectral model.
//!
//! A cooling blackbody photosphere with a single broad Si II-like absorption
//! trough near 6150 Å, dimmed by a simple λ⁻¹ extinction law and placed at
//! the requested distance and redshift. It is not a trained embedding model,
//! but it answers the same [`SpectralModel`] questions so the synthesis
//! pipeline and the command line tools can run without one.
//!
//! The embedding coordinates map onto the shape as follows:
//! - `xi1` shifts the peak photospheric temperature (800 K per unit)
//! - `xi2` deepens the absorption trough
//! - `xi3` widens the absorption trough

use ndarray::Array2;

use super::{ModelEvaluationError, ModelParameters, SpectralModel};
use crate::photometry::spectrum::CGS;

/// Rest-frame wavelength support in Å
pub const REST_MIN_WAVE_AA: f64 = 3300.0;
pub const REST_MAX_WAVE_AA: f64 = 8600.0;

/// Phase support in days relative to peak
pub const MIN_PHASE_DAYS: f64 = -20.0;
pub const MAX_PHASE_DAYS: f64 = 50.0;

/// Peak absolute AB magnitude at [`NORMALIZATION_WAVE_AA`]
pub const PEAK_ABSOLUTE_MAGNITUDE: f64 = -19.1;

/// Rest wavelength where the peak magnitude is pinned (roughly B band)
pub const NORMALIZATION_WAVE_AA: f64 = 4400.0;

const PEAK_TEMPERATURE_K: f64 = 11_000.0;
const TEMPERATURE_PER_XI1_K: f64 = 800.0;
const COOLING_K_PER_DAY: f64 = 100.0;
const MIN_TEMPERATURE_K: f64 = 4000.0;

const TROUGH_CENTER_AA: f64 = 6150.0;
const TROUGH_DEPTH: f64 = 0.35;
const TROUGH_WIDTH_AA: f64 = 90.0;

const RISE_MAG_PER_DAY2: f64 = 0.004;
const DECLINE_MAG_PER_DAY: f64 = 0.03;

const EXTINCTION_PIVOT_AA: f64 = 5500.0;

/// Blackbody-photosphere supernova with a single absorption feature.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackbodySupernovaModel {
    params: ModelParameters,
}

impl Default for BlackbodySupernovaModel {
    fn default() -> Self {
        Self {
            params: ModelParameters::new(0.0, 0.0, 0.0, [0.0; 3]),
        }
    }
}

impl BlackbodySupernovaModel {
    /// Model configured with `params`
    pub fn new(params: ModelParameters) -> Result<Self, ModelEvaluationError> {
        let mut model = Self::default();
        model.set(&params)?;
        Ok(model)
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.params
    }

    /// Photospheric temperature at `phase_days`
    pub fn temperature(&self, phase_days: f64) -> f64 {
        let peak = PEAK_TEMPERATURE_K + TEMPERATURE_PER_XI1_K * self.params.xi[0];
        (peak - COOLING_K_PER_DAY * phase_days).max(MIN_TEMPERATURE_K)
    }

    /// Magnitudes of dimming relative to peak
    fn light_curve_offset(phase_days: f64) -> f64 {
        if phase_days < 0.0 {
            RISE_MAG_PER_DAY2 * phase_days * phase_days
        } else {
            DECLINE_MAG_PER_DAY * phase_days
        }
    }

    /// Fractional transmission through the absorption trough at `rest_aa`
    fn trough(&self, rest_aa: f64) -> f64 {
        let depth = (TROUGH_DEPTH + 0.1 * self.params.xi[1]).clamp(0.0, 0.9);
        let width = TROUGH_WIDTH_AA * (0.2 * self.params.xi[2]).exp();
        let x = (rest_aa - TROUGH_CENTER_AA) / width;
        1.0 - depth * (-0.5 * x * x).exp()
    }

    /// Planck B_λ, up to a constant, at `wavelength_aa`
    fn planck_shape(wavelength_aa: f64, temperature: f64) -> f64 {
        let wavelength_cm = wavelength_aa * CGS::ANGSTROM_IN_CM;
        let exponent = (CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT)
            / (wavelength_cm * CGS::BOLTZMANN_CONSTANT * temperature);
        1.0 / (wavelength_cm.powi(5) * exponent.exp_m1())
    }

    /// Rest-frame F_λ at the normalization wavelength for the configured distance
    fn peak_flux_density(&self) -> f64 {
        let apparent = PEAK_ABSOLUTE_MAGNITUDE + self.params.dm;
        let f_nu = CGS::AB_ZERO_POINT_FLUX_DENSITY * 10f64.powf(-0.4 * apparent);
        f_nu * CGS::SPEED_OF_LIGHT_AA / (NORMALIZATION_WAVE_AA * NORMALIZATION_WAVE_AA)
    }

    fn flux_at(&self, observed_aa: f64, phase_days: f64, amplitude: f64, peak_shape: f64) -> f64 {
        let one_plus_z = 1.0 + self.params.z;
        let rest_aa = observed_aa / one_plus_z;
        let temperature = self.temperature(phase_days);

        let continuum = Self::planck_shape(rest_aa, temperature) / peak_shape;
        let dimming_mag = Self::light_curve_offset(phase_days)
            + self.params.av * EXTINCTION_PIVOT_AA / rest_aa;

        amplitude * continuum * self.trough(rest_aa) * 10f64.powf(-0.4 * dimming_mag) / one_plus_z
    }
}

impl SpectralModel for BlackbodySupernovaModel {
    fn set(&mut self, params: &ModelParameters) -> Result<(), ModelEvaluationError> {
        params
            .validate()
            .map_err(|e| ModelEvaluationError::Rejected(e.to_string()))?;
        self.params = *params;
        Ok(())
    }

    fn minwave(&self) -> f64 {
        REST_MIN_WAVE_AA * (1.0 + self.params.z)
    }

    fn maxwave(&self) -> f64 {
        REST_MAX_WAVE_AA * (1.0 + self.params.z)
    }

    fn flux(
        &self,
        wavelengths: &[f64],
        phases: &[f64],
    ) -> Result<Array2<f64>, ModelEvaluationError> {
        let (min, max) = (self.minwave(), self.maxwave());
        if let Some(&wavelength) = wavelengths.iter().find(|&&w| !(min..=max).contains(&w)) {
            return Err(ModelEvaluationError::WavelengthOutOfRange {
                wavelength,
                min,
                max,
            });
        }
        if let Some(&phase) = phases
            .iter()
            .find(|&&p| !(MIN_PHASE_DAYS..=MAX_PHASE_DAYS).contains(&p))
        {
            return Err(ModelEvaluationError::PhaseOutOfRange {
                phase,
                min: MIN_PHASE_DAYS,
                max: MAX_PHASE_DAYS,
            });
        }

        let amplitude = self.peak_flux_density();
        let peak_shape = Self::planck_shape(NORMALIZATION_WAVE_AA, self.temperature(0.0))
            * self.trough(NORMALIZATION_WAVE_AA);

        Ok(Array2::from_shape_fn(
            (phases.len(), wavelengths.len()),
            |(i, j)| self.flux_at(wavelengths[j], phases[i], amplitude, peak_shape),
        ))
    }
}
