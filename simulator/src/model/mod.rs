//! Supernova spectral model boundary.
//!
//! The physical source model (for example a trained spectral embedding) lives
//! outside this crate. The pipeline only talks to it through
//! [`SpectralModel`]: configure it with typed [`ModelParameters`], ask for its
//! wavelength support, and evaluate flux on a grid for one or more phases.
//!
//! [`blackbody::BlackbodySupernovaModel`] is an analytic stand-in that
//! implements the same trait so the pipeline can run end to end.

pub mod blackbody;

use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;

pub use blackbody::BlackbodySupernovaModel;

/// Number of embedding coordinates carried by [`ModelParameters`]
pub const EMBEDDING_DIMENSIONS: usize = 3;

/// Invalid model parameters, caught before the model is touched
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Parameter {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Redshift must be non-negative, got {0}")]
    NegativeRedshift(f64),
}

/// Failures reported by a spectral model while evaluating flux
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelEvaluationError {
    #[error("Wavelength {wavelength} Å is outside model support [{min}, {max}] Å")]
    WavelengthOutOfRange { wavelength: f64, min: f64, max: f64 },

    #[error("Phase {phase} days is outside model range [{min}, {max}] days")]
    PhaseOutOfRange { phase: f64, min: f64, max: f64 },

    #[error("Model returned a {found:?} flux matrix, expected {expected:?} (phases, wavelengths)")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Model rejected parameters: {0}")]
    Rejected(String),
}

/// Physical and embedding parameters of one supernova.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    /// Redshift
    pub z: f64,
    /// Distance modulus in magnitudes
    pub dm: f64,
    /// Host extinction A_V in magnitudes
    pub av: f64,
    /// Embedding coordinates (xi1, xi2, xi3)
    pub xi: [f64; EMBEDDING_DIMENSIONS],
}

impl ModelParameters {
    pub fn new(z: f64, dm: f64, av: f64, xi: [f64; EMBEDDING_DIMENSIONS]) -> Self {
        Self { z, dm, av, xi }
    }

    /// Draw parameters around a typical supernova at redshift `z`.
    ///
    /// `dm ~ 43 + N(0, 1)`, `av ~ 1 + N(0, 1)` and each `xi ~ N(0, 1)`.
    pub fn sample<R: Rng + ?Sized>(z: f64, rng: &mut R) -> Self {
        let mut normal = || -> f64 { rng.sample(StandardNormal) };
        let dm = 43.0 + normal();
        let av = 1.0 + normal();
        let xi = [normal(), normal(), normal()];
        Self { z, dm, av, xi }
    }

    /// Parameters paired with their conventional names
    pub fn named_values(&self) -> [(&'static str, f64); 3 + EMBEDDING_DIMENSIONS] {
        [
            ("z", self.z),
            ("dm", self.dm),
            ("av", self.av),
            ("xi1", self.xi[0]),
            ("xi2", self.xi[1]),
            ("xi3", self.xi[2]),
        ]
    }

    /// Check the parameters can be handed to a model.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in self.named_values() {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { name, value });
            }
        }
        if self.z < 0.0 {
            return Err(ParameterError::NegativeRedshift(self.z));
        }
        Ok(())
    }
}

/// A parametric spectral source the synthesis pipeline can evaluate.
///
/// Wavelengths are observer-frame ångström, phases are days relative to
/// peak, and flux is spectral flux density in erg s⁻¹ cm⁻² Å⁻¹.
pub trait SpectralModel {
    /// Configure the model; parameters have already been validated.
    fn set(&mut self, params: &ModelParameters) -> Result<(), ModelEvaluationError>;

    /// Shortest wavelength the model is defined at
    fn minwave(&self) -> f64;

    /// Longest wavelength the model is defined at
    fn maxwave(&self) -> f64;

    /// Flux matrix with one row per phase and one column per wavelength.
    fn flux(&self, wavelengths: &[f64], phases: &[f64])
        -> Result<Array2<f64>, ModelEvaluationError>;
}
