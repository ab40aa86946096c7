//! Exposure-time rescaling of the reference noise curve.
//!
//! Photon arrival is a Poisson process, so the 1σ noise on an integrated
//! signal shrinks with the square root of the integration time. A noise
//! curve tabulated at exposure t₀ becomes, at exposure t,
//!
//! ```text
//! σ(t) = σ(t₀) × (t / t₀)^(-1/2)
//! ```
//!
//! Exposures are plain seconds. Values under a few minutes almost always mean
//! the caller passed hours or minutes by mistake; those are still used as
//! given, but flagged with an [`ExposureAdvisory`].

use std::fmt;

use thiserror::Error;

use super::noise_table::REFERENCE_EXPOSURE_S;

/// Requested exposures below this many seconds get an advisory.
pub const MIN_PLAUSIBLE_EXPOSURE_S: f64 = 200.0;

/// Exposure values for which the scaling law is undefined
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExposureError {
    #[error("Requested exposure must be a positive number of seconds, got {0}")]
    NonPositive(f64),

    #[error("Reference exposure must be a positive number of seconds, got {0}")]
    InvalidReference(f64),
}

/// Non-fatal warning about a requested exposure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExposureAdvisory {
    /// Exposure is shorter than the plausibility threshold
    ImplausiblySmall { exposure_s: f64, threshold_s: f64 },
}

impl fmt::Display for ExposureAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureAdvisory::ImplausiblySmall {
                exposure_s,
                threshold_s,
            } => write!(
                f,
                "Exposure time is in seconds; {exposure_s} s is below {threshold_s} s and may be in other units"
            ),
        }
    }
}

/// Noise curve rescaled to a requested exposure.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledNoise {
    /// Rescaled 1σ noise, row-aligned with the input curve
    pub noise: Vec<f64>,
    /// Multiplier applied to every input value
    pub scale_factor: f64,
    /// Set when the requested exposure looked implausible
    pub advisory: Option<ExposureAdvisory>,
}

/// Multiplier taking noise at `reference_exposure_s` to `requested_exposure_s`.
pub fn noise_scale_factor(
    reference_exposure_s: f64,
    requested_exposure_s: f64,
) -> Result<f64, ExposureError> {
    if !(reference_exposure_s.is_finite() && reference_exposure_s > 0.0) {
        return Err(ExposureError::InvalidReference(reference_exposure_s));
    }
    if !(requested_exposure_s.is_finite() && requested_exposure_s > 0.0) {
        return Err(ExposureError::NonPositive(requested_exposure_s));
    }
    Ok((requested_exposure_s / reference_exposure_s).powf(-0.5))
}

/// Rescales reference noise curves with the inverse square root law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureNoiseScaler {
    /// Exposures below this raise an [`ExposureAdvisory`]
    pub min_plausible_exposure_s: f64,
}

impl Default for ExposureNoiseScaler {
    fn default() -> Self {
        Self {
            min_plausible_exposure_s: MIN_PLAUSIBLE_EXPOSURE_S,
        }
    }
}

impl ExposureNoiseScaler {
    pub fn new(min_plausible_exposure_s: f64) -> Self {
        Self {
            min_plausible_exposure_s,
        }
    }

    /// Advisory for `requested_exposure_s`, if it looks like the wrong units.
    pub fn advise(&self, requested_exposure_s: f64) -> Option<ExposureAdvisory> {
        (requested_exposure_s < self.min_plausible_exposure_s).then_some(
            ExposureAdvisory::ImplausiblySmall {
                exposure_s: requested_exposure_s,
                threshold_s: self.min_plausible_exposure_s,
            },
        )
    }

    /// Rescale `reference_noise` from `reference_exposure_s` to `requested_exposure_s`.
    ///
    /// An implausibly short exposure is logged and reported in the result but
    /// does not stop the computation.
    ///
    /// # Errors
    /// `ExposureError` when either exposure is non-positive or not finite.
    pub fn scale(
        &self,
        reference_noise: &[f64],
        reference_exposure_s: f64,
        requested_exposure_s: f64,
    ) -> Result<ScaledNoise, ExposureError> {
        let scale_factor = noise_scale_factor(reference_exposure_s, requested_exposure_s)?;

        let advisory = self.advise(requested_exposure_s);
        if let Some(advisory) = &advisory {
            log::warn!("{advisory}");
        }

        let noise = reference_noise.iter().map(|n| n * scale_factor).collect();

        Ok(ScaledNoise {
            noise,
            scale_factor,
            advisory,
        })
    }
}

/// Rescale a noise curve tabulated at the one hour reference exposure.
pub fn scale_reference_noise(
    reference_noise: &[f64],
    requested_exposure_s: f64,
) -> Result<ScaledNoise, ExposureError> {
    ExposureNoiseScaler::default().scale(reference_noise, REFERENCE_EXPOSURE_S, requested_exposure_s)
}
