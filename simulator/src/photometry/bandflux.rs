//! Band-integrated fluxes of sampled spectra.
//!
//! Spectra hand their samples to a [`BandFluxIntegrator`], so the photometric
//! convention stays swappable. [`PhotonCountIntegrator`] is the usual
//! photon-counting definition used for synthetic photometry:
//!
//! ```text
//! F_band = ∫ f(λ) T(λ) λ / (h c) dλ
//! ```
//!
//! With f in erg s⁻¹ cm⁻² Å⁻¹ and λ in Å, F_band is in photons s⁻¹ cm⁻².

use shared::algo::{trap_integrate, InterpError};
use thiserror::Error;

use super::bandpass::Bandpass;
use super::spectrum::CGS;

/// Errors raised while integrating a spectrum through a bandpass
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandFluxError {
    #[error("Bandpass {band_lower}..{band_upper} Å is not covered by spectrum {spec_lower}..{spec_upper} Å")]
    OutsideSpectrum {
        band_lower: f64,
        band_upper: f64,
        spec_lower: f64,
        spec_upper: f64,
    },

    #[error("Spectrum has no samples")]
    EmptySpectrum,

    #[error("Spectrum has fewer than two samples inside the bandpass")]
    InsufficientSamples,

    #[error(transparent)]
    Integration(#[from] InterpError),
}

/// Turns (wavelength, flux) samples and a bandpass into a scalar flux.
pub trait BandFluxIntegrator {
    fn integrate(
        &self,
        wavelengths: &[f64],
        flux: &[f64],
        bandpass: &Bandpass,
    ) -> Result<f64, BandFluxError>;
}

/// Photon-counting band flux with trapezoidal integration on the spectrum grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotonCountIntegrator;

impl PhotonCountIntegrator {
    /// h·c in erg·Å
    const HC_ERG_AA: f64 = CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT_AA;
}

impl BandFluxIntegrator for PhotonCountIntegrator {
    fn integrate(
        &self,
        wavelengths: &[f64],
        flux: &[f64],
        bandpass: &Bandpass,
    ) -> Result<f64, BandFluxError> {
        if wavelengths.is_empty() {
            return Err(BandFluxError::EmptySpectrum);
        }

        let spec_lower = wavelengths[0];
        let spec_upper = wavelengths[wavelengths.len() - 1];

        // Only the non-zero part of the curve has to be covered
        let nonzero: Vec<f64> = bandpass
            .wavelengths()
            .iter()
            .zip(bandpass.transmission())
            .filter(|&(_, &t)| t > 0.0)
            .map(|(&w, _)| w)
            .collect();
        let (band_lower, band_upper) = match (nonzero.first(), nonzero.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => return Ok(0.0),
        };

        if band_lower < spec_lower || band_upper > spec_upper {
            return Err(BandFluxError::OutsideSpectrum {
                band_lower,
                band_upper,
                spec_lower,
                spec_upper,
            });
        }

        let support = bandpass.band();
        let (xs, ys): (Vec<f64>, Vec<f64>) = wavelengths
            .iter()
            .zip(flux)
            .filter(|&(&w, _)| support.contains(w))
            .map(|(&w, &f)| (w, f * bandpass.at(w) * w / Self::HC_ERG_AA))
            .unzip();

        if xs.len() < 2 {
            return Err(BandFluxError::InsufficientSamples);
        }

        Ok(trap_integrate(&xs, &ys)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::spectrum::{Band, GridKind, TrueSpectrum, WavelengthGrid};
    use approx::assert_relative_eq;

    fn flat_spectrum(level: f64, lower: f64, upper: f64) -> TrueSpectrum {
        let grid = WavelengthGrid::unit_spaced(lower, upper).unwrap();
        let flux = vec![level; grid.len()];
        TrueSpectrum::new(grid, flux, 0.0).unwrap()
    }

    #[test]
    fn test_flat_spectrum_through_tophat() {
        let level = 2.0e-17;
        let spec = flat_spectrum(level, 7000.0, 10000.0);
        let band = Band::from_aa_bounds(8000.0, 9000.0).unwrap();
        let bp = Bandpass::tophat(&band, 1.0).unwrap();

        let flux = spec.bandflux(&PhotonCountIntegrator, &bp).unwrap();

        // ∫ level λ / hc dλ over [a, b], exact for trapezoids on a linear integrand
        let expected =
            level * (9000.0_f64.powi(2) - 8000.0_f64.powi(2)) / 2.0 / PhotonCountIntegrator::HC_ERG_AA;
        assert_relative_eq!(flux, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_transmission_scales_linearly() {
        let spec = flat_spectrum(1.0e-17, 7000.0, 10000.0);
        let band = Band::from_aa_bounds(8000.0, 9000.0).unwrap();
        let full = spec
            .bandflux(&PhotonCountIntegrator, &Bandpass::tophat(&band, 1.0).unwrap())
            .unwrap();
        let half = spec
            .bandflux(&PhotonCountIntegrator, &Bandpass::tophat(&band, 0.5).unwrap())
            .unwrap();
        assert_relative_eq!(half, 0.5 * full, max_relative = 1e-12);
    }

    #[test]
    fn test_band_outside_spectrum() {
        let spec = flat_spectrum(1.0, 3300.0, 8600.0);
        let band = Band::from_aa_bounds(8000.0, 9200.0).unwrap();
        let bp = Bandpass::tophat(&band, 1.0).unwrap();
        assert!(matches!(
            spec.bandflux(&PhotonCountIntegrator, &bp),
            Err(BandFluxError::OutsideSpectrum { .. })
        ));
    }

    #[test]
    fn test_empty_spectrum() {
        let spec = TrueSpectrum::new(WavelengthGrid::empty(GridKind::Instrument), vec![], 0.0)
            .unwrap();
        let band = Band::from_aa_bounds(8000.0, 9200.0).unwrap();
        let bp = Bandpass::tophat(&band, 1.0).unwrap();
        assert_eq!(
            spec.bandflux(&PhotonCountIntegrator, &bp),
            Err(BandFluxError::EmptySpectrum)
        );
    }

    #[test]
    fn test_sparse_grid_inside_band() {
        let grid = WavelengthGrid::new(vec![7000.0, 8500.0, 10000.0], GridKind::Instrument).unwrap();
        let spec = TrueSpectrum::new(grid, vec![1.0, 1.0, 1.0], 0.0).unwrap();
        let band = Band::from_aa_bounds(8000.0, 9000.0).unwrap();
        let bp = Bandpass::tophat(&band, 1.0).unwrap();
        assert_eq!(
            spec.bandflux(&PhotonCountIntegrator, &bp),
            Err(BandFluxError::InsufficientSamples)
        );
    }
}
