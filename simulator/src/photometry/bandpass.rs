//! Photometric bandpass transmission curves.
//!
//! A bandpass is a piecewise linear transmission curve T(λ) in [0, 1] over an
//! ångström wavelength axis, zero outside its tabulated range. Bandpasses are
//! the filter side of [`bandflux`](super::bandflux) integration.
//!
//! ```rust
//! use prism_sim::photometry::{Band, Bandpass};
//!
//! let window = Band::from_aa_bounds(8000.0, 9200.0).unwrap();
//! let tophat = Bandpass::tophat(&window, 1.0).unwrap();
//!
//! assert_eq!(tophat.at(8500.0), 1.0);
//! assert_eq!(tophat.at(7000.0), 0.0);
//! ```

use shared::algo::{interp, is_strictly_ascending};
use thiserror::Error;

use super::spectrum::Band;

/// Errors that can occur when building a bandpass
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandpassError {
    #[error("Wavelength and transmission vectors must have the same length")]
    LengthMismatch,

    #[error("Bandpass needs at least two samples")]
    TooFewSamples,

    #[error("Wavelengths must be in ascending order")]
    NotAscending,

    #[error("Transmission values must be between 0.0 and 1.0")]
    OutOfRange,
}

/// Wavelength-dependent transmission with linear interpolation between samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Bandpass {
    /// Wavelengths in Å
    wavelengths: Vec<f64>,

    /// Transmission (0.0 to 1.0) at each wavelength
    transmission: Vec<f64>,
}

impl Bandpass {
    /// Create a bandpass from tabulated transmission.
    ///
    /// # Errors
    /// - The vectors have different lengths or fewer than two samples
    /// - Wavelengths are not strictly ascending
    /// - Any transmission value is outside [0.0, 1.0]
    pub fn from_table(
        wavelengths: Vec<f64>,
        transmission: Vec<f64>,
    ) -> Result<Self, BandpassError> {
        if wavelengths.len() != transmission.len() {
            return Err(BandpassError::LengthMismatch);
        }
        if wavelengths.len() < 2 {
            return Err(BandpassError::TooFewSamples);
        }
        if !is_strictly_ascending(&wavelengths) {
            return Err(BandpassError::NotAscending);
        }
        if transmission.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(BandpassError::OutOfRange);
        }

        Ok(Self {
            wavelengths,
            transmission,
        })
    }

    /// Rectangular passband with constant transmission inside `band`.
    ///
    /// Transmission drops to zero within a hair of each edge, so both band
    /// edges themselves are fully transmitted.
    pub fn tophat(band: &Band, transmission: f64) -> Result<Self, BandpassError> {
        if !(0.0..=1.0).contains(&transmission) {
            return Err(BandpassError::OutOfRange);
        }

        // Small against a 1 Å grid, large enough to survive rounding
        let smol = 1e-6;

        Self::from_table(
            vec![
                band.lower_aa - smol,
                band.lower_aa,
                band.upper_aa,
                band.upper_aa + smol,
            ],
            vec![0.0, transmission, transmission, 0.0],
        )
    }

    /// Transmission at `wavelength_aa`, zero outside the tabulated range.
    pub fn at(&self, wavelength_aa: f64) -> f64 {
        interp(wavelength_aa, &self.wavelengths, &self.transmission).unwrap_or(0.0)
    }

    /// Tabulated wavelength range
    pub fn band(&self) -> Band {
        Band {
            lower_aa: self.wavelengths[0],
            upper_aa: self.wavelengths[self.wavelengths.len() - 1],
        }
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn transmission(&self) -> &[f64] {
        &self.transmission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_table_validation() {
        assert_eq!(
            Bandpass::from_table(vec![1.0, 2.0], vec![0.5]),
            Err(BandpassError::LengthMismatch)
        );
        assert_eq!(
            Bandpass::from_table(vec![1.0], vec![0.5]),
            Err(BandpassError::TooFewSamples)
        );
        assert_eq!(
            Bandpass::from_table(vec![2.0, 1.0], vec![0.5, 0.5]),
            Err(BandpassError::NotAscending)
        );
        assert_eq!(
            Bandpass::from_table(vec![1.0, 2.0], vec![0.5, 1.5]),
            Err(BandpassError::OutOfRange)
        );
    }

    #[test]
    fn test_interpolation() {
        let bp =
            Bandpass::from_table(vec![4000.0, 5000.0, 6000.0], vec![0.0, 0.8, 0.4]).unwrap();
        assert_eq!(bp.at(5000.0), 0.8);
        assert_relative_eq!(bp.at(4500.0), 0.4, epsilon = 1e-12);
        assert_relative_eq!(bp.at(5500.0), 0.6, epsilon = 1e-12);
        assert_eq!(bp.at(3999.0), 0.0);
        assert_eq!(bp.at(6001.0), 0.0);
    }

    #[test]
    fn test_tophat() {
        let band = Band::from_aa_bounds(8000.0, 9200.0).unwrap();
        let bp = Bandpass::tophat(&band, 0.9).unwrap();

        assert_eq!(bp.at(8000.0), 0.9);
        assert_eq!(bp.at(8600.0), 0.9);
        assert_eq!(bp.at(9200.0), 0.9);
        assert_eq!(bp.at(7999.0), 0.0);
        assert_eq!(bp.at(9201.0), 0.0);

        let covered = bp.band();
        assert!(covered.lower_aa < 8000.0 && covered.upper_aa > 9200.0);

        assert_eq!(
            Bandpass::tophat(&band, 1.2),
            Err(BandpassError::OutOfRange)
        );
    }
}
