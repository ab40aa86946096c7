//! Sampled spectra and the wavelength grids they live on.
//!
//! Two kinds of spectra flow out of the synthesis pipeline and they are not
//! interchangeable:
//!
//! - **Physical flux density** (erg s⁻¹ cm⁻² Å⁻¹), the noiseless model output
//! - **Signal-to-noise per resolution element**, the simulated prism
//!   observation after noise injection and division by the noise curve
//!
//! Both are [`SampledSpectrum`]s, tagged with a zero-sized unit marker so the
//! compiler refuses to mix them. Wavelength grids likewise carry their
//! provenance ([`GridKind`]): the model's native 1 Å grid and the
//! instrument's reference grid have different sample spacing and must never
//! be conflated.
//!
//! All wavelengths in this module are in ångström.

use std::fmt;
use std::marker::PhantomData;

use shared::algo::is_strictly_ascending;
use thiserror::Error;

use super::bandflux::{BandFluxError, BandFluxIntegrator};
use super::bandpass::Bandpass;

/// Physical constants in CGS units.
pub struct CGS {}

impl CGS {
    /// AB magnitude system zero-point flux density
    /// Units: 3631e-23 erg s⁻¹ cm⁻² Hz⁻¹
    pub const AB_ZERO_POINT_FLUX_DENSITY: f64 = 3631e-23;

    /// Planck's constant
    /// Units: erg⋅s
    pub const PLANCK_CONSTANT: f64 = 6.62607015e-27;

    /// Speed of light in vacuum
    /// Units: cm/s
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

    /// Boltzmann constant
    /// Units: erg/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-16;

    /// One ångström in centimeters
    pub const ANGSTROM_IN_CM: f64 = 1e-8;

    /// Speed of light in Å/s, for F_ν ↔ F_λ conversions on ångström grids
    pub const SPEED_OF_LIGHT_AA: f64 = Self::SPEED_OF_LIGHT / Self::ANGSTROM_IN_CM;
}

/// Errors raised when building grids and spectra
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("Wavelength grid must be finite and strictly increasing")]
    NotAscending,

    #[error("Flux has {flux} samples but the wavelength grid has {wavelength}")]
    LengthMismatch { wavelength: usize, flux: usize },

    #[error("Invalid wavelength range {lower}..{upper} Å")]
    InvalidBand { lower: f64, upper: f64 },
}

/// Contiguous wavelength interval in ångström.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower wavelength bound in Å
    pub lower_aa: f64,

    /// Upper wavelength bound in Å
    pub upper_aa: f64,
}

impl Band {
    /// Create a band from its bounds.
    ///
    /// Bounds must be finite, non-negative and ordered.
    pub fn from_aa_bounds(lower_aa: f64, upper_aa: f64) -> Result<Self, SpectrumError> {
        let valid = lower_aa.is_finite() && upper_aa.is_finite() && lower_aa >= 0.0;
        if !valid || lower_aa >= upper_aa {
            return Err(SpectrumError::InvalidBand {
                lower: lower_aa,
                upper: upper_aa,
            });
        }
        Ok(Self { lower_aa, upper_aa })
    }

    /// Width of the band in Å
    pub fn width(&self) -> f64 {
        self.upper_aa - self.lower_aa
    }

    /// Center of the band in Å
    pub fn center(&self) -> f64 {
        (self.lower_aa + self.upper_aa) / 2.0
    }

    /// Inclusive containment test
    pub fn contains(&self, wavelength_aa: f64) -> bool {
        (self.lower_aa..=self.upper_aa).contains(&wavelength_aa)
    }
}

/// Where a wavelength grid came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    /// The model's own full-resolution evaluation grid (1 Å spacing)
    ModelNative,
    /// Reference noise table wavelengths, possibly restricted to an overlap
    Instrument,
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridKind::ModelNative => write!(f, "model-native"),
            GridKind::Instrument => write!(f, "instrument"),
        }
    }
}

/// Strictly increasing wavelength samples with a provenance tag.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthGrid {
    values: Vec<f64>,
    kind: GridKind,
}

impl WavelengthGrid {
    /// Wrap wavelength samples, checking they are finite and strictly increasing.
    pub fn new(values: Vec<f64>, kind: GridKind) -> Result<Self, SpectrumError> {
        if values.iter().any(|w| !w.is_finite()) || !is_strictly_ascending(&values) {
            return Err(SpectrumError::NotAscending);
        }
        Ok(Self { values, kind })
    }

    /// Unit-spaced model grid covering the half-open interval `[min_aa, max_aa)`.
    ///
    /// Samples are `min_aa, min_aa + 1, ...` up to but excluding `max_aa`, so
    /// the grid has `ceil(max_aa - min_aa)` points. An inverted or degenerate
    /// interval yields an empty grid.
    pub fn unit_spaced(min_aa: f64, max_aa: f64) -> Result<Self, SpectrumError> {
        if !min_aa.is_finite() || !max_aa.is_finite() {
            return Err(SpectrumError::NotAscending);
        }
        let count = if max_aa > min_aa {
            (max_aa - min_aa).ceil() as usize
        } else {
            0
        };
        let values = (0..count).map(|i| min_aa + i as f64).collect();
        Ok(Self {
            values,
            kind: GridKind::ModelNative,
        })
    }

    /// A grid with no samples
    pub fn empty(kind: GridKind) -> Self {
        Self {
            values: Vec::new(),
            kind,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Covered range as (first, last) sample, if any
    pub fn span(&self) -> Option<(f64, f64)> {
        Some((*self.values.first()?, *self.values.last()?))
    }
}

/// Unit tag for a spectrum's flux axis.
pub trait SpectrumUnits {
    /// Human-readable unit label, used for plots and logs
    const LABEL: &'static str;
}

/// Physical spectral flux density, erg s⁻¹ cm⁻² Å⁻¹
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluxDensity;

impl SpectrumUnits for FluxDensity {
    const LABEL: &'static str = "erg s^-1 cm^-2 A^-1";
}

/// Signal-to-noise per resolution element (dimensionless)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalToNoise;

impl SpectrumUnits for SignalToNoise {
    const LABEL: &'static str = "S/N per resolution element";
}

/// Flux samples on a wavelength grid at a single time phase.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSpectrum<U: SpectrumUnits> {
    wavelength: WavelengthGrid,
    flux: Vec<f64>,
    time_phase: f64,
    units: PhantomData<U>,
}

/// Noiseless physical spectrum on the model's native grid
pub type TrueSpectrum = SampledSpectrum<FluxDensity>;

/// Simulated prism observation in signal-to-noise units
pub type ObservedSpectrum = SampledSpectrum<SignalToNoise>;

impl<U: SpectrumUnits> SampledSpectrum<U> {
    /// Pair a flux vector with its grid; lengths must agree.
    pub fn new(
        wavelength: WavelengthGrid,
        flux: Vec<f64>,
        time_phase: f64,
    ) -> Result<Self, SpectrumError> {
        if wavelength.len() != flux.len() {
            return Err(SpectrumError::LengthMismatch {
                wavelength: wavelength.len(),
                flux: flux.len(),
            });
        }
        Ok(Self {
            wavelength,
            flux,
            time_phase,
            units: PhantomData,
        })
    }

    pub fn wavelength(&self) -> &WavelengthGrid {
        &self.wavelength
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Phase (days relative to peak) the spectrum was evaluated at
    pub fn time_phase(&self) -> f64 {
        self.time_phase
    }

    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    pub fn units_label(&self) -> &'static str {
        U::LABEL
    }

    /// Iterate (wavelength, flux) pairs
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelength
            .values()
            .iter()
            .copied()
            .zip(self.flux.iter().copied())
    }

    /// Integrate this spectrum through a bandpass with the given integrator.
    pub fn bandflux<I: BandFluxIntegrator + ?Sized>(
        &self,
        integrator: &I,
        bandpass: &Bandpass,
    ) -> Result<f64, BandFluxError> {
        integrator.integrate(self.wavelength.values(), &self.flux, bandpass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_spaced_half_open() {
        let grid = WavelengthGrid::unit_spaced(3300.0, 3305.0).unwrap();
        assert_eq!(grid.values(), &[3300.0, 3301.0, 3302.0, 3303.0, 3304.0]);
        assert_eq!(grid.kind(), GridKind::ModelNative);
    }

    #[test]
    fn test_unit_spaced_fractional_bounds() {
        // Matches arange semantics: ceil(max - min) samples from min
        let grid = WavelengthGrid::unit_spaced(6600.0, 6603.5).unwrap();
        assert_eq!(grid.values(), &[6600.0, 6601.0, 6602.0, 6603.0]);

        let grid = WavelengthGrid::unit_spaced(10.25, 12.0).unwrap();
        assert_eq!(grid.values(), &[10.25, 11.25]);
    }

    #[test]
    fn test_unit_spaced_degenerate() {
        assert!(WavelengthGrid::unit_spaced(5.0, 5.0).unwrap().is_empty());
        assert!(WavelengthGrid::unit_spaced(6.0, 5.0).unwrap().is_empty());
        assert_eq!(
            WavelengthGrid::unit_spaced(f64::NAN, 5.0),
            Err(SpectrumError::NotAscending)
        );
    }

    #[test]
    fn test_grid_rejects_unsorted() {
        assert_eq!(
            WavelengthGrid::new(vec![1.0, 3.0, 2.0], GridKind::Instrument),
            Err(SpectrumError::NotAscending)
        );
        assert_eq!(
            WavelengthGrid::new(vec![1.0, 1.0], GridKind::Instrument),
            Err(SpectrumError::NotAscending)
        );
        assert_eq!(
            WavelengthGrid::new(vec![1.0, f64::INFINITY], GridKind::Instrument),
            Err(SpectrumError::NotAscending)
        );
    }

    #[test]
    fn test_spectrum_length_invariant() {
        let grid = WavelengthGrid::new(vec![1.0, 2.0, 3.0], GridKind::Instrument).unwrap();
        let err = ObservedSpectrum::new(grid.clone(), vec![1.0, 2.0], 0.0).unwrap_err();
        assert_eq!(
            err,
            SpectrumError::LengthMismatch {
                wavelength: 3,
                flux: 2
            }
        );

        let spec = ObservedSpectrum::new(grid, vec![4.0, 5.0, 6.0], 2.5).unwrap();
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.time_phase(), 2.5);
        assert_eq!(spec.units_label(), SignalToNoise::LABEL);
        let pairs: Vec<_> = spec.samples().collect();
        assert_eq!(pairs, vec![(1.0, 4.0), (2.0, 5.0), (3.0, 6.0)]);
    }

    #[test]
    fn test_band_validation() {
        let band = Band::from_aa_bounds(4000.0, 5000.0).unwrap();
        assert_eq!(band.width(), 1000.0);
        assert_eq!(band.center(), 4500.0);
        assert!(band.contains(4000.0));
        assert!(band.contains(5000.0));
        assert!(!band.contains(5000.5));

        assert!(Band::from_aa_bounds(5000.0, 4000.0).is_err());
        assert!(Band::from_aa_bounds(-1.0, 4000.0).is_err());
        assert!(Band::from_aa_bounds(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_grid_span() {
        assert_eq!(WavelengthGrid::empty(GridKind::Instrument).span(), None);
        let grid = WavelengthGrid::unit_spaced(100.0, 110.0).unwrap();
        assert_eq!(grid.span(), Some((100.0, 109.0)));
    }
}
