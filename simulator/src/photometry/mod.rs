//! Spectra, bandpasses and band flux integration

pub mod bandflux;
pub mod bandpass;
pub mod spectrum;

pub use bandflux::{BandFluxError, BandFluxIntegrator, PhotonCountIntegrator};
pub use bandpass::{Bandpass, BandpassError};
pub use spectrum::{
    Band, FluxDensity, GridKind, ObservedSpectrum, SampledSpectrum, SignalToNoise, SpectrumError,
    SpectrumUnits, TrueSpectrum, WavelengthGrid, CGS,
};
