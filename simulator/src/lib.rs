//! Slitless prism spectroscopy simulation for Type Ia supernovae
//!
//! This crate turns a parametric supernova spectral model into the noisy,
//! signal-to-noise calibrated spectrum a space telescope's prism would
//! record for a given exposure time, using the instrument's reference noise
//! table as the sensitivity baseline.

pub mod instrument;
pub mod model;
pub mod photometry;
pub mod shared_args;
pub mod sims;

// Re-exports for easier access
pub use instrument::{ExposureNoiseScaler, ReferenceNoiseTable, REFERENCE_EXPOSURE_S};
pub use model::{BlackbodySupernovaModel, ModelParameters, SpectralModel};
pub use photometry::spectrum::{ObservedSpectrum, TrueSpectrum, WavelengthGrid, CGS};
pub use sims::synthesis::{SpectrumSynthesizer, Synthesis, SynthesisConfig, SynthesisError};
