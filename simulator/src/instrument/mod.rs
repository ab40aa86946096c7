//! Prism spectrograph instrument characteristics
//!
//! - **noise_table**: the tabulated one hour reference noise curve
//! - **exposure**: rescaling that curve to other exposure times

pub mod exposure;
pub mod noise_table;

pub use exposure::{
    noise_scale_factor, scale_reference_noise, ExposureAdvisory, ExposureError,
    ExposureNoiseScaler, ScaledNoise, MIN_PLAUSIBLE_EXPOSURE_S,
};
pub use noise_table::{
    NoiseTableError, ReferenceNoiseSample, ReferenceNoiseTable, REFERENCE_EXPOSURE_S,
};
