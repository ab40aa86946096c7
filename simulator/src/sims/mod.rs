//! End-to-end simulation pipelines

pub mod synthesis;

pub use synthesis::{SpectrumSynthesizer, Synthesis, SynthesisConfig, SynthesisError};
