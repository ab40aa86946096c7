//! Noise sources and realizations

pub mod generate;

pub use generate::{gaussian_realization, FixedDeviate, GaussianNoise, NoiseSource, ZeroNoise};
