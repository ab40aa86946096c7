//! Noise generation for simulated spectra.
//!
//! Every stochastic draw in the workspace goes through the [`NoiseSource`]
//! trait, so callers own (and seed) the generator and tests can swap in a
//! deterministic double.
//!
//! # Sources
//! - [`GaussianNoise`]: zero-mean normal deviates from a caller-supplied `Rng`
//! - [`ZeroNoise`]: always zero, for noiseless signal-to-noise curves
//! - [`FixedDeviate`]: a fixed number of standard deviations, for tests
//!
//! # Usage
//! Build one source per simulation. Sharing a single source between
//! concurrent simulations correlates their noise; give each its own seed.

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;

/// Supplier of zero-mean noise deviates with a given standard deviation.
pub trait NoiseSource {
    /// Draw one sample from Normal(0, sigma).
    fn draw(&mut self, sigma: f64) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn draw(&mut self, sigma: f64) -> f64 {
        (**self).draw(sigma)
    }
}

/// Gaussian noise drawn from a caller-owned random number generator.
#[derive(Debug, Clone)]
pub struct GaussianNoise<R: Rng> {
    rng: R,
}

impl<R: Rng> GaussianNoise<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Give back the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl GaussianNoise<StdRng> {
    /// Gaussian noise from a `StdRng` seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Gaussian noise seeded from the thread-local generator.
    ///
    /// The seed is returned alongside so the run can be reproduced.
    pub fn unseeded() -> (Self, u64) {
        let seed = thread_rng().next_u64();
        (Self::seeded(seed), seed)
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    fn draw(&mut self, sigma: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        sigma * z
    }
}

/// Noise source that never perturbs the signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn draw(&mut self, _sigma: f64) -> f64 {
        0.0
    }
}

/// Noise source that always returns `deviate` standard deviations.
#[derive(Debug, Clone, Copy)]
pub struct FixedDeviate(pub f64);

impl NoiseSource for FixedDeviate {
    fn draw(&mut self, sigma: f64) -> f64 {
        self.0 * sigma
    }
}

/// Draw one independent noise value per entry of `sigmas`.
///
/// Sample `i` is drawn from Normal(0, sigmas\[i\]), in order.
pub fn gaussian_realization<N: NoiseSource + ?Sized>(sigmas: &[f64], source: &mut N) -> Vec<f64> {
    sigmas.iter().map(|&sigma| source.draw(sigma)).collect()
}
