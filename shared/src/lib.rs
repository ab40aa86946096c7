//! Shared components and utilities for the prism simulation crates.
//!
//! Holds the pieces that do not depend on any spectral model or instrument:
//! curve interpolation and integration, and the noise sources used to draw
//! stochastic realizations.

pub mod algo;
pub mod noise;
