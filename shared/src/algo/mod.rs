//! Numerical algorithms shared across crates

pub mod misc;

pub use misc::{interp, is_strictly_ascending, trap_integrate, InterpError};
