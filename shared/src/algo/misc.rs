//! Miscellaneous numerical helpers for sampled one-dimensional curves.
//!
//! - **Linear interpolation**: binary-search lookup on tabulated curves
//! - **Trapezoidal integration**: integrals of irregularly sampled curves
//! - **Ordering checks**: validation of wavelength axes before use

use thiserror::Error;

/// Errors that can occur during interpolation and integration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least 2 points")]
    InsufficientData,
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be sorted in ascending order")]
    UnsortedData,
}

/// Returns true when every element is strictly greater than the one before it.
///
/// Empty and single-element slices are trivially ascending.
pub fn is_strictly_ascending(xs: &[f64]) -> bool {
    xs.windows(2).all(|pair| pair[1] > pair[0])
}

fn check_curve(xs: &[f64], ys: &[f64]) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }
    if xs.len() < 2 {
        return Err(InterpError::InsufficientData);
    }
    if !is_strictly_ascending(xs) {
        return Err(InterpError::UnsortedData);
    }
    Ok(())
}

/// Performs linear interpolation on 1D data using binary search.
///
/// # Arguments
///
/// * `x` - The x-coordinate at which to interpolate
/// * `xs` - Sample x-coordinates, strictly ascending
/// * `ys` - Sample values, same length as `xs`
///
/// # Errors
///
/// * `InterpError::OutOfBounds` - x is outside `[xs[0], xs[n-1]]`
/// * `InterpError::InsufficientData` - fewer than 2 samples
/// * `InterpError::MismatchedLengths` - `xs` and `ys` differ in length
/// * `InterpError::UnsortedData` - `xs` is not strictly ascending
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    check_curve(xs, ys)?;

    let min_x = xs[0];
    let max_x = xs[xs.len() - 1];
    if !(min_x..=max_x).contains(&x) {
        return Err(InterpError::OutOfBounds(x, min_x, max_x));
    }

    let idx = match xs.binary_search_by(|probe| probe.total_cmp(&x)) {
        Ok(exact_idx) => return Ok(ys[exact_idx]),
        Err(insert_idx) => insert_idx,
    };

    let (x1, x2) = (xs[idx - 1], xs[idx]);
    let (y1, y2) = (ys[idx - 1], ys[idx]);
    let t = (x - x1) / (x2 - x1);
    Ok(y1 + t * (y2 - y1))
}

/// Integrates a sampled curve with the trapezoidal rule.
///
/// The samples need not be evenly spaced, but `xs` must be strictly ascending.
pub fn trap_integrate(xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    check_curve(xs, ys)?;

    Ok(xs
        .windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (y[0] + y[1]) * (x[1] - x[0]))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_match() {
        let xs = vec![1.0, 2.0, 3.0, 4.0];
        let ys = vec![10.0, 20.0, 30.0, 40.0];
        assert_eq!(interp(2.0, &xs, &ys).unwrap(), 20.0);
        assert_eq!(interp(4.0, &xs, &ys).unwrap(), 40.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert_eq!(interp(1.5, &xs, &ys).unwrap(), 15.0);
        assert_eq!(interp(2.5, &xs, &ys).unwrap(), 25.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert!(matches!(
            interp(0.5, &xs, &ys),
            Err(InterpError::OutOfBounds(_, _, _))
        ));
        assert!(matches!(
            interp(3.5, &xs, &ys),
            Err(InterpError::OutOfBounds(_, _, _))
        ));
    }

    #[test]
    fn test_bad_tables() {
        assert_eq!(
            interp(1.5, &[1.0, 2.0, 3.0], &[10.0, 20.0]),
            Err(InterpError::MismatchedLengths)
        );
        assert_eq!(interp(1.0, &[1.0], &[10.0]), Err(InterpError::InsufficientData));
        assert_eq!(
            interp(1.5, &[2.0, 1.0, 3.0], &[20.0, 10.0, 30.0]),
            Err(InterpError::UnsortedData)
        );
        // Duplicates are not strictly ascending
        assert_eq!(
            interp(1.5, &[1.0, 1.0, 3.0], &[20.0, 10.0, 30.0]),
            Err(InterpError::UnsortedData)
        );
    }

    #[test]
    fn test_trap_integrate_linear() {
        // Integral of y = 2x over [0, 3] is 9, exact for trapezoids
        let xs = vec![0.0, 0.5, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x).collect();
        assert_relative_eq!(trap_integrate(&xs, &ys).unwrap(), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trap_integrate_requires_two_points() {
        assert_eq!(
            trap_integrate(&[1.0], &[1.0]),
            Err(InterpError::InsufficientData)
        );
    }

    #[test]
    fn test_is_strictly_ascending() {
        assert!(is_strictly_ascending(&[]));
        assert!(is_strictly_ascending(&[1.0]));
        assert!(is_strictly_ascending(&[1.0, 2.0, 5.0]));
        assert!(!is_strictly_ascending(&[1.0, 2.0, 2.0]));
        assert!(!is_strictly_ascending(&[3.0, 2.0]));
    }
}
