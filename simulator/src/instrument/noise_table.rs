//! Reference noise table for the prism spectrograph.
//!
//! The instrument's sensitivity is tabulated once, for a one hour exposure of
//! a source at a fixed reference magnitude (AB = 25), as four columns:
//!
//! ```text
//! wave        SNR         signal      noise
//! 7500.0      3.12        1.05e-19    3.37e-20
//! ...
//! ```
//!
//! - **wave**: wavelength in Å, strictly increasing
//! - **SNR**: signal-to-noise per resolution element at the reference exposure
//! - **signal**: reference source signal in flux-equivalent units
//! - **noise**: 1σ noise in the same units, strictly positive
//!
//! Columns are separated by any run of whitespace. The first non-blank,
//! non-comment line is a header and its names are ignored. Lines starting
//! with `#` are comments.
//!
//! The table is immutable once loaded. Share it behind an `Arc` between
//! simulations; nothing in it is ever written after construction.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::photometry::spectrum::{GridKind, SpectrumError, WavelengthGrid};

/// Exposure time, in seconds, at which the reference noise was tabulated.
pub const REFERENCE_EXPOSURE_S: f64 = 3600.0;

const COLUMN_NAMES: [&str; 4] = ["wave", "SNR", "signal", "noise"];

/// Errors raised while loading or querying a reference noise table.
///
/// `line` is the 1-based line in the source text, or the 1-based sample
/// index when the table was built from samples directly.
#[derive(Debug, Error)]
pub enum NoiseTableError {
    #[error("Failed to read reference noise table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reference noise table has no header row")]
    MissingHeader,

    #[error("Line {line}: expected 4 columns (wave, SNR, signal, noise), found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("Line {line}: {column} value '{value}' is not a number")]
    NotANumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: {column} value is not finite")]
    NonFinite { line: usize, column: &'static str },

    #[error("Line {line}: wavelength {wavelength} Å does not increase past {previous} Å")]
    NotAscending {
        line: usize,
        wavelength: f64,
        previous: f64,
    },

    #[error("Line {line}: noise {noise} at {wavelength} Å must be positive")]
    NonPositiveNoise {
        line: usize,
        wavelength: f64,
        noise: f64,
    },

    #[error("Reference noise table contains no samples")]
    Empty,

    #[error("Selection mask has {found} entries but the table has {expected} rows")]
    MaskLength { expected: usize, found: usize },

    #[error(transparent)]
    Grid(#[from] SpectrumError),
}

/// One row of the reference noise table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceNoiseSample {
    /// Wavelength in Å
    pub wavelength: f64,
    /// Signal-to-noise per resolution element at the reference exposure
    pub snr: f64,
    /// Reference source signal
    pub signal: f64,
    /// 1σ noise at the reference exposure
    pub noise: f64,
}

/// Immutable, wavelength-ordered reference noise curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceNoiseTable {
    wavelengths: Vec<f64>,
    snr: Vec<f64>,
    signal: Vec<f64>,
    noise: Vec<f64>,
}

impl ReferenceNoiseTable {
    /// Load a table from a whitespace-delimited text file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NoiseTableError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "Loaded reference noise table {} ({} samples)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Parse a table from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, NoiseTableError> {
        let mut rows = Vec::new();
        let mut seen_header = false;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() != COLUMN_NAMES.len() {
                return Err(NoiseTableError::ColumnCount {
                    line: line_no,
                    found: fields.len(),
                });
            }

            if !seen_header {
                seen_header = true;
                continue;
            }

            rows.push((line_no, parse_row(line_no, &fields)?));
        }

        if !seen_header {
            return Err(NoiseTableError::MissingHeader);
        }

        Self::from_numbered_rows(rows)
    }

    /// Build a table directly from samples, with the same validation as parsing.
    pub fn from_samples(samples: Vec<ReferenceNoiseSample>) -> Result<Self, NoiseTableError> {
        let rows = samples
            .into_iter()
            .enumerate()
            .map(|(idx, sample)| (idx + 1, sample))
            .collect();
        Self::from_numbered_rows(rows)
    }

    fn from_numbered_rows(rows: Vec<(usize, ReferenceNoiseSample)>) -> Result<Self, NoiseTableError> {
        if rows.is_empty() {
            return Err(NoiseTableError::Empty);
        }

        let mut table = Self {
            wavelengths: Vec::with_capacity(rows.len()),
            snr: Vec::with_capacity(rows.len()),
            signal: Vec::with_capacity(rows.len()),
            noise: Vec::with_capacity(rows.len()),
        };

        for (line, sample) in rows {
            for (column, value) in COLUMN_NAMES.into_iter().zip([
                sample.wavelength,
                sample.snr,
                sample.signal,
                sample.noise,
            ]) {
                if !value.is_finite() {
                    return Err(NoiseTableError::NonFinite { line, column });
                }
            }

            if let Some(&previous) = table.wavelengths.last() {
                if sample.wavelength <= previous {
                    return Err(NoiseTableError::NotAscending {
                        line,
                        wavelength: sample.wavelength,
                        previous,
                    });
                }
            }

            if sample.noise <= 0.0 {
                return Err(NoiseTableError::NonPositiveNoise {
                    line,
                    wavelength: sample.wavelength,
                    noise: sample.noise,
                });
            }

            table.wavelengths.push(sample.wavelength);
            table.snr.push(sample.snr);
            table.signal.push(sample.signal);
            table.noise.push(sample.noise);
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Exposure time the noise column refers to, in seconds
    pub fn reference_exposure_s(&self) -> f64 {
        REFERENCE_EXPOSURE_S
    }

    /// The table's wavelength axis as an instrument grid
    pub fn wavelengths(&self) -> WavelengthGrid {
        // Ordering was validated on construction
        WavelengthGrid::new(self.wavelengths.clone(), GridKind::Instrument)
            .unwrap_or_else(|_| WavelengthGrid::empty(GridKind::Instrument))
    }

    pub fn wavelength_values(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn snr_values(&self) -> &[f64] {
        &self.snr
    }

    pub fn signal_values(&self) -> &[f64] {
        &self.signal
    }

    pub fn noise_values(&self) -> &[f64] {
        &self.noise
    }

    /// Row `index` as a sample
    pub fn sample(&self, index: usize) -> Option<ReferenceNoiseSample> {
        Some(ReferenceNoiseSample {
            wavelength: *self.wavelengths.get(index)?,
            snr: self.snr[index],
            signal: self.signal[index],
            noise: self.noise[index],
        })
    }

    /// Iterate all rows in wavelength order
    pub fn samples(&self) -> impl Iterator<Item = ReferenceNoiseSample> + '_ {
        (0..self.len()).filter_map(|i| self.sample(i))
    }

    /// First and last tabulated wavelength
    pub fn coverage(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.len() - 1])
    }

    /// Rows lying strictly inside `(min_aa, max_aa)`.
    ///
    /// Samples exactly on either boundary are excluded.
    pub fn overlap_mask(&self, min_aa: f64, max_aa: f64) -> Vec<bool> {
        self.wavelengths
            .iter()
            .map(|&w| min_aa < w && w < max_aa)
            .collect()
    }

    /// Noise values of the rows selected by `mask`, in row order.
    pub fn noise_at(&self, mask: &[bool]) -> Result<Vec<f64>, NoiseTableError> {
        self.select(&self.noise, mask)
    }

    /// Wavelengths of the rows selected by `mask`, as an instrument grid.
    pub fn wavelengths_at(&self, mask: &[bool]) -> Result<WavelengthGrid, NoiseTableError> {
        let selected = self.select(&self.wavelengths, mask)?;
        Ok(WavelengthGrid::new(selected, GridKind::Instrument)?)
    }

    fn select(&self, column: &[f64], mask: &[bool]) -> Result<Vec<f64>, NoiseTableError> {
        if mask.len() != column.len() {
            return Err(NoiseTableError::MaskLength {
                expected: column.len(),
                found: mask.len(),
            });
        }
        Ok(column
            .iter()
            .zip(mask)
            .filter_map(|(&value, &keep)| keep.then_some(value))
            .collect())
    }
}

impl FromStr for ReferenceNoiseTable {
    type Err = NoiseTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

fn parse_row(line: usize, fields: &[&str]) -> Result<ReferenceNoiseSample, NoiseTableError> {
    let mut values = [0.0; 4];
    for ((slot, field), column) in values.iter_mut().zip(fields).zip(COLUMN_NAMES) {
        *slot = field
            .parse::<f64>()
            .map_err(|_| NoiseTableError::NotANumber {
                line,
                column,
                value: field.to_string(),
            })?;
    }

    Ok(ReferenceNoiseSample {
        wavelength: values[0],
        snr: values[1],
        signal: values[2],
        noise: values[3],
    })
}
