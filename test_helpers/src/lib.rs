//! Test helpers for the prism simulation workspace
//!
//! Synthetic reference noise tables in the instrument's text format, and a
//! scratch directory for test artifacts.

use once_cell::sync::Lazy;
use std::env;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Error type for test helper operations
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),

    #[error("Failed to write fixture {path}: {source}")]
    FixtureWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One synthetic table row: (wave Å, SNR, signal, noise)
pub type ReferenceRow = (f64, f64, f64, f64);

/// First wavelength of the synthetic table in Å
pub const SYNTHETIC_MIN_WAVE_AA: f64 = 7500.0;

/// Last wavelength of the synthetic table in Å
pub const SYNTHETIC_MAX_WAVE_AA: f64 = 18000.0;

/// Spacing of the synthetic table in Å
pub const SYNTHETIC_STEP_AA: f64 = 50.0;

/// Build a prism-like reference table for an AB = 25 source over one hour.
///
/// Noise is lowest near 12000 Å and rises toward both ends of the coverage,
/// the signal follows a flat F_ν source.
fn build_synthetic_rows() -> Vec<ReferenceRow> {
    let count = ((SYNTHETIC_MAX_WAVE_AA - SYNTHETIC_MIN_WAVE_AA) / SYNTHETIC_STEP_AA) as usize + 1;
    (0..count)
        .map(|i| {
            let wave = SYNTHETIC_MIN_WAVE_AA + SYNTHETIC_STEP_AA * i as f64;
            let signal = 3631e-23 * 1e-10 * 2.99792458e18 / (wave * wave);
            let x = (wave - 12_000.0) / 6000.0;
            let noise = 1.5e-20 * (1.0 + 3.0 * x * x);
            (wave, signal / noise, signal, noise)
        })
        .collect()
}

static SYNTHETIC_ROWS: Lazy<Vec<ReferenceRow>> = Lazy::new(build_synthetic_rows);

/// Rows of the shared synthetic reference table, ascending in wavelength.
pub fn synthetic_reference_rows() -> &'static [ReferenceRow] {
    &SYNTHETIC_ROWS
}

/// Render rows in the whitespace-delimited reference table format, with header.
pub fn reference_table_text(rows: &[ReferenceRow]) -> String {
    let mut text = String::from("wave       SNR        signal       noise\n");
    for (wave, snr, signal, noise) in rows {
        // Writing to a String cannot fail
        let _ = writeln!(text, "{wave:.1}  {snr:.6}  {signal:.6e}  {noise:.6e}");
    }
    text
}

/// Write `rows` as a reference table file `name` inside `dir`.
pub fn write_reference_table(
    dir: &Path,
    name: &str,
    rows: &[ReferenceRow],
) -> Result<PathBuf, TestHelperError> {
    let path = dir.join(name);
    std::fs::write(&path, reference_table_text(rows)).map_err(|source| {
        TestHelperError::FixtureWrite {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}

/// Returns the path to the project root directory.
///
/// Walks up from the current directory until it finds the `Cargo.toml` that
/// declares the workspace.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {e}"))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {e}"))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

/// Lazily initialized project root path
static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// Directory for test artifacts such as plots, created on first use.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }
    output_dir
}

/// Path of `filename` inside [`get_output_dir`].
pub fn get_output_path(filename: &str) -> PathBuf {
    get_output_dir().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_rows_are_prism_like() {
        let rows = synthetic_reference_rows();
        assert_eq!(rows.len(), 211);
        assert_eq!(rows[0].0, SYNTHETIC_MIN_WAVE_AA);
        assert_eq!(rows[rows.len() - 1].0, SYNTHETIC_MAX_WAVE_AA);
        assert!(rows.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(rows.iter().all(|r| r.3 > 0.0 && r.1 > 0.0));
    }

    #[test]
    fn test_table_text_has_header_and_rows() {
        let text = reference_table_text(&synthetic_reference_rows()[..3]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].split_whitespace().count(), 4);
        assert!(lines[1].starts_with("7500.0"));
        assert!(lines.iter().all(|l| l.split_whitespace().count() == 4));
    }

    #[test]
    fn test_find_project_root() {
        let root = find_project_root().unwrap();
        assert!(root.join("Cargo.toml").exists());
    }

    #[test]
    fn test_output_path() {
        let path = get_output_path("fixture_check.txt");
        assert!(path.ends_with("test_output/fixture_check.txt"));
        assert!(get_output_dir().exists());
    }
}
