use std::path::PathBuf;

use clap::{Args, Parser};
use rand::Rng;

use crate::model::ModelParameters;

/// Parse an exposure time in seconds, rejecting non-positive values
pub fn parse_exposure_seconds(s: &str) -> Result<f64, String> {
    let seconds = s
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid exposure '{s}', expected seconds"))?;
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(format!("Exposure must be a positive number of seconds, got {s}"));
    }
    Ok(seconds)
}

/// Common arguments shared across the synthesis binaries
#[derive(Parser, Debug, Clone)]
pub struct SharedSimulationArgs {
    /// Reference noise table (whitespace-delimited: wave SNR signal noise)
    #[arg(long, default_value = "AB_25_1hour.txt")]
    pub reference_table: PathBuf,

    /// Time phase in days relative to peak
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub phase: f64,

    /// Random seed for parameter sampling and noise; drawn at random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Supernova parameters; any left unset are sampled like a typical event
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Redshift
    #[arg(long, default_value_t = 1.0)]
    pub redshift: f64,

    /// Distance modulus in magnitudes (default: 43 + N(0, 1))
    #[arg(long)]
    pub dm: Option<f64>,

    /// Host extinction A_V in magnitudes (default: 1 + N(0, 1))
    #[arg(long, allow_negative_numbers = true)]
    pub av: Option<f64>,

    /// First embedding coordinate (default: N(0, 1))
    #[arg(long, allow_negative_numbers = true)]
    pub xi1: Option<f64>,

    /// Second embedding coordinate (default: N(0, 1))
    #[arg(long, allow_negative_numbers = true)]
    pub xi2: Option<f64>,

    /// Third embedding coordinate (default: N(0, 1))
    #[arg(long, allow_negative_numbers = true)]
    pub xi3: Option<f64>,
}

impl ModelArgs {
    /// Fill in any missing parameters by sampling from `rng`.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> ModelParameters {
        let sampled = ModelParameters::sample(self.redshift, rng);
        ModelParameters {
            z: self.redshift,
            dm: self.dm.unwrap_or(sampled.dm),
            av: self.av.unwrap_or(sampled.av),
            xi: [
                self.xi1.unwrap_or(sampled.xi[0]),
                self.xi2.unwrap_or(sampled.xi[1]),
                self.xi3.unwrap_or(sampled.xi[2]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_exposure_seconds() {
        assert_eq!(parse_exposure_seconds("3600"), Ok(3600.0));
        assert_eq!(parse_exposure_seconds(" 900.5 "), Ok(900.5));
        assert!(parse_exposure_seconds("0").is_err());
        assert!(parse_exposure_seconds("-5").is_err());
        assert!(parse_exposure_seconds("1h").is_err());
        assert!(parse_exposure_seconds("inf").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = SharedSimulationArgs::parse_from(["prog"]);
        assert_eq!(args.reference_table, PathBuf::from("AB_25_1hour.txt"));
        assert_eq!(args.phase, 0.0);
        assert_eq!(args.seed, None);
        assert_eq!(args.model.redshift, 1.0);
        assert!(args.model.dm.is_none());
    }

    #[test]
    fn test_explicit_parameters_win() {
        let args = SharedSimulationArgs::parse_from([
            "prog", "--redshift", "0.5", "--dm", "42", "--av", "-0.2", "--xi1", "1", "--xi2",
            "-1", "--xi3", "0.5", "--phase", "-3",
        ]);
        let params = args.model.resolve(&mut StdRng::seed_from_u64(1));
        assert_eq!(params, ModelParameters::new(0.5, 42.0, -0.2, [1.0, -1.0, 0.5]));
        assert_eq!(args.phase, -3.0);
    }

    #[test]
    fn test_missing_parameters_are_sampled() {
        let args = SharedSimulationArgs::parse_from(["prog", "--dm", "44"]);
        let a = args.model.resolve(&mut StdRng::seed_from_u64(77));
        let b = args.model.resolve(&mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
        assert_eq!(a.dm, 44.0);
        assert_eq!(a.z, 1.0);
        assert!(a.validate().is_ok());
    }
}
