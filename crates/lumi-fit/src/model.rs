//! The two-parameter tracks-per-BC fit model.

use lumi_core::errors::ErrorInfo;
use lumi_core::LumiError;
use lumi_pmf::InteractionPmfTable;
use serde::{Deserialize, Serialize};

fn model_error(code: &str, message: impl Into<String>) -> LumiError {
    LumiError::Fit(ErrorInfo::new(code, message.into()))
}

/// Starting values handed to the minimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStart {
    /// Initial mean interaction count.
    pub mu: f64,
    /// Initial overall scale.
    pub norm: f64,
}

/// Expected tracks-per-BC counts as a function of `(mu, norm)`.
///
/// The model borrows a pre-built [`InteractionPmfTable`] and is pure given
/// `(table, mu, norm, x)`. Every evaluation rebuilds the Poisson-weighted
/// mixture for the trial `mu` from scratch, the dominant cost of the fitting
/// phase; callers fitting many bins should evaluate the whole curve once per
/// trial parameter set via [`TracksPerBcModel::expected_counts`].
#[derive(Debug, Clone, Copy)]
pub struct TracksPerBcModel<'a> {
    table: &'a InteractionPmfTable,
}

impl<'a> TracksPerBcModel<'a> {
    /// Wraps a pre-built interaction PMF table.
    pub fn new(table: &'a InteractionPmfTable) -> Self {
        Self { table }
    }

    /// The table the model evaluates against.
    pub fn table(&self) -> &'a InteractionPmfTable {
        self.table
    }

    /// Expected counts for every track bin: the Poisson-weighted mixture for
    /// `mu`, normalized to unit sum and scaled by `norm`.
    pub fn expected_counts(&self, mu: f64, norm: f64) -> Result<Vec<f64>, LumiError> {
        if !norm.is_finite() || norm <= 0.0 {
            return Err(LumiError::Fit(
                ErrorInfo::new("invalid-norm", "norm must be finite and > 0")
                    .with_context("norm", norm.to_string()),
            ));
        }
        let mixture = self.table.poisson_mixture(mu)?.normalized()?;
        Ok(mixture.as_slice().iter().map(|&p| p * norm).collect())
    }

    /// Expected count in a single track bin, 0 beyond the modeled range.
    pub fn evaluate(&self, x: usize, mu: f64, norm: f64) -> Result<f64, LumiError> {
        let counts = self.expected_counts(mu, norm)?;
        Ok(counts.get(x).copied().unwrap_or(0.0))
    }

    /// Starting values from the observed histogram.
    ///
    /// The mean guess is the current bookkeeping way to estimate luminosity:
    /// total observed tracks divided by the mean tracks per interaction. The
    /// scale guess is the total observed count.
    pub fn initial_guess(&self, observed: &[f64]) -> Result<FitStart, LumiError> {
        let total: f64 = observed.iter().sum();
        if observed.is_empty() || total <= 0.0 {
            return Err(model_error(
                "empty-data",
                "observed histogram has no entries to guess from",
            ));
        }
        let weighted: f64 = observed
            .iter()
            .enumerate()
            .map(|(x, &y)| x as f64 * y)
            .sum();
        let observed_mean = weighted / total;
        let base_mean = self.table.base().mean()?;
        if base_mean <= 0.0 {
            return Err(model_error(
                "degenerate-source",
                "single-interaction PMF has zero mean tracks",
            ));
        }
        Ok(FitStart {
            mu: observed_mean / base_mean,
            norm: total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumi_pmf::{DiscretePmf, InteractionPmfTable, MixtureConfig};

    fn table() -> InteractionPmfTable {
        let source = DiscretePmf::from_probabilities(vec![0.1, 0.4, 0.3, 0.2]).unwrap();
        let config = MixtureConfig {
            max_measurements: 60,
            max_interactions: 15,
        };
        InteractionPmfTable::build(&source, &config).unwrap()
    }

    #[test]
    fn expected_counts_sum_to_norm() {
        let table = table();
        let model = TracksPerBcModel::new(&table);
        let counts = model.expected_counts(3.0, 250.0).unwrap();
        let total: f64 = counts.iter().sum();
        assert!((total - 250.0).abs() < 1e-6);
        assert!(counts.iter().all(|&c| c >= 0.0));
    }

    #[test]
    fn evaluate_is_zero_beyond_the_range() {
        let table = table();
        let model = TracksPerBcModel::new(&table);
        assert_eq!(model.evaluate(1000, 3.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn invalid_norm_is_rejected() {
        let table = table();
        let model = TracksPerBcModel::new(&table);
        assert!(model.expected_counts(3.0, 0.0).is_err());
        assert!(model.expected_counts(3.0, f64::NAN).is_err());
    }

    #[test]
    fn initial_guess_recovers_mu_from_a_model_shaped_histogram() {
        let table = table();
        let model = TracksPerBcModel::new(&table);
        let mu = 4.0;
        let observed = model.expected_counts(mu, 10_000.0).unwrap();
        let start = model.initial_guess(&observed).unwrap();
        assert!((start.norm - 10_000.0).abs() < 1e-6);
        // The mixture mean is mu times the per-interaction mean, so the
        // ratio guess lands close to the true value.
        assert!((start.mu - mu).abs() < 0.1 * mu, "guess {}", start.mu);
    }

    #[test]
    fn empty_histogram_cannot_seed_a_guess() {
        let table = table();
        let model = TracksPerBcModel::new(&table);
        let err = model.initial_guess(&[]).unwrap_err();
        assert_eq!(err.info().code, "empty-data");
    }
}
