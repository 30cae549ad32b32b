//! Per-interaction-count track PMFs and their Poisson-weighted mixture.

use lumi_core::errors::ErrorInfo;
use lumi_core::LumiError;
use serde::{Deserialize, Serialize};

use crate::convolve::convolve;
use crate::pmf::DiscretePmf;
use crate::poisson::poisson_weights;

/// Configurable bounds for the mixture construction.
///
/// `max_interactions` must be chosen in harmony with `max_measurements`: the
/// scaling depends on the typical number of tracks per interaction, and the
/// Poisson truncation is only valid while trial `mu` stays well below
/// `max_interactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixtureConfig {
    /// Maximum number of tracks per bunch crossing considered.
    #[serde(default = "default_max_measurements")]
    pub max_measurements: usize,
    /// Maximum number of interactions per bunch crossing considered.
    #[serde(default = "default_max_interactions")]
    pub max_interactions: usize,
}

fn default_max_measurements() -> usize {
    200
}

fn default_max_interactions() -> usize {
    80
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            max_measurements: default_max_measurements(),
            max_interactions: default_max_interactions(),
        }
    }
}

impl MixtureConfig {
    /// Number of track bins, outcome 0 included.
    pub fn track_bins(&self) -> usize {
        self.max_measurements + 1
    }
}

/// Table of track-count PMFs for every fixed interaction count
/// `n = 0..=max_interactions + 1`.
///
/// Built once per run and read-only afterwards, including during repeated
/// fit-function evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionPmfTable {
    entries: Vec<DiscretePmf>,
    config: MixtureConfig,
}

impl InteractionPmfTable {
    /// Builds the table from the single-interaction track PMF.
    ///
    /// Entry 0 is the indicator at 0 tracks (handled specially; convolving
    /// with an empty interaction set is undefined). Entry 1 is the source
    /// PMF resized to the configured track range and normalized. Entry `n`
    /// is `normalize(convolve(entry[n-1], entry[1]))`, one convolution per
    /// added interaction.
    pub fn build(source: &DiscretePmf, config: &MixtureConfig) -> Result<Self, LumiError> {
        if config.max_interactions == 0 {
            return Err(LumiError::Mixture(
                ErrorInfo::new("invalid-config", "max_interactions must be at least 1")
                    .with_context("max_interactions", "0"),
            ));
        }
        let bins = config.track_bins();
        let mut entries = Vec::with_capacity(config.max_interactions + 2);
        entries.push(DiscretePmf::delta(bins)?);
        entries.push(source.resized(bins)?.normalized()?);
        for n in 2..=config.max_interactions + 1 {
            let next = convolve(&entries[n - 1], &entries[1])?.normalized()?;
            entries.push(next);
        }
        Ok(Self {
            entries,
            config: config.clone(),
        })
    }

    /// PMF of the total track count given exactly `n` interactions.
    pub fn entry(&self, n: usize) -> Option<&DiscretePmf> {
        self.entries.get(n)
    }

    /// The normalized single-interaction PMF (entry 1).
    pub fn base(&self) -> &DiscretePmf {
        &self.entries[1]
    }

    /// Number of table entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty. Never true for built tables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configuration the table was built with.
    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    /// Poisson-weighted mixture `sum_n Poisson(n; mu) * entry[n]` over
    /// `n = 0..=max_interactions`.
    ///
    /// The result is not renormalized: the truncated Poisson tail leaves a
    /// small mass deficit that the fit model absorbs into its overall scale.
    /// Callers using the mixture as a standalone distribution should call
    /// [`DiscretePmf::normalized`].
    pub fn poisson_mixture(&self, mu: f64) -> Result<DiscretePmf, LumiError> {
        let weights = poisson_weights(mu, self.config.max_interactions)?;
        let mut acc = vec![0.0; self.config.track_bins()];
        for (n, &weight) in weights.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            for (slot, &p) in acc.iter_mut().zip(self.entries[n].as_slice()) {
                *slot += weight * p;
            }
        }
        DiscretePmf::from_probabilities(acc)
    }
}
