//! YAML-configurable descriptions of the single-interaction track PMF.

use lumi_core::LumiError;
use lumi_pmf::{discretize, DiscretePmf};
use serde::{Deserialize, Serialize};

/// Description of the per-interaction track-multiplicity distribution.
///
/// Either a closed-form density discretized onto integer track counts, or an
/// explicit probability table for detectors that already histogram their
/// multiplicity response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SourceSpec {
    /// Sum of two exponentials `exp(c0 + c1*x) + exp(t0 + t1*x)`: a steep
    /// core plus a shallow tail, the shape measured for minimum-bias track
    /// multiplicities. The domain must be half-integer aligned so bins
    /// center on integer track counts.
    DoubleExponential {
        /// Core term offset.
        #[serde(default = "default_core_offset")]
        core_offset: f64,
        /// Core term slope.
        #[serde(default = "default_core_slope")]
        core_slope: f64,
        /// Tail term offset.
        #[serde(default = "default_tail_offset")]
        tail_offset: f64,
        /// Tail term slope.
        #[serde(default = "default_tail_slope")]
        tail_slope: f64,
        /// Lower edge of the density domain.
        #[serde(default = "default_domain_lo")]
        lo: f64,
        /// Upper edge of the density domain.
        #[serde(default = "default_domain_hi")]
        hi: f64,
    },
    /// Explicit probabilities indexed by track count; normalized on build.
    Histogram {
        /// Raw probabilities, outcome 0 first.
        probs: Vec<f64>,
    },
}

fn default_core_offset() -> f64 {
    -0.272581
}

fn default_core_slope() -> f64 {
    -1.933719
}

fn default_tail_offset() -> f64 {
    -2.107228
}

fn default_tail_slope() -> f64 {
    -0.198227
}

fn default_domain_lo() -> f64 {
    -0.5
}

fn default_domain_hi() -> f64 {
    19.5
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::DoubleExponential {
            core_offset: default_core_offset(),
            core_slope: default_core_slope(),
            tail_offset: default_tail_offset(),
            tail_slope: default_tail_slope(),
            lo: default_domain_lo(),
            hi: default_domain_hi(),
        }
    }
}

impl SourceSpec {
    /// Builds the normalized single-interaction PMF.
    pub fn build(&self) -> Result<DiscretePmf, LumiError> {
        match self {
            SourceSpec::DoubleExponential {
                core_offset,
                core_slope,
                tail_offset,
                tail_slope,
                lo,
                hi,
            } => discretize(
                |x| (core_offset + core_slope * x).exp() + (tail_offset + tail_slope * x).exp(),
                *lo,
                *hi,
            ),
            SourceSpec::Histogram { probs } => {
                DiscretePmf::from_probabilities(probs.clone())?.normalized()
            }
        }
    }
}
