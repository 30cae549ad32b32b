//! Finite probability mass functions over non-negative integer outcomes.

use lumi_core::errors::ErrorInfo;
use lumi_core::{LumiError, RngHandle};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a normalized PMF sums to one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

fn pmf_error(code: &str, message: impl Into<String>) -> LumiError {
    LumiError::Pmf(ErrorInfo::new(code, message.into()))
}

/// A finite PMF over integer outcomes `0..=max_value`, backed by a dense
/// probability vector indexed by outcome.
///
/// Construction validates that every entry is finite and non-negative.
/// Normalization is explicit: [`DiscretePmf::normalized`] returns a rescaled
/// copy and fails on zero total mass. Instances are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscretePmf {
    probs: Vec<f64>,
}

impl DiscretePmf {
    /// Creates a PMF from raw probabilities indexed by outcome.
    ///
    /// The input is validated but not normalized.
    pub fn from_probabilities(probs: Vec<f64>) -> Result<Self, LumiError> {
        if probs.is_empty() {
            return Err(pmf_error("empty", "a PMF needs at least one outcome"));
        }
        for (outcome, &p) in probs.iter().enumerate() {
            if !p.is_finite() || p < 0.0 {
                return Err(LumiError::Pmf(
                    ErrorInfo::new("invalid-entry", "probabilities must be finite and >= 0")
                        .with_context("outcome", outcome.to_string())
                        .with_context("value", p.to_string()),
                ));
            }
        }
        Ok(Self { probs })
    }

    /// The degenerate PMF with all mass at outcome 0.
    pub fn delta(len: usize) -> Result<Self, LumiError> {
        if len == 0 {
            return Err(pmf_error("empty", "a PMF needs at least one outcome"));
        }
        let mut probs = vec![0.0; len];
        probs[0] = 1.0;
        Ok(Self { probs })
    }

    /// Number of outcomes (`max_value + 1`).
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Whether the PMF has no outcomes. Never true for validated instances.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Largest representable outcome.
    pub fn max_value(&self) -> usize {
        self.probs.len() - 1
    }

    /// Probability of `outcome`, 0 beyond the represented range.
    pub fn prob(&self, outcome: usize) -> f64 {
        self.probs.get(outcome).copied().unwrap_or(0.0)
    }

    /// Probabilities indexed by outcome.
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    /// Sum of all entries.
    pub fn total_mass(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Probability-weighted mean outcome.
    pub fn mean(&self) -> Result<f64, LumiError> {
        let mass = self.total_mass();
        if mass <= 0.0 {
            return Err(pmf_error("zero-mass", "cannot take the mean of a zero-mass PMF"));
        }
        let weighted: f64 = self
            .probs
            .iter()
            .enumerate()
            .map(|(outcome, &p)| outcome as f64 * p)
            .sum();
        Ok(weighted / mass)
    }

    /// Returns a copy rescaled to unit total mass.
    ///
    /// Zero total mass indicates upstream corruption (e.g. an empty input
    /// distribution) and is fatal.
    pub fn normalized(&self) -> Result<Self, LumiError> {
        let mass = self.total_mass();
        if !mass.is_finite() || mass <= 0.0 {
            return Err(LumiError::Pmf(
                ErrorInfo::new("zero-mass", "cannot normalize a PMF with zero total mass")
                    .with_context("total_mass", mass.to_string()),
            ));
        }
        let probs = self.probs.iter().map(|p| p / mass).collect();
        Ok(Self { probs })
    }

    /// Returns a copy zero-padded or truncated to exactly `len` outcomes.
    ///
    /// Truncation silently drops the mass beyond the new range.
    pub fn resized(&self, len: usize) -> Result<Self, LumiError> {
        if len == 0 {
            return Err(pmf_error("empty", "a PMF needs at least one outcome"));
        }
        let mut probs = self.probs.clone();
        probs.resize(len, 0.0);
        Ok(Self { probs })
    }

    /// Draws an outcome by inverse-CDF sampling.
    ///
    /// The PMF does not have to be normalized; the draw is scaled by the
    /// total mass.
    pub fn sample(&self, rng: &mut RngHandle) -> usize {
        let target = rng.next_unit() * self.total_mass();
        let mut cumulative = 0.0;
        for (outcome, &p) in self.probs.iter().enumerate() {
            cumulative += p;
            if target < cumulative {
                return outcome;
            }
        }
        self.max_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_non_finite_entries() {
        assert!(DiscretePmf::from_probabilities(vec![0.5, -0.1]).is_err());
        assert!(DiscretePmf::from_probabilities(vec![0.5, f64::NAN]).is_err());
        assert!(DiscretePmf::from_probabilities(Vec::new()).is_err());
    }

    #[test]
    fn delta_is_an_indicator_at_zero() {
        let pmf = DiscretePmf::delta(4).unwrap();
        assert_eq!(pmf.as_slice(), &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(pmf.mean().unwrap(), 0.0);
    }

    #[test]
    fn normalization_rescales_to_unit_mass() {
        let pmf = DiscretePmf::from_probabilities(vec![1.0, 3.0]).unwrap();
        let normalized = pmf.normalized().unwrap();
        assert!((normalized.total_mass() - 1.0).abs() < NORMALIZATION_TOLERANCE);
        assert!((normalized.prob(1) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn zero_mass_normalization_is_fatal() {
        let pmf = DiscretePmf::from_probabilities(vec![0.0, 0.0]).unwrap();
        let err = pmf.normalized().unwrap_err();
        assert_eq!(err.info().code, "zero-mass");
    }

    #[test]
    fn resize_pads_with_zeros_and_truncates() {
        let pmf = DiscretePmf::from_probabilities(vec![0.25, 0.75]).unwrap();
        let padded = pmf.resized(4).unwrap();
        assert_eq!(padded.as_slice(), &[0.25, 0.75, 0.0, 0.0]);
        let truncated = pmf.resized(1).unwrap();
        assert_eq!(truncated.as_slice(), &[0.25]);
    }

    #[test]
    fn mean_matches_hand_computed_value() {
        let pmf = DiscretePmf::from_probabilities(vec![0.2, 0.3, 0.5]).unwrap();
        assert!((pmf.mean().unwrap() - 1.3).abs() < 1e-12);
    }

    #[test]
    fn sampling_respects_a_point_mass() {
        let pmf = DiscretePmf::from_probabilities(vec![0.0, 0.0, 1.0]).unwrap();
        let mut rng = RngHandle::from_seed(5);
        for _ in 0..100 {
            assert_eq!(pmf.sample(&mut rng), 2);
        }
    }
}
