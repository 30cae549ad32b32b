//! Discretization of closed-form densities onto integer outcomes.

use lumi_core::errors::ErrorInfo;
use lumi_core::LumiError;

use crate::pmf::DiscretePmf;

/// Tolerance applied when checking that a domain has integer width.
const DOMAIN_WIDTH_TOLERANCE: f64 = 1e-9;

/// Samples `density` at integer-centered bins over `[lo, hi]` and returns the
/// normalized PMF.
///
/// The domain must have integer width so that bin centers land on integers,
/// e.g. `[-0.5, 19.5]` yields outcomes `0..=19`. A non-integer width means
/// the function would be evaluated off the integer grid and is rejected
/// before any computation.
pub fn discretize<F>(density: F, lo: f64, hi: f64) -> Result<DiscretePmf, LumiError>
where
    F: Fn(f64) -> f64,
{
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Err(LumiError::Pmf(
            ErrorInfo::new("domain-empty", "density domain must be a finite non-empty interval")
                .with_context("lo", lo.to_string())
                .with_context("hi", hi.to_string()),
        ));
    }
    let width = hi - lo;
    if (width - width.round()).abs() > DOMAIN_WIDTH_TOLERANCE {
        return Err(LumiError::Pmf(
            ErrorInfo::new("domain-width", "density domain must have integer width")
                .with_context("lo", lo.to_string())
                .with_context("hi", hi.to_string())
                .with_context("width", width.to_string())
                .with_hint("use a half-integer aligned domain such as [-0.5, N+0.5]"),
        ));
    }

    let outcomes = width.round() as usize;
    let mut probs = Vec::with_capacity(outcomes);
    for i in 0..outcomes {
        let center = lo + 0.5 + i as f64;
        let value = density(center);
        if !value.is_finite() || value < 0.0 {
            return Err(LumiError::Pmf(
                ErrorInfo::new("density-range", "density must be finite and >= 0 at bin centers")
                    .with_context("center", center.to_string())
                    .with_context("value", value.to_string()),
            ));
        }
        probs.push(value);
    }
    DiscretePmf::from_probabilities(probs)?.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_integer_width_is_rejected_before_evaluation() {
        let err = discretize(|_| 1.0, -0.5, 19.2).unwrap_err();
        assert_eq!(err.info().code, "domain-width");
    }

    #[test]
    fn half_integer_domain_centers_bins_on_integers() {
        let pmf = discretize(|x| x, -0.5, 3.5).unwrap();
        // Raw samples 0, 1, 2, 3 before normalization.
        assert_eq!(pmf.len(), 4);
        assert!((pmf.prob(0)).abs() < 1e-12);
        assert!((pmf.prob(3) - 0.5).abs() < 1e-12);
        assert!((pmf.total_mass() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_density_is_rejected() {
        let err = discretize(|x| 1.0 - x, -0.5, 4.5).unwrap_err();
        assert_eq!(err.info().code, "density-range");
    }

    #[test]
    fn degenerate_domain_is_rejected() {
        assert!(discretize(|_| 1.0, 2.0, 2.0).is_err());
        assert!(discretize(|_| 1.0, f64::NEG_INFINITY, 0.5).is_err());
    }
}
