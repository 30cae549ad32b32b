//! Numerically stable truncated Poisson weights.

use lumi_core::errors::ErrorInfo;
use lumi_core::LumiError;
use statrs::function::gamma::ln_gamma;

#[inline]
fn ln_factorial(n: u64) -> f64 {
    ln_gamma(n as f64 + 1.0)
}

fn validate_mu(mu: f64) -> Result<(), LumiError> {
    if !mu.is_finite() || mu < 0.0 {
        return Err(LumiError::Mixture(
            ErrorInfo::new("invalid-mu", "mu must be finite and >= 0")
                .with_context("mu", mu.to_string()),
        ));
    }
    Ok(())
}

/// Log of `Poisson(n; mu)`, evaluated via log-gamma so that large `n` never
/// overflows a factorial.
pub fn log_weight(n: u64, mu: f64) -> Result<f64, LumiError> {
    validate_mu(mu)?;
    if mu == 0.0 {
        return Ok(if n == 0 { 0.0 } else { f64::NEG_INFINITY });
    }
    let nf = n as f64;
    Ok(nf * mu.ln() - mu - ln_factorial(n))
}

/// `Poisson(n; mu)` for `n = 0..=max_n`.
///
/// Weights that underflow to zero at large `n` and small `mu` are a zero
/// contribution, not an error. Truncating at `max_n` discards tail mass;
/// the truncation is only a good approximation while `mu` is well below
/// `max_n`.
pub fn poisson_weights(mu: f64, max_n: usize) -> Result<Vec<f64>, LumiError> {
    validate_mu(mu)?;
    let mut weights = Vec::with_capacity(max_n + 1);
    for n in 0..=max_n {
        weights.push(log_weight(n as u64, mu)?.exp());
    }
    Ok(weights)
}
